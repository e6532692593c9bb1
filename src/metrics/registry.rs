//! Built-in panel registry
//!
//! Each dashboard panel is a row in this table: which source metric it reads,
//! how the fields are extracted, which transform shapes the data and how the
//! result is presented. Thresholds and bin strategies are constants here.

use crate::loader::{Extraction, MetricSource};
use crate::presenter::{AverageOverlay, ChartKind, Highlight, LabelPolicy, Presentation};
use crate::transform::{BinCount, Relabel, Transform};

/// One dashboard panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelDefinition {
    pub id: &'static str,
    pub source: MetricSource,
    pub transform: Transform,
    pub presentation: Presentation,
}

/// Group name arrays appear under either field depending on the producer version
const GROUP_NAMES: &[&str] = &["group_names", "repo_names"];

const REPOSITORY_AXIS: Option<(&str, &str)> = Some(("Repository", "repo"));

const COMMIT_COUNT_PER_REPO: MetricSource = MetricSource {
    key: "commit_count_per_repo",
    file_name: "commit_count_per_repo",
    extraction: Extraction::Parallel {
        names: GROUP_NAMES,
        values: "commit_counts",
        average: Some("average_commit_count"),
    },
};

const PR_COUNT_PER_REPO: MetricSource = MetricSource {
    key: "pr_count_per_repo",
    file_name: "pr_count_per_repo",
    extraction: Extraction::Parallel {
        names: GROUP_NAMES,
        values: "pr_counts",
        average: Some("average_pr"),
    },
};

const ISSUE_COUNT_PER_REPO: MetricSource = MetricSource {
    key: "issue_count_per_repo",
    file_name: "issue_count_per_repo",
    extraction: Extraction::Parallel {
        names: GROUP_NAMES,
        values: "issue_counts",
        average: Some("average_issues"),
    },
};

const BRANCH_COUNT_PER_REPO: MetricSource = MetricSource {
    key: "branch_count_per_repo",
    file_name: "branch_count_per_repo",
    extraction: Extraction::Parallel {
        names: GROUP_NAMES,
        values: "branch_counts",
        average: Some("average_branches"),
    },
};

const fn per_repo_bars(
    title: &'static str,
    value_axis: (&'static str, &'static str),
    average: AverageOverlay,
    labels: LabelPolicy,
) -> Presentation {
    Presentation {
        title,
        kind: ChartKind::Bar,
        x_axis: REPOSITORY_AXIS,
        y_axis: Some(value_axis),
        average: Some(average),
        highlight: Highlight::None,
        labels,
        pad_y_axis: false,
    }
}

const fn distribution_line(
    title: &'static str,
    range_axis: (&'static str, &'static str),
    count_axis: (&'static str, &'static str),
    highlight: Highlight,
    labels: LabelPolicy,
) -> Presentation {
    Presentation {
        title,
        kind: ChartKind::Line,
        x_axis: Some(range_axis),
        y_axis: Some(count_axis),
        average: None,
        highlight,
        labels,
        pad_y_axis: true,
    }
}

const fn pie(title: &'static str) -> Presentation {
    Presentation {
        title,
        kind: ChartKind::Pie,
        x_axis: None,
        y_axis: None,
        average: None,
        highlight: Highlight::None,
        labels: LabelPolicy::Percent,
        pad_y_axis: false,
    }
}

const PLAIN_SHARES: Transform = Transform::Shares { other_threshold: None, relabel: Relabel::None };

/// Share below which a language is folded into "Other"
pub const LANGUAGE_OTHER_THRESHOLD: f64 = 0.03;

/// Target bin count for the commit count histogram
pub const COMMIT_DISTRIBUTION_BINS: usize = 10;

pub const GINI_COMMIT_BIN_WIDTH: f64 = 0.05;
pub const GINI_LINES_BIN_WIDTH: f64 = 0.1;

/// Every panel of the dashboard, in display order
pub const BUILTIN_PANELS: &[PanelDefinition] = &[
    PanelDefinition {
        id: "commit_date_series",
        source: MetricSource {
            key: "commit_time_distribution_date",
            file_name: "commit_time_distribution_date",
            extraction: Extraction::Parallel { names: &["full_dates"], values: "counts", average: None },
        },
        transform: Transform::DateWindow,
        presentation: Presentation {
            title: "Daily Commit Distribution Over the Year",
            kind: ChartKind::Line,
            x_axis: Some(("Date", "date")),
            y_axis: Some(("Commits", "commits")),
            average: None,
            highlight: Highlight::None,
            labels: LabelPolicy::None,
            pad_y_axis: false,
        },
    },
    PanelDefinition {
        id: "commit_hourly",
        source: MetricSource {
            key: "commit_time_distribution_hourly",
            file_name: "commit_time_distribution_hourly",
            extraction: Extraction::Parallel { names: &["hours"], values: "counts", average: None },
        },
        transform: Transform::HourOfDay,
        presentation: Presentation {
            title: "Hourly Commit Distribution",
            kind: ChartKind::Bar,
            x_axis: Some(("Hour", "hourLabel")),
            y_axis: Some(("Commits", "commits")),
            average: None,
            highlight: Highlight::None,
            labels: LabelPolicy::None,
            pad_y_axis: false,
        },
    },
    PanelDefinition {
        id: "commit_count_per_repo",
        source: COMMIT_COUNT_PER_REPO,
        transform: Transform::Ranked,
        presentation: per_repo_bars(
            "Commit Count per Repo",
            ("Commits", "commits"),
            AverageOverlay { caption: "Average Commit Count", decimals: 2 },
            LabelPolicy::None,
        ),
    },
    PanelDefinition {
        id: "commit_count_distribution",
        source: MetricSource {
            extraction: Extraction::Values { field: "commit_counts" },
            ..COMMIT_COUNT_PER_REPO
        },
        transform: Transform::AdaptiveHistogram(BinCount::Fixed(COMMIT_DISTRIBUTION_BINS)),
        presentation: distribution_line(
            "Commit Count Distribution",
            ("Commit Count Range", "commit_range"),
            ("Group Count", "group_count"),
            Highlight::MaxAndMin,
            LabelPolicy::Highlighted { skip_zero: false },
        ),
    },
    PanelDefinition {
        id: "code_line_per_repo",
        source: MetricSource {
            key: "code_line_per_repo",
            file_name: "code_line_per_repo",
            extraction: Extraction::Parallel {
                names: GROUP_NAMES,
                values: "total_lines",
                average: Some("average_lines"),
            },
        },
        transform: Transform::Ranked,
        presentation: per_repo_bars(
            "Code Line Count per Repo",
            ("Lines", "lines"),
            AverageOverlay { caption: "Average Code Lines Count", decimals: 0 },
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "language_distribution",
        source: MetricSource {
            key: "language_distribution",
            file_name: "language_distribution",
            extraction: Extraction::Parallel { names: &["languages"], values: "counts", average: None },
        },
        transform: Transform::Shares {
            other_threshold: Some(LANGUAGE_OTHER_THRESHOLD),
            relabel: Relabel::None,
        },
        presentation: pie("Programming Language Distribution"),
    },
    PanelDefinition {
        id: "pr_count_per_repo",
        source: PR_COUNT_PER_REPO,
        transform: Transform::Ranked,
        presentation: per_repo_bars(
            "PR Count per Repo",
            ("Pull Requests", "pr"),
            AverageOverlay { caption: "Average PR Count", decimals: 2 },
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "pr_count_distribution",
        source: MetricSource {
            extraction: Extraction::Values { field: "pr_counts" },
            ..PR_COUNT_PER_REPO
        },
        transform: Transform::AdaptiveHistogram(BinCount::SquareRoot),
        presentation: distribution_line(
            "PR Count Distribution",
            ("PR Count Range", "pr_range"),
            ("Number of Groups", "group_count"),
            Highlight::None,
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "pr_status_distribution",
        source: MetricSource {
            key: "pr_status_distribution",
            file_name: "pr_status_distribution",
            extraction: Extraction::CountMap { field: None },
        },
        transform: PLAIN_SHARES,
        presentation: pie("PR Merge Status"),
    },
    PanelDefinition {
        id: "issue_count_per_repo",
        source: ISSUE_COUNT_PER_REPO,
        transform: Transform::Ranked,
        presentation: per_repo_bars(
            "Issue Count per Repo",
            ("Issues", "issues"),
            AverageOverlay { caption: "Average Issue", decimals: 2 },
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "issue_count_distribution",
        source: MetricSource {
            extraction: Extraction::Values { field: "issue_counts" },
            ..ISSUE_COUNT_PER_REPO
        },
        transform: Transform::AdaptiveHistogram(BinCount::SquareRoot),
        presentation: distribution_line(
            "Issue Count Distribution",
            ("Issue Count Range", "issue_range"),
            ("Number of Groups", "group_count"),
            Highlight::None,
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "issue_status_distribution",
        source: MetricSource {
            key: "issue_status_distribution",
            file_name: "issue_status_distribution",
            extraction: Extraction::CountMap { field: None },
        },
        transform: PLAIN_SHARES,
        presentation: pie("Issue Closed Status"),
    },
    PanelDefinition {
        id: "branch_count_per_repo",
        source: BRANCH_COUNT_PER_REPO,
        transform: Transform::Ranked,
        presentation: per_repo_bars(
            "Branch Count per Repo",
            ("Branches", "branch"),
            AverageOverlay { caption: "Average Branch", decimals: 2 },
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "branch_count_distribution",
        source: MetricSource {
            extraction: Extraction::Values { field: "branch_counts" },
            ..BRANCH_COUNT_PER_REPO
        },
        transform: Transform::Frequency,
        presentation: Presentation {
            title: "Branch Count Distribution",
            kind: ChartKind::Line,
            x_axis: Some(("Branch Count", "branch_count")),
            y_axis: Some(("Number of Groups", "group_count")),
            average: None,
            highlight: Highlight::None,
            labels: LabelPolicy::Value,
            pad_y_axis: false,
        },
    },
    PanelDefinition {
        id: "active_contributor_count",
        source: MetricSource {
            key: "active_contributor_count",
            file_name: "repo_active_contributor_count",
            extraction: Extraction::Records {
                field: None,
                names: &["repo_name", "group_name"],
                value: "active_contributor_count",
            },
        },
        transform: Transform::Ranked,
        presentation: Presentation {
            title: "Active Contributors per Project",
            kind: ChartKind::Bar,
            x_axis: REPOSITORY_AXIS,
            y_axis: Some(("Contributors", "contributors")),
            average: None,
            highlight: Highlight::None,
            labels: LabelPolicy::Value,
            pad_y_axis: false,
        },
    },
    PanelDefinition {
        id: "active_contributor_pie",
        source: MetricSource {
            key: "active_contributor_pie_chart",
            file_name: "active_contributor_pie_chart",
            extraction: Extraction::CountMap { field: None },
        },
        transform: Transform::Shares { other_threshold: None, relabel: Relabel::GroupSize },
        presentation: pie("Active Contributor Distribution"),
    },
    PanelDefinition {
        id: "commit_message_language",
        source: MetricSource {
            key: "commit_message_info",
            file_name: "commit_message_info",
            extraction: Extraction::CountMap { field: Some("lang_counter") },
        },
        transform: Transform::Shares { other_threshold: None, relabel: Relabel::MessageLanguage },
        presentation: pie("Commit Message Language Distribution"),
    },
    PanelDefinition {
        id: "commit_message_length",
        source: MetricSource {
            key: "commit_message_info",
            file_name: "commit_message_info",
            extraction: Extraction::Records {
                field: Some("length_distribution"),
                names: &["length_range"],
                value: "count",
            },
        },
        transform: Transform::MergePairs,
        presentation: distribution_line(
            "Commit Message Length Distribution",
            ("Message Length Range", "length_range"),
            ("Number of Messages", "count"),
            Highlight::Max,
            LabelPolicy::Highlighted { skip_zero: false },
        ),
    },
    PanelDefinition {
        id: "gini_commit_distribution",
        source: MetricSource {
            key: "contribution_difference",
            file_name: "contribution_difference",
            extraction: Extraction::Values { field: "gini_commit" },
        },
        transform: Transform::FixedWidthHistogram { width: GINI_COMMIT_BIN_WIDTH },
        presentation: distribution_line(
            "Gini Coefficient Distribution (Commits)",
            ("Gini Range (Commit)", "gini_range"),
            ("Number of Groups", "group_count"),
            Highlight::None,
            LabelPolicy::Value,
        ),
    },
    PanelDefinition {
        id: "gini_change_lines_distribution",
        source: MetricSource {
            key: "contribution_difference",
            file_name: "contribution_difference",
            extraction: Extraction::Values { field: "gini_add_lines" },
        },
        transform: Transform::FixedWidthHistogram { width: GINI_LINES_BIN_WIDTH },
        presentation: distribution_line(
            "Gini Coefficient Distribution (Added Lines)",
            ("Gini Range (Added Lines)", "gini_range"),
            ("Group Count", "group_count"),
            Highlight::Max,
            LabelPolicy::Highlighted { skip_zero: true },
        ),
    },
];
