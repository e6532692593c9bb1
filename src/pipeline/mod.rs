//! Dashboard pipeline
//!
//! Connects loader, transformer and presenter for every registered panel and
//! re-runs them whenever the semester selection changes.

pub mod generation;
pub mod state;

pub use generation::{GenerationCounter, SemesterSelection};
pub use state::DashboardState;

use futures::future::join_all;
use log::{debug, info};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use crate::dataset::MetricDataset;
use crate::loader::{DataLoader, DocumentLocation};
use crate::metrics::PanelDefinition;
use crate::presenter::{present, PanelState, PanelView};
use crate::semester::Semester;

/// Run the transform and presenter stages for one panel
pub fn render_panel(panel: &PanelDefinition, dataset: &MetricDataset) -> PanelState {
    let data = panel.transform.apply(dataset);
    present(panel.id, &panel.presentation, dataset, data)
}

/// The set of panels bound to one data source
pub struct Dashboard {
    loader: DataLoader,
    panels: Vec<PanelDefinition>,
    generations: GenerationCounter,
    state: Arc<Mutex<DashboardState>>,
}

impl Dashboard {
    pub fn new(loader: DataLoader, panels: Vec<PanelDefinition>) -> Self {
        let state = Arc::new(Mutex::new(DashboardState::new(&panels)));
        Self {
            loader,
            panels,
            generations: GenerationCounter::new(),
            state,
        }
    }

    pub fn panels(&self) -> &[PanelDefinition] {
        &self.panels
    }

    /// Change the selected semester. Every panel returns to loading and any
    /// load still running for an earlier selection becomes stale.
    pub fn select(&self, semester: Semester) -> SemesterSelection {
        let selection = SemesterSelection::new(semester, self.generations.advance());
        self.state.lock().begin(selection);
        info!("Selected {} (generation {})", semester, selection.generation);
        selection
    }

    /// Load every panel for `selection` and record the results.
    ///
    /// Each distinct document is fetched once; in the consolidated layout that
    /// is a single fetch for the whole dashboard. Returns the number of panel
    /// results that were accepted.
    pub async fn refresh(&self, selection: SemesterSelection) -> usize {
        let semester = selection.semester;

        let mut locations: Vec<DocumentLocation> = Vec::new();
        for panel in &self.panels {
            let location = self.loader.location_for(semester, &panel.source);
            if !locations.contains(&location) {
                locations.push(location);
            }
        }
        debug!("Fetching {} documents for {}", locations.len(), semester);

        let fetched = join_all(locations.iter().map(|location| self.loader.fetch(location))).await;
        let documents: HashMap<DocumentLocation, Value> = locations
            .into_iter()
            .zip(fetched)
            .filter_map(|(location, document)| document.map(|d| (location, d)))
            .collect();

        if let Some(document) = documents.get(&DocumentLocation::Consolidated) {
            self.loader.check_semester(document, semester);
        }

        if !self.generations.is_current(selection.generation) {
            debug!("Selection {} superseded while loading", selection.generation);
        }

        let mut accepted = 0;
        for panel in &self.panels {
            let location = self.loader.location_for(semester, &panel.source);
            let dataset = self.loader.extract(documents.get(&location), semester, &panel.source);
            let panel_state = render_panel(panel, &dataset);
            if self.state.lock().apply(selection.generation, panel.id, panel_state) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Select `semester`, load it and return the resulting panels
    pub async fn load_semester(&self, semester: Semester) -> Vec<PanelView> {
        let selection = self.select(semester);
        self.refresh(selection).await;
        self.snapshot()
    }

    /// Copy of the current panel states, in registry order
    pub fn snapshot(&self) -> Vec<PanelView> {
        self.state.lock().panels().to_vec()
    }

    pub fn selection(&self) -> Option<SemesterSelection> {
        self.state.lock().selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{MemorySource, SourceLayout};
    use crate::metrics::{MetricRegistry, BUILTIN_PANELS};
    use serde_json::json;

    fn consolidated_source() -> Arc<MemorySource> {
        Arc::new(MemorySource::new().with_document(
            &DocumentLocation::Consolidated,
            json!({
                "23spring": {
                    "commit_count_per_repo": {
                        "group_names": ["A", "B", "C", "D", "E"],
                        "commit_counts": [5, 3, 3, 8, 1],
                        "average_commit_count": 4.0
                    },
                    "pr_status_distribution": {"merged": 6, "closed": 2}
                },
                "24spring": {
                    "pr_status_distribution": {"open": 1}
                }
            }),
        ))
    }

    fn dashboard(source: Arc<MemorySource>, ids: &[&str]) -> Dashboard {
        let panels = MetricRegistry::builtin().select(ids).unwrap();
        Dashboard::new(DataLoader::new(source, SourceLayout::Consolidated), panels)
    }

    #[tokio::test]
    async fn test_load_semester_renders_panels() {
        let board = dashboard(consolidated_source(), &["commit_count_per_repo", "language_distribution"]);
        let views = board.load_semester(Semester::Spring2023).await;
        assert_eq!(views.len(), 2);

        let chart = views[0].state.chart().unwrap();
        assert_eq!(chart.data.labels(), vec!["D", "A", "B", "C", "E"]);
        assert_eq!(chart.reference_line.as_ref().unwrap().value, 4.0);

        assert_eq!(views[1].state, PanelState::NoData);
    }

    #[tokio::test]
    async fn test_consolidated_document_fetched_once() {
        let source = consolidated_source();
        let empty: [&str; 0] = [];
        let board = dashboard(source.clone(), &empty);
        let views = board.load_semester(Semester::Spring2023).await;
        assert_eq!(views.len(), BUILTIN_PANELS.len());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let board = dashboard(consolidated_source(), &["pr_status_distribution"]);
        let first = board.select(Semester::Spring2023);
        let second = board.select(Semester::Spring2024);

        assert_eq!(board.refresh(first).await, 0);
        assert_eq!(board.snapshot()[0].state, PanelState::Loading);

        assert_eq!(board.refresh(second).await, 1);
        let chart = board.snapshot()[0].state.chart().cloned().unwrap();
        assert_eq!(chart.semester, Semester::Spring2024);
        assert_eq!(chart.data.labels(), vec!["open"]);
    }

    #[tokio::test]
    async fn test_out_of_order_completion_keeps_newest() {
        let board = dashboard(consolidated_source(), &["pr_status_distribution"]);
        let first = board.select(Semester::Spring2023);
        let second = board.select(Semester::Spring2024);

        let (newer, older) = futures::join!(board.refresh(second), board.refresh(first));
        assert_eq!((newer, older), (1, 0));
        assert_eq!(board.selection(), Some(second));
        let chart = board.snapshot()[0].state.chart().cloned().unwrap();
        assert_eq!(chart.semester, Semester::Spring2024);
    }

    #[test]
    fn test_selected_panels_load_until_refreshed() {
        let board = dashboard(consolidated_source(), &["commit_hourly"]);
        board.select(Semester::Spring2023);
        assert_eq!(board.snapshot()[0].state, PanelState::Loading);

        let views = tokio_test::block_on(board.load_semester(Semester::Spring2023));
        assert_eq!(views[0].state, PanelState::NoData);
        assert_eq!(board.selection().map(|s| s.generation), Some(2));
    }

    #[test]
    fn test_render_panel_empty_dataset() {
        let panel = MetricRegistry::builtin().get("gini_commit_distribution").copied().unwrap();
        let dataset = MetricDataset::empty(Semester::Spring2023, "contribution_difference");
        assert_eq!(render_panel(&panel, &dataset), PanelState::NoData);
    }
}
