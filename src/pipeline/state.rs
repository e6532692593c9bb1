//! Per-panel dashboard state

use log::debug;
use crate::metrics::PanelDefinition;
use crate::presenter::{PanelState, PanelView};
use crate::semester::Semester;
use super::generation::SemesterSelection;

/// What every panel currently shows, for one selection
#[derive(Debug, Clone)]
pub struct DashboardState {
    selection: Option<SemesterSelection>,
    panels: Vec<PanelView>,
}

impl DashboardState {
    /// State with every panel loading and no selection yet
    pub fn new(panels: &[PanelDefinition]) -> Self {
        Self {
            selection: None,
            panels: panels
                .iter()
                .map(|panel| PanelView {
                    panel: panel.id.to_string(),
                    title: panel.presentation.title.to_string(),
                    state: PanelState::Loading,
                })
                .collect(),
        }
    }

    pub fn selection(&self) -> Option<SemesterSelection> {
        self.selection
    }

    pub fn semester(&self) -> Option<Semester> {
        self.selection.map(|s| s.semester)
    }

    /// Switch to a new selection; every panel goes back to loading.
    ///
    /// A selection older than the current one is ignored.
    pub fn begin(&mut self, selection: SemesterSelection) -> bool {
        if let Some(current) = self.selection {
            if selection.generation < current.generation {
                return false;
            }
        }
        self.selection = Some(selection);
        for view in &mut self.panels {
            view.state = PanelState::Loading;
        }
        true
    }

    /// Record the result of one panel's load.
    ///
    /// Results from any generation other than the current one are discarded.
    pub fn apply(&mut self, generation: u64, panel: &str, state: PanelState) -> bool {
        let current = self.selection.map(|s| s.generation);
        if current != Some(generation) {
            debug!(
                "Discarding {} result from generation {} (current {:?})",
                panel, generation, current
            );
            return false;
        }

        match self.panels.iter_mut().find(|view| view.panel == panel) {
            Some(view) => {
                view.state = state;
                true
            }
            None => {
                debug!("Ignoring result for unregistered panel {}", panel);
                false
            }
        }
    }

    pub fn panel(&self, panel: &str) -> Option<&PanelView> {
        self.panels.iter().find(|view| view.panel == panel)
    }

    pub fn panels(&self) -> &[PanelView] {
        &self.panels
    }

    /// True once no panel is waiting on a fetch
    pub fn is_settled(&self) -> bool {
        self.panels.iter().all(|view| view.state != PanelState::Loading)
    }
}
