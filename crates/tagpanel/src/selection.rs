//! Selection coordinator
//!
//! Exactly one of the two views is authoritative for the current selection.
//! When a view reports a change, the other view is cleared and the selection
//! set is recomputed from the authoritative view alone.

use tagpanel_core::ObjectRef;
use tagpanel_widgets::TreeModel;

/// Which of the two trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewSide {
    /// Unmatched files and clusters
    #[default]
    Files,
    /// Albums with their tracks
    Albums,
}

impl ViewSide {
    pub const BOTH: [ViewSide; 2] = [ViewSide::Files, ViewSide::Albums];

    pub fn other(self) -> Self {
        match self {
            ViewSide::Files => ViewSide::Albums,
            ViewSide::Albums => ViewSide::Files,
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    selected_view: ViewSide,
    /// Set while a change is being propagated
    ignore_changes: bool,
    selected: Vec<ObjectRef>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// View that currently owns the selection
    pub fn selected_view(&self) -> ViewSide {
        self.selected_view
    }

    /// Current selection set, in the authoritative view's tree order
    pub fn selected_objects(&self) -> &[ObjectRef] {
        &self.selected
    }

    /// Handle a selection change reported by `side`.
    ///
    /// Returns the new selection set to publish, or `None` when the change is
    /// the echo of a clear issued by this coordinator.
    pub fn selection_changed(
        &mut self,
        side: ViewSide,
        files: &mut TreeModel,
        albums: &mut TreeModel,
    ) -> Option<Vec<ObjectRef>> {
        if self.ignore_changes {
            return None;
        }
        self.ignore_changes = true;
        let (source, other) = match side {
            ViewSide::Files => (files, albums),
            ViewSide::Albums => (albums, files),
        };
        self.selected_view = side;
        other.clear_selection();
        // Swallow the change notification our own clear produced
        other.take_selection_changed();
        self.selected = collect_unique(source.selected_objects());
        self.ignore_changes = false;
        Some(self.selected.clone())
    }

    /// Recompute the set after nodes of the authoritative view were updated
    pub fn refresh(&mut self, authoritative: &TreeModel) -> Vec<ObjectRef> {
        self.selected = collect_unique(authoritative.selected_objects());
        self.selected.clone()
    }
}

fn collect_unique(objects: Vec<ObjectRef>) -> Vec<ObjectRef> {
    let mut seen = std::collections::HashSet::new();
    objects.into_iter().filter(|o| seen.insert(*o)).collect()
}
