use papers_core::filter::filtered_indices;
use papers_core::{
    AllFacetCounts, CatalogScope, Facet, FilterSelection, LoadState, Paper, PaperCatalog,
    facet_counts,
};

use super::home::step;

/// Which half of the Course screen has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Filters,
    Papers,
}

/// State for the Course screen: one scope's catalog plus the filter panel.
///
/// `visible` and `counts` are derived from `catalog` and `selection` and are
/// rebuilt from scratch by [`CourseState::recompute`] after every change.
#[derive(Debug)]
pub struct CourseState {
    pub scope: CatalogScope,
    pub catalog: LoadState<PaperCatalog>,
    /// Id of the latest catalog request; older results are dropped.
    pub request_id: u64,
    pub selection: FilterSelection,
    /// Indices into the catalog of the papers passing the selection.
    pub visible: Vec<usize>,
    pub counts: AllFacetCounts,
    pub focus: Pane,
    /// Chip cursor: row (facet) and column (candidate).
    pub chip_row: usize,
    pub chip_col: usize,
    /// Cursor into `visible`.
    pub paper_cursor: usize,
    /// A refetch is in flight while the loaded catalog stays on screen.
    pub refreshing: bool,
}

impl CourseState {
    pub fn new(scope: CatalogScope) -> Self {
        let mut state = Self {
            scope,
            catalog: LoadState::Idle,
            request_id: 0,
            selection: FilterSelection::new(),
            visible: Vec::new(),
            counts: AllFacetCounts::default(),
            focus: Pane::Papers,
            chip_row: 0,
            chip_col: 0,
            paper_cursor: 0,
            refreshing: false,
        };
        state.recompute();
        state
    }

    /// Full catalog, or empty while loading or after a failure.
    pub fn papers(&self) -> &[Paper] {
        self.catalog
            .loaded()
            .map(|c| c.papers.as_slice())
            .unwrap_or(&[])
    }

    /// Install a freshly loaded catalog with an empty selection.
    pub fn set_loaded(&mut self, catalog: PaperCatalog) {
        self.catalog = LoadState::Loaded(catalog);
        self.selection.clear();
        self.paper_cursor = 0;
        self.recompute();
    }

    /// Swap in a refetched catalog, keeping the selection and cursor.
    pub fn replace_loaded(&mut self, catalog: PaperCatalog) {
        self.catalog = LoadState::Loaded(catalog);
        self.recompute();
    }

    pub fn set_failed(&mut self, message: String) {
        self.catalog = LoadState::Failed(message);
        self.paper_cursor = 0;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        let papers = self.papers();
        let visible = filtered_indices(papers, &self.selection);
        let counts = facet_counts(papers, &self.selection);
        tracing::debug!(
            visible = visible.len(),
            total = papers.len(),
            "recomputed course view"
        );
        self.visible = visible;
        self.counts = counts;
        self.paper_cursor = self
            .paper_cursor
            .min(self.visible.len().saturating_sub(1));
    }

    pub fn chip_facet(&self) -> Facet {
        Facet::ALL[self.chip_row.min(Facet::ALL.len() - 1)]
    }

    /// Candidate value under the chip cursor.
    pub fn chip_value(&self) -> &'static str {
        let candidates = self.chip_facet().candidates();
        candidates[self.chip_col.min(candidates.len() - 1)]
    }

    /// Toggle the chip under the cursor and rebuild the view.
    pub fn toggle_chip(&mut self) -> bool {
        let facet = self.chip_facet();
        let selected = self.selection.toggle(facet, self.chip_value());
        self.recompute();
        selected
    }

    pub fn clear_filters(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    pub fn selected_paper(&self) -> Option<&Paper> {
        self.visible
            .get(self.paper_cursor)
            .and_then(|&i| self.papers().get(i))
    }

    pub fn move_vertical(&mut self, delta: isize) {
        match self.focus {
            Pane::Papers => {
                self.paper_cursor = step(self.paper_cursor, delta, self.visible.len());
            }
            Pane::Filters => {
                self.chip_row = step(self.chip_row, delta, Facet::ALL.len());
                self.chip_col = self
                    .chip_col
                    .min(self.chip_facet().candidates().len() - 1);
            }
        }
    }

    pub fn move_horizontal(&mut self, delta: isize) {
        if self.focus == Pane::Filters {
            let len = self.chip_facet().candidates().len();
            self.chip_col = step(self.chip_col, delta, len);
        }
    }

    pub fn switch_pane(&mut self) {
        self.focus = match self.focus {
            Pane::Filters => Pane::Papers,
            Pane::Papers => Pane::Filters,
        };
    }

    /// Header subtitle for the current load state.
    pub fn subtitle(&self) -> String {
        match &self.catalog {
            LoadState::Loaded(catalog) if self.refreshing => {
                format!("{} (refreshing...)", catalog.subtitle())
            }
            LoadState::Loaded(catalog) => catalog.subtitle(),
            LoadState::Failed(_) => "Failed to load papers".to_string(),
            LoadState::Idle | LoadState::Loading => "Loading papers...".to_string(),
        }
    }
}
