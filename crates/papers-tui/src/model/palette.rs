use ratatui::layout::Rect;

/// Command palette overlay. Matches come from the Home course index.
#[derive(Debug, Default)]
pub struct PaletteState {
    pub open: bool,
    pub query: String,
    pub cursor: usize,
    /// Last rendered popup bounds, for click-outside-to-close.
    pub area: Option<Rect>,
}

impl PaletteState {
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.area = None;
    }

    /// Whether a click at (`x`, `y`) lands inside the popup.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.area.is_some_and(|a| {
            x >= a.x && x < a.x.saturating_add(a.width) && y >= a.y && y < a.y.saturating_add(a.height)
        })
    }
}
