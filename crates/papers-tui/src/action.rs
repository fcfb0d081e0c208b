/// User-level actions produced by [`crate::input::map_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ForceQuit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    GoTop,
    GoBottom,
    PageUp,
    PageDown,
    /// Enter in normal mode: open, download or activate the item under the cursor.
    DrillIn,
    /// Esc in normal mode.
    NavigateBack,
    /// Space: toggle the chip or the done state under the cursor.
    Toggle,
    /// Tab: switch focus between the filter panel and the paper list.
    SwitchPane,
    ClearFilters,
    Reload,
    CopyUrl,
    OpenAllPapers,
    StartSearch,
    OpenPalette,
    OpenUpload,
    ToggleTheme,
    ToggleHelp,

    // Text entry (search box, palette, upload field editing)
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    DeleteForward,

    ClickAt(u16, u16),
    Resize(u16, u16),
    Tick,
    None,
}
