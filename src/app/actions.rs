use super::state::Panel;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    NextPanel,
    PrevPanel,
    SetPanel(Panel),

    FocusInput,
    FocusList,
    InputChar(char),
    Backspace,
    ClearInput,
    /// Context-dependent: run the search, play the pasted URL, or load the
    /// playlist, depending on the active panel.
    Submit,

    ListUp,
    ListDown,
    GoTop,
    GoBottom,
    /// Play the selected card.
    Activate,

    // Pager controls: change the visible page, never the playing index.
    PageNext,
    PagePrev,

    // Playlist playback navigation.
    PlayNext,
    PlayPrev,

    TogglePause,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBack,

    Refresh,
    Resize,
}
