//! Single fixed palette for the UI.

use once_cell::sync::Lazy;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Palette {
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub border: Color,
    pub accent: Color,
    pub playing: Color,
    pub error: Color,
}

pub static PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    fg_primary: Color::Gray,
    fg_secondary: Color::DarkGray,
    border: Color::DarkGray,
    accent: Color::Cyan,
    playing: Color::Green,
    error: Color::Red,
});
