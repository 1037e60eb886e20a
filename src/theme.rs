//! One Dark colours for the terminal UI.

use ratatui::style::Color;

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

#[derive(Debug, Clone)]
pub struct Theme {
    /// Reel accents, one per column: green, yellow, blue, magenta.
    pub reel: [Color; 4],
    pub bg: Color,
    /// Borders and separators.
    pub div_line: Color,
    pub main_fg: Color,
    pub title: Color,
    pub inactive_fg: Color,
    /// Landed tricks and confirmations.
    pub good: Color,
    /// Destructive prompts.
    pub warn: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark()
    }
}

impl Theme {
    pub fn onedark() -> Self {
        Self {
            reel: [rgb(0x98C379), rgb(0xE5C07B), rgb(0x61AFEF), rgb(0xC678DD)],
            bg: rgb(0x31353F),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
            good: rgb(0x56B6C2),
            warn: rgb(0xE06C75),
        }
    }

    #[inline]
    pub fn reel_color(&self, index: usize) -> Color {
        self.reel[index % self.reel.len()]
    }
}
