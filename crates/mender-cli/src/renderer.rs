//! Terminal rendering of markdown output.

use termimad::{crossterm::style::Color, MadSkin};

/// Prints markdown through termimad, or verbatim when colors are disabled.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::White);
        skin.inline_code.set_fg(Color::Green);
        // command output blocks
        skin.code_block.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) {
        if self.rich_enabled {
            self.skin.print_text(markdown);
        } else {
            print!("{markdown}");
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
