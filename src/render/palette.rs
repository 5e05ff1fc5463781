//! Color definitions and control-sequence markers

use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::Command;

/// Which highlight a day receives; at most one per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighlightStatus {
    Today,
    Workday,
    Holiday,
}

const HOLIDAY_BLUE: Color = Color::Rgb {
    r: 59,
    g: 130,
    b: 246,
};
const WORKDAY_ORANGE: Color = Color::Rgb {
    r: 249,
    g: 115,
    b: 22,
};
const TODAY_GREEN: Color = Color::Rgb {
    r: 52,
    g: 211,
    b: 153,
};
const TITLE_GOLD: Color = Color::Rgb {
    r: 254,
    g: 194,
    b: 96,
};
const HEADER_LAVENDER: Color = Color::Rgb {
    r: 165,
    g: 180,
    b: 252,
};
const MUTED_GRAY: Color = Color::Rgb {
    r: 107,
    g: 114,
    b: 128,
};
const BORDER_SLATE: Color = Color::Rgb {
    r: 71,
    g: 85,
    b: 105,
};

fn ansi(command: impl Command) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = command.write_ansi(&mut out);
    out
}

/// Produces color markers, or nothing at all when color output is disabled.
///
/// This is the only switch for styling: every renderer takes a palette
/// instead of consulting process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn colored() -> Self {
        Self::new(true)
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Color start marker for a highlight status
    pub fn status_start(self, status: HighlightStatus) -> String {
        let color = match status {
            HighlightStatus::Holiday => HOLIDAY_BLUE,
            HighlightStatus::Workday => WORKDAY_ORANGE,
            HighlightStatus::Today => TODAY_GREEN,
        };
        self.fg(color)
    }

    /// Marker that ends any highlight
    pub fn reset(self) -> String {
        if self.enabled {
            ansi(ResetColor)
        } else {
            String::new()
        }
    }

    /// Wrap `text` in the status color
    pub fn paint(self, status: HighlightStatus, text: &str) -> String {
        self.wrap(self.status_start(status), text)
    }

    /// Month title: bold gold
    pub fn title(self, text: &str) -> String {
        self.bold(TITLE_GOLD, text)
    }

    /// Weekday header: bold lavender
    pub fn header(self, text: &str) -> String {
        self.bold(HEADER_LAVENDER, text)
    }

    /// Table border lines
    pub fn border(self, text: &str) -> String {
        self.wrap(self.fg(BORDER_SLATE), text)
    }

    /// Secondary notes such as the color legend
    pub fn muted(self, text: &str) -> String {
        self.wrap(self.fg(MUTED_GRAY), text)
    }

    fn fg(self, color: Color) -> String {
        if self.enabled {
            ansi(SetForegroundColor(color))
        } else {
            String::new()
        }
    }

    fn bold(self, color: Color, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let start = format!("{}{}", ansi(SetAttribute(Attribute::Bold)), self.fg(color));
        self.wrap(start, text)
    }

    fn wrap(self, start: String, text: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        format!("{}{}{}", start, text, self.reset())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}
