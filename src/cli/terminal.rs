//! Colours for `check` and `outline` output

use owo_colors::{OwoColorize, colors::css};

/// Detects whether coloured output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// What a piece of output says about the content it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    /// A file with no problems.
    Clean,
    /// Issues or a load failure.
    Problem,
    /// A standard or reference code.
    Code,
    /// Secondary detail such as anchors and content kinds.
    Muted,
}

impl Tone {
    fn paint(self, text: &str, enabled: bool) -> String {
        if !enabled {
            return text.to_string();
        }
        match self {
            Self::Clean => text.fg::<css::Green>().to_string(),
            Self::Problem => text.fg::<css::Orange>().to_string(),
            Self::Code => text.fg::<css::LightBlue>().to_string(),
            Self::Muted => text.dimmed().to_string(),
        }
    }
}

/// Extension trait for colouring output
pub trait Colorize {
    /// Green, for clean files
    fn clean(&self) -> String;
    /// Amber, for issues and errors
    fn problem(&self) -> String;
    /// Blue, for codes
    fn code(&self) -> String;
    /// Dimmed
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn clean(&self) -> String {
        Tone::Clean.paint(self.as_ref(), supports_color())
    }

    fn problem(&self) -> String {
        Tone::Problem.paint(self.as_ref(), supports_color())
    }

    fn code(&self) -> String {
        Tone::Code.paint(self.as_ref(), supports_color())
    }

    fn dim(&self) -> String {
        Tone::Muted.paint(self.as_ref(), supports_color())
    }
}
