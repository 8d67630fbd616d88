//! ANSI color codes for dumps of graphs, state tables and trees.
//!
//! - Blue: state ids, node kinds
//! - Green: byte sets, class text
//! - Dim: structure and metadata
//! - Reset: return to default

/// ANSI color palette for dump output.
///
/// Only standard 16-color codes, so both light and dark themes stay readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.blue.is_empty()
    }

    /// Wrap `text` in the given color and reset.
    pub fn paint(&self, color: &'static str, text: impl std::fmt::Display) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{color}{text}{}", self.reset)
        }
    }
}
