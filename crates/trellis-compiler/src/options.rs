//! Compile flags and optimizer tuning.

use serde::{Deserialize, Serialize};

/// Per-pattern compile flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Encoding name, normalised on use (`utf-8`, `UTF_8` and `utf8` all work).
    pub encoding: String,
    pub ignore_case: bool,
    /// `^` and `$` match at line boundaries instead of buffer boundaries.
    pub multi_line: bool,
    /// `.` also matches newlines.
    pub dot_all: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            encoding: "utf_8".to_string(),
            ignore_case: false,
            multi_line: false,
            dot_all: false,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, name: impl Into<String>) -> Self {
        self.encoding = name.into();
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = value;
        self
    }

    pub fn multi_line(mut self, value: bool) -> Self {
        self.multi_line = value;
        self
    }

    pub fn dot_all(mut self, value: bool) -> Self {
        self.dot_all = value;
        self
    }
}

/// Optimizer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Characters of look-ahead published for the whole pattern.
    pub root_scan_length: usize,
    /// Characters of look-ahead published per alternation and branch.
    pub btree_scan_length: usize,
    /// Branches per synthetic dispatch node.
    pub btree_span: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            root_scan_length: 3,
            btree_scan_length: 5,
            btree_span: 4,
        }
    }
}

impl OptimizerConfig {
    /// Alternations with more branches than this are split into dispatch nodes.
    pub fn btree_threshold(&self) -> usize {
        self.btree_span * 3 / 2
    }
}
