//! Trellis compiler: lowers regex syntax trees into published character classes.
//!
//! The pipeline runs in two halves:
//! - `rewrite` - pure tree transformation (no machine writes)
//! - `publish` - writes classes through the `registry`, then runs the `optimize` passes
//!
//! Supporting modules:
//! - `tree` - node arena, builder, and dump
//! - `properties` - property lookup collaborator and cache
//! - `diagnostics` - advisory and fatal reporting
//! - `compiler` - the `Compiler` facade

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod compiler;
pub mod diagnostics;
pub mod optimize;
pub mod options;
pub mod properties;
pub mod publish;
pub mod registry;
pub mod rewrite;
mod span;
pub mod tree;

#[cfg(test)]
pub mod test_utils;

use std::fmt;

use trellis_bytecode::MachineError;
use trellis_core::{Encoding, GraphError};

pub use compiler::{Compiler, CompilerBuilder};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use options::{CompileOptions, OptimizerConfig};
pub use properties::{BuiltinProperties, PropertyCache, PropertySource};
pub use publish::PublishedPattern;
pub use registry::Registry;
pub use rewrite::CompiledPattern;
pub use span::Span;
pub use tree::{AnchorKind, Node, NodeId, NodeKind, Relation, SyntaxTree, TreeBuilder};

/// What required an auxiliary class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxTrigger {
    Anchor(AnchorKind),
    /// `.` without dot-all, which must exclude newlines.
    Dot,
}

impl fmt::Display for AuxTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anchor(kind) => write!(f, "{kind} anchor"),
            Self::Dot => f.write_str("dot"),
        }
    }
}

/// Fatal compile errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unsupported encoding `{0}`")]
    UnsupportedEncoding(String),

    #[error("pattern can never match under encoding {encoding}")]
    VoidPattern { encoding: Encoding, span: Span },

    #[error("cannot build {trigger}: `{class}` is unavailable under encoding {encoding}")]
    MissingAuxiliary {
        trigger: AuxTrigger,
        class: String,
        encoding: Encoding,
        span: Span,
    },

    /// The machine has no room left; the caller may retry against a fresh machine.
    #[error(transparent)]
    OutOfSpace(MachineError),

    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
}

/// Consistency failures that a well-formed tree never triggers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error("class merge stalled with {pending} nodes pending")]
    StalledMerge { pending: usize },

    #[error("unexpected {kind} node at {span}")]
    UnexpectedNode { kind: &'static str, span: Span },

    #[error("reference from {from} to later node {to}")]
    ForwardReference { from: NodeId, to: NodeId },

    #[error("allocation failed after capacity check: {0}")]
    AllocationAfterCheck(MachineError),

    #[error(transparent)]
    Automaton(#[from] GraphError),
}

impl From<MachineError> for Error {
    fn from(err: MachineError) -> Self {
        match err {
            MachineError::Automaton(err) => Self::Internal(err.into()),
            full @ MachineError::OutOfSpace { .. } => Self::OutOfSpace(full),
        }
    }
}

impl Error {
    /// Source position of the failing construct, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::VoidPattern { span, .. } | Self::MissingAuxiliary { span, .. } => Some(*span),
            Self::Internal(InternalError::UnexpectedNode { span, .. }) => Some(*span),
            _ => None,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::UnsupportedEncoding(_) => DiagnosticKind::UnsupportedEncoding,
            Self::VoidPattern { .. } => DiagnosticKind::VoidPattern,
            Self::MissingAuxiliary { .. } => DiagnosticKind::MissingAuxiliary,
            Self::OutOfSpace(_) => DiagnosticKind::MachineFull,
            Self::Internal(_) => DiagnosticKind::InternalError,
        }
    }

    /// Record this error as an error-severity diagnostic.
    pub fn report(&self, diagnostics: &mut Diagnostics) {
        let span = self.span().unwrap_or_default();
        let builder = diagnostics.report(self.kind(), span);
        match self {
            Self::UnsupportedEncoding(name) => builder.message(name.as_str()).emit(),
            Self::VoidPattern { encoding, .. } => builder.message(encoding.name()).emit(),
            other => builder.message(other.to_string()).emit(),
        }
    }
}

/// Result type for compile operations.
pub type Result<T> = std::result::Result<T, Error>;
