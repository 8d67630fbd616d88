use crate::Span;

/// Diagnostic kinds, fatal ones first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Fatal, the pattern cannot be compiled
    UnsupportedEncoding,
    VoidPattern,
    MissingAuxiliary,
    MachineFull,
    InternalError,

    // Advisory, compilation continues
    VoidLeaf,
    MissingProperty,
    VoidGroup,
    VoidAlternation,
    VoidBranch,
    PreviewSkipped,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnsupportedEncoding
            | Self::VoidPattern
            | Self::MissingAuxiliary
            | Self::MachineFull
            | Self::InternalError => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnsupportedEncoding => "unsupported encoding",
            Self::VoidPattern => "pattern can never match",
            Self::MissingAuxiliary => "required characters unavailable",
            Self::MachineFull => "state table is full",
            Self::InternalError => "internal compiler error",

            Self::VoidLeaf => "character class is empty",
            Self::MissingProperty => "unknown property",
            Self::VoidGroup => "sequence can never match",
            Self::VoidAlternation => "no alternative can match",
            Self::VoidBranch => "alternative can never match and was removed",
            Self::PreviewSkipped => "look-ahead preview skipped",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnsupportedEncoding => "unsupported encoding `{}`".to_string(),
            Self::VoidPattern => "pattern can never match under encoding {}".to_string(),
            Self::MissingProperty => "unknown property `{}`, matches nothing".to_string(),
            Self::VoidLeaf => "`{}` is empty in this encoding".to_string(),
            Self::VoidBranch => "alternative `{}` can never match and was removed".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self {
            kind,
            span,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity(), self.span, self.message)?;
        for related in &self.related {
            write!(f, " (related: {} at {})", related.message, related.span)?;
        }
        Ok(())
    }
}
