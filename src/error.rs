use std::fmt;

use thiserror::Error;

pub use go125_syntax::SyntaxError;

use crate::annotation::{AnnotationError, CodecError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A structural invariant of the model does not hold.
    #[error(transparent)]
    Invalid(#[from] InvalidEntity),

    /// The syntax tree uses a construct the model cannot express.
    #[error("unsupported {what}")]
    Unsupported { what: String },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported { what: what.into() }
    }

    /// Prefixes the path of a structural error with `segment`; other errors
    /// pass through untouched.
    pub(crate) fn within(self, segment: impl fmt::Display) -> Self {
        match self {
            Self::Invalid(inv) => Self::Invalid(inv.within(segment)),
            other => other,
        }
    }
}

/// Path-addressed contract violation, e.g.
/// `Fields[0].Spec: Variable 'TypeName' must be not empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntity {
    path: Vec<String>,
    message: String,
}

impl InvalidEntity {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    pub fn empty(variable: &str) -> Self {
        Self::new(format!("Variable '{variable}' must be not empty"))
    }

    pub fn not_identifier(variable: &str) -> Self {
        Self::new(format!("Variable '{variable}' must be a valid identifier"))
    }

    pub fn within(mut self, segment: impl fmt::Display) -> Self {
        self.path.insert(0, segment.to_string());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Dotted location of the offending entity, empty at the root.
    pub fn path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for InvalidEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path(), self.message)
        }
    }
}

impl std::error::Error for InvalidEntity {}
