//! Error types for pgtable

use thiserror::Error;

/// Result type alias for pgtable operations
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors raised while reflecting an entity or assembling a statement.
///
/// Construction errors are stored on the [`Table`](crate::Table) and returned
/// from [`Table::err`](crate::Table::err); every other variant aborts only the
/// call that produced it and never comes with partial SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// The entity description cannot be turned into a table
    #[error("Construction error: {0}")]
    Construction(String),

    /// An order/filter/update/raw reference names a field that is not a column
    #[error("{op}: invalid field '{field}'")]
    InvalidField { op: &'static str, field: String },

    /// UPDATE without any value to set
    #[error("{op}: no values to set")]
    EmptySet { op: &'static str },

    /// Raw clause `?` markers and arguments do not line up
    #[error("{op}: raw clause has {markers} '?' markers but {args} arguments")]
    RawPlaceholders {
        op: &'static str,
        markers: usize,
        args: usize,
    },

    /// A raw clause list argument has no elements to expand
    #[error("{op}: raw clause argument {index} is an empty list")]
    EmptyList { op: &'static str, index: usize },

    /// A value cannot be assigned to a field of another kind
    #[error("cannot set field '{field}' ({expected}) from {found}")]
    ValueType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl BuilderError {
    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Create an invalid field error for operation `op`
    pub fn invalid_field(op: &'static str, field: impl Into<String>) -> Self {
        Self::InvalidField {
            op,
            field: field.into(),
        }
    }

    /// Re-tag an error raised by an inner step with the public operation name.
    pub(crate) fn in_op(self, op: &'static str) -> Self {
        match self {
            Self::InvalidField { field, .. } => Self::InvalidField { op, field },
            Self::EmptySet { .. } => Self::EmptySet { op },
            Self::RawPlaceholders { markers, args, .. } => Self::RawPlaceholders { op, markers, args },
            Self::EmptyList { index, .. } => Self::EmptyList { op, index },
            other => other,
        }
    }

    /// Check if this is an invalid field error
    pub fn is_invalid_field(&self) -> bool {
        matches!(self, Self::InvalidField { .. })
    }

    /// Check if this is a construction error
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }
}
