use thiserror::Error;

// ---------------------------------------------------------------------------
// PropertyError
// ---------------------------------------------------------------------------

/// Failure of a single nested-property write.
///
/// `UnsafePath` and `NotApplicable` are soft outcomes: bulk callers count them
/// per item and keep going. `ReadOnly` and `Function` mean the caller named a
/// property that can never be assigned and are surfaced as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("Unsafe property path \"{path}\": segment \"{segment}\" escapes the object's own properties")]
    UnsafePath { path: String, segment: String },

    #[error("Property path \"{path}\" does not resolve on this object")]
    NotApplicable { path: String },

    #[error("Cannot assign to read-only property \"{path}\"")]
    ReadOnly { path: String },

    #[error("Cannot overwrite method \"{path}\"")]
    Function { path: String },
}

impl PropertyError {
    /// Whether a bulk write should stop on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ReadOnly { .. } | Self::Function { .. })
    }
}

// ---------------------------------------------------------------------------
// NativeError
// ---------------------------------------------------------------------------

/// Error raised by a wrapped native collection.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("Native collection rejected the item: {reason}")]
    Rejected { reason: String },

    #[error(transparent)]
    Engine(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl NativeError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CollectionError: top-level rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Native(#[from] NativeError),
}

/// Convenience alias: the default error type is `CollectionError`.
pub type Result<T, E = CollectionError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
