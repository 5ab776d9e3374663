use crate::schema::ValueType;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the attribute engine.
///
/// All of these are validation failures on caller input or on persisted data;
/// none are retried or recovered from internally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A value passed to `set` does not fit the declared schema.
    #[error("{key}: expected a value of type {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        found: &'static str,
    },

    /// A stored string could not be read back as the declared scalar type.
    #[error("{key}: cannot read {value:?} as {expected}")]
    Coercion {
        key: String,
        value: String,
        expected: ValueType,
    },

    /// The key-path does not address anything in the schema.
    #[error("{key}: {reason}")]
    SchemaLookup { key: String, reason: String },

    /// A list is longer than the codec will read or write.
    #[error("{key}: {len} list elements exceed the limit of {max}")]
    ListTooLong { key: String, len: u64, max: usize },

    /// The schema set itself is malformed.
    #[error("invalid schema for {key}: {reason}")]
    InvalidSchema { key: String, reason: String },
}

impl Error {
    pub(crate) fn lookup(key: &str, reason: impl Into<String>) -> Self {
        Error::SchemaLookup {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_schema(key: &str, reason: impl Into<String>) -> Self {
        Error::InvalidSchema {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    /// The key-path the error refers to.
    pub fn key(&self) -> &str {
        match self {
            Error::TypeMismatch { key, .. }
            | Error::Coercion { key, .. }
            | Error::SchemaLookup { key, .. }
            | Error::ListTooLong { key, .. }
            | Error::InvalidSchema { key, .. } => key,
        }
    }
}
