use thiserror::Error;

// === TabError ===

/// Errors related to tab lookups by identity.
#[derive(Debug, Error)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(String),
    /// The provided tab index is out of bounds.
    #[error("Invalid tab index: {0}")]
    InvalidIndex(usize),
}

// === CodecError ===

/// Errors raised while decoding a property map.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A required key was absent.
    #[error("Missing key: {0}")]
    MissingKey(String),
    /// The map was present but did not have the expected shape.
    #[error("Malformed property map: {0}")]
    Malformed(String),
}

// === PayloadError ===

/// Errors related to drag item provider data.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The item was offered under a type identifier we cannot read.
    #[error("Unsupported type identifier: expected one of {expected:?}, got {actual:?}")]
    NotSupported {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    /// The item data could not be decoded.
    #[error("Invalid drag payload: {0}")]
    Invalid(String),
}

// === BusError ===

/// Errors related to the cross-window event bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// Handler subscriptions need a running tokio runtime.
    #[error("No async runtime available for subscription")]
    NoRuntime,
    /// The subscription handle is not (or no longer) registered.
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(u64),
}

// === PersistError ===

/// Errors related to window state persistence.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Failed to serialize window state.
    #[error("Window state serialization error: {0}")]
    SerializationError(String),
    /// Database operation failed.
    #[error("Window state database error: {0}")]
    DatabaseError(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(e: rusqlite::Error) -> Self {
        PersistError::DatabaseError(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AppError ===

/// Errors raised while bringing the application up.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}
