use std::fmt;

// === BookmarkError ===

/// Errors related to bookmark and database operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    /// The provided string is not a valid absolute URL.
    InvalidUrl(String),
    /// No bookmark is stored under the given URL.
    NotFound(String),
    /// The persisted database file could not be parsed.
    CorruptData(String),
    /// The database has no file to persist to.
    NoFileConfigured,
    /// Reading or writing the database file failed.
    IoError(String),
    /// The request did not pass the credential check.
    Unauthorized,
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            BookmarkError::NotFound(url) => write!(f, "Bookmark not found: {}", url),
            BookmarkError::CorruptData(msg) => write!(f, "Corrupt database file: {}", msg),
            BookmarkError::NoFileConfigured => write!(f, "No database file configured"),
            BookmarkError::IoError(msg) => write!(f, "Database I/O error: {}", msg),
            BookmarkError::Unauthorized => write!(f, "Access denied"),
        }
    }
}

impl std::error::Error for BookmarkError {}

// === TitleError ===

/// Errors raised while resolving a page title. Never surfaced past bookmark creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    /// The page could not be fetched.
    NetworkError(String),
    /// The response body could not be read.
    ReadError(String),
    /// The page has no `<title>` element.
    NoTitle,
    /// The YouTube Data API lookup failed.
    ApiError(String),
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleError::NetworkError(msg) => write!(f, "Title fetch network error: {}", msg),
            TitleError::ReadError(msg) => write!(f, "Title fetch read error: {}", msg),
            TitleError::NoTitle => write!(f, "No title element found"),
            TitleError::ApiError(msg) => write!(f, "Title API error: {}", msg),
        }
    }
}

impl std::error::Error for TitleError {}

// === ProtocolError ===

/// Errors related to decoding inbound protocol messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The message is not valid JSON or does not match the envelope shape.
    Malformed(String),
    /// The message addresses a data type this server does not handle.
    UnknownType(String),
    /// The action name is not one of create/update/delete/retrieve.
    UnknownAction(String),
    /// A required request field is absent.
    MissingField(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(msg) => write!(f, "Malformed message: {}", msg),
            ProtocolError::UnknownType(t) => write!(f, "Unknown data type: {}", t),
            ProtocolError::UnknownAction(a) => write!(f, "Unknown action: {}", a),
            ProtocolError::MissingField(field) => write!(f, "Missing field: {}", field),
        }
    }
}

impl std::error::Error for ProtocolError {}

// === SettingsError ===

/// Errors related to loading the server configuration.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading the configuration file.
    IoError(String),
    /// Failed to deserialize the configuration file.
    SerializationError(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
