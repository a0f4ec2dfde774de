use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblerError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content source error: {message}")]
    Source { message: String },

    #[error("unknown tool identifier '{id}' in {category_path} (classification table out of sync with content)")]
    UnknownToolId { id: String, category_path: String },

    #[error("glossary identifier '{id}' in {category_path} does not start with a-z")]
    GlossaryOutOfRange { id: String, category_path: String },

    #[error("category '{id}' has no components to splice")]
    EmptyCategory { id: String },

    #[error("destination item already exists: {0}")]
    AlreadyExists(String),

    #[error("destination error: {0}")]
    Destination(String),

    #[error("translation stream failed: {0}")]
    Translation(String),
}

impl AssemblerError {
    /// "Already exists" is the one destination failure a re-run is allowed
    /// to swallow.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, AssemblerError::AlreadyExists(_))
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
