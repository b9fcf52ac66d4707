use thiserror::Error;

/// All errors that can occur in catalogist-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown field for {dialect}: {field}")]
    UnknownField { dialect: String, field: String },

    #[error("Field vocabulary mismatch: table is {expected}, row is {found}")]
    VocabularyMismatch { expected: String, found: String },

    #[error("Input not found: {0}")]
    InputNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the CLI.
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    FileSystemError = 4,
    PartialFailure = 5,
}

pub type Result<T> = std::result::Result<T, CoreError>;
