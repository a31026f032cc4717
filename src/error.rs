use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbsqlError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Lookup error: {0}")]
    Lookup(String),
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, ProbsqlError>;

// Helper conversions
impl From<config::ConfigError> for ProbsqlError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for ProbsqlError {
    fn from(e: serde_json::Error) -> Self { Self::Encoding(e.to_string()) }
}
