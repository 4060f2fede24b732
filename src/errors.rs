#[derive(Debug, thiserror::Error)]
pub enum RefererError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Referer value with key \"{0}\" does not exist")]
    UnknownKey(String),

    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
}
