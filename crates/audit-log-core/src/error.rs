use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid {name} header: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("address resolution failed: {0}")]
    AddressResolution(String),

    #[error("user resolution failed: {0}")]
    UserResolution(String),

    #[error("emission failed: {0}")]
    Emission(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
