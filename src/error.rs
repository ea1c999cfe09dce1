pub type MigrateResult<T> = Result<T, MigrateError>;

#[derive(thiserror::Error, Debug)]
pub enum MigrateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MigrateError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unsupported_version(msg: impl Into<String>) -> Self {
        Self::UnsupportedVersion(msg.into())
    }
}
