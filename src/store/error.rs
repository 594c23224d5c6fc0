use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {backend} failed: {source}")]
    Transport {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} rejected {operation} with status {status}: {body}")]
    Rejected {
        backend: &'static str,
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed response from {backend}: {message}")]
    Malformed {
        backend: &'static str,
        message: String,
    },

    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("access token unavailable: {0}")]
    Auth(#[from] crate::google::CredentialError),
}

pub type StoreResult<T> = Result<T, StoreError>;
