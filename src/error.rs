use thiserror::Error;

use crate::store::StoreError;

/// Failures that stop the seeding pipeline.
///
/// Identity creation errors never surface here: they are logged and the
/// affected user is skipped.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("bundle {bundle:?} references item {item:?}, which is not in the store")]
    MissingItem { bundle: String, item: String },
}

pub type SeedResult<T> = Result<T, SeedError>;
