use thiserror::Error;

use crate::api::ProfileId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown profile id: {id}")]
    UnknownProfile { id: ProfileId },

    #[error("a save request is already in flight")]
    SaveInFlight,

    #[error("no save request is pending")]
    NoPendingSave,

    #[error("persistence failure: {0}")]
    Persistence(String),
}
