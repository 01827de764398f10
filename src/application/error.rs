// Application-level errors surfaced to the presentation layer
use crate::domain::profile::ProfileError;
use crate::domain::quiz::QuizError;
use crate::domain::time_series::SeriesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown series source: {0}")]
    UnknownSource(String),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("export failed: {0}")]
    Export(String),
}
