use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{ParseIdError, TestResultError};

/// Umbrella error for callers that do not care which domain rule failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    TestResult(#[from] TestResultError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
