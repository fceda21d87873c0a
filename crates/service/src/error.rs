use sched_core::credentials::CredentialError;
use sched_core::{PlacementError, StoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
