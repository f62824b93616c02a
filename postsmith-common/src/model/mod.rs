pub mod frontmatter;
pub mod post;
pub mod quotes;

use crate::model::{frontmatter::InvalidDateError, post::MissingFieldsError};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    MissingFields(#[from] MissingFieldsError),
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
}
