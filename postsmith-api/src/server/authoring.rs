use crate::server::{AppMode, ServerError};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

/// Extracting this fails in production. Put it before any body extractor so
/// the request is refused before its body is read.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct AuthoringEnabled;

impl<S> FromRequestParts<S> for AuthoringEnabled
where
    AppMode: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AppMode::from_ref(state) {
            AppMode::Development => Ok(Self),
            AppMode::Production => Err(ServerError::NotAvailableInProduction),
        }
    }
}
