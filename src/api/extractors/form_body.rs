//! Form extractor whose rejections use the API error body.

use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequest, Request},
    Form,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// URL-encoded form body. Malformed bodies become a 400 `AppError`
/// instead of axum's plain-text rejection.
pub struct FormBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        Ok(FormBody(value))
    }
}
