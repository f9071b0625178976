//! JSON extractor that runs `validator` rules before the handler sees the body.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// Deserialized and validated JSON body.
///
/// A body that does not parse is a 400 `BadRequest`; a body that parses but
/// breaks a rule is a 400 `Validation` carrying the rule messages.
///
/// ```rust,ignore
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) {
///     // every #[validate] rule on LoginRequest already holds
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(validation_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Rule messages in field order, "<field> is invalid" where a rule has none.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Credentials {
        #[validate(length(min = 1, message = "Username not specified."))]
        username: String,
        #[validate(length(min = 1, message = "Password not specified."))]
        password: String,
        #[validate(length(max = 2))]
        locale: String,
    }

    fn credentials(username: &str, password: &str, locale: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
            locale: locale.to_string(),
        }
    }

    #[test]
    fn test_messages_are_joined_in_field_order() {
        let errors = credentials("", "", "en").validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Password not specified. Username not specified."
        );
    }

    #[test]
    fn test_rule_without_message_names_the_field() {
        let errors = credentials("alice", "pw", "zh-cn").validate().unwrap_err();
        assert_eq!(validation_message(&errors), "locale is invalid");
    }

    #[test]
    fn test_valid_body_has_no_errors() {
        assert!(credentials("alice", "pw", "en").validate().is_ok());
    }
}
