use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Message for the first violated field, e.g. `Field 'title': Title length must be ...`.
///
/// Fields are ordered by name so the message is stable across runs.
pub fn first_violation(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("Field '{field}': {message}")
            })
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}

/// Validates a deserialized payload, mapping violations to a 400.
pub fn validate<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(first_violation(&e)))
}

/// `Json<T>` that also runs `validator` rules. Rejects through [`AppError`].
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        validate(&payload)?;
        Ok(ValidJson(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ad::CreateAdRequest;

    #[test]
    fn reports_a_single_field_with_its_message() {
        let payload = CreateAdRequest {
            title: "abc".into(),
            description: "long enough".into(),
            price: 10,
        };
        let err = validate(&payload).unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert!(msg.starts_with("Field 'title': "), "{msg}");
                assert!(msg.contains("between 4 and 32"), "{msg}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn first_violation_is_stable_by_field_name() {
        let payload = CreateAdRequest {
            title: "abc".into(),
            description: "short".into(),
            price: -5,
        };
        let errors = payload.validate().unwrap_err();
        assert!(first_violation(&errors).starts_with("Field 'description': "));
    }
}
