//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;

/// Errors emitted by `ProgressionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the attempt workflow. A failed load or attempt-start is
/// terminal for the session; the student has to navigate away and reopen.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AttemptError {
    /// User-facing explanation, in the product's Ukrainian copy. The HTTP
    /// taxonomy gets a specific message; everything else is generic with the
    /// raw detail appended.
    #[must_use]
    pub fn user_message(&self) -> String {
        let AttemptError::Api(api) = self;
        match api {
            ApiError::NotFound => "Тест не знайдено або ще не опубліковано.".to_string(),
            ApiError::Forbidden => {
                "Тест тимчасово недоступний: перевірте вікно доступу або права.".to_string()
            }
            ApiError::Unauthorized => {
                "Потрібен вхід. Оновіть сторінку або увійдіть ще раз.".to_string()
            }
            ApiError::Status { code, body } => {
                format!("Не вдалося виконати запит (статус {code}). {body}")
            }
            other => format!("Не вдалося виконати запит. {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_taxonomy_maps_to_distinct_messages() {
        let not_found = AttemptError::from(ApiError::NotFound).user_message();
        let forbidden = AttemptError::from(ApiError::Forbidden).user_message();
        let unauthorized = AttemptError::from(ApiError::Unauthorized).user_message();

        assert!(not_found.contains("не знайдено"));
        assert!(forbidden.contains("недоступний"));
        assert!(unauthorized.contains("вхід"));
        assert_ne!(not_found, forbidden);
        assert_ne!(forbidden, unauthorized);
    }

    #[test]
    fn generic_status_keeps_code_and_body() {
        let err = AttemptError::from(ApiError::Status {
            code: 500,
            body: "boom".into(),
        });
        let message = err.user_message();
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }
}
