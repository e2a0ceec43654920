use super::handler::ApiResponse;
use super::messages::Messages;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::{Rejection, reject};

/// Turn rejections into the response envelope.
///
/// Domain failures and malformed bodies keep HTTP 200 and report `success: false`,
/// which is what existing clients check. Routing failures keep their status code.
pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, message) = if let Some(rejection) = err.find::<ApiRejection>() {
        (StatusCode::OK, rejection.message.clone())
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        debug!("malformed request body: {}", e);
        (StatusCode::OK, e.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "expected a JSON body".to_string(),
        )
    } else if err.find::<reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "content-length required".to_string())
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
    } else {
        warn!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled error: {:?}", err),
        )
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(message));
    Ok(warp::reply::with_status(json, status))
}

/// Client-facing texts for each code live in `Messages::error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiErrorCode {
    UsernameTaken,
    UserNotFound,
    IncorrectPassword,
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl From<&CredentialError> for ApiErrorCode {
    fn from(error: &CredentialError) -> Self {
        match error {
            CredentialError::Conflict => ApiErrorCode::UsernameTaken,
            CredentialError::NotFound => ApiErrorCode::UserNotFound,
            CredentialError::InvalidCredentials => ApiErrorCode::IncorrectPassword,
            CredentialError::Store(e) => ApiErrorCode::internal(e),
            CredentialError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

/// A failed request, already rendered into the client's language.
#[derive(Debug)]
pub struct ApiRejection {
    pub code: ApiErrorCode,
    pub message: String,
}

impl reject::Reject for ApiRejection {}

/// Per-server response settings shared by all handlers.
#[derive(Debug, Clone)]
pub struct ApiContext {
    pub messages: Messages,
    pub expose_internal_errors: bool,
}

impl ApiContext {
    pub fn new(messages: Messages, expose_internal_errors: bool) -> Self {
        ApiContext {
            messages,
            expose_internal_errors,
        }
    }

    pub fn reject(&self, error: CredentialError) -> Rejection {
        let code = ApiErrorCode::from(&error);
        let message = match code {
            ApiErrorCode::InternalError if self.expose_internal_errors => error.to_string(),
            _ => self.messages.error(code).to_string(),
        };
        reject::custom(ApiRejection { code, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Locale;
    use crate::domain_port::StoreError;

    fn rejection_of(context: &ApiContext, error: CredentialError) -> (ApiErrorCode, String) {
        let rejection = context.reject(error);
        let found = rejection.find::<ApiRejection>().unwrap();
        (found.code, found.message.clone())
    }

    #[test]
    fn domain_errors_use_localized_messages() {
        let context = ApiContext::new(Messages::new(Locale::Zh), true);

        assert_eq!(
            rejection_of(&context, CredentialError::Conflict),
            (ApiErrorCode::UsernameTaken, "用户名已存在".to_string())
        );
        assert_eq!(
            rejection_of(&context, CredentialError::NotFound),
            (ApiErrorCode::UserNotFound, "用户不存在".to_string())
        );
        assert_eq!(
            rejection_of(&context, CredentialError::InvalidCredentials),
            (ApiErrorCode::IncorrectPassword, "密码错误".to_string())
        );
    }

    #[test]
    fn internal_errors_pass_through_only_when_exposed() {
        let store_error = || CredentialError::Store(StoreError::Backend("database is locked".into()));

        let exposing = ApiContext::new(Messages::new(Locale::En), true);
        let (code, message) = rejection_of(&exposing, store_error());
        assert_eq!(code, ApiErrorCode::InternalError);
        assert_eq!(message, "store error: database is locked");

        let hiding = ApiContext::new(Messages::new(Locale::En), false);
        let (code, message) = rejection_of(&hiding, store_error());
        assert_eq!(code, ApiErrorCode::InternalError);
        assert_eq!(message, "internal error");
    }
}
