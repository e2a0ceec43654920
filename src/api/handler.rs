use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// The client-visible part of an account; the password hash stays on the server.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub balance: f64,
}

impl From<UserAccount> for UserView {
    fn from(account: UserAccount) -> Self {
        UserView {
            id: account.id,
            username: account.username,
            balance: account.balance,
        }
    }
}

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    body: CredentialsRequest,
    credential_service: Arc<dyn CredentialService>,
    context: Arc<ApiContext>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let register_input = RegisterInput {
        username: body.username,
        password: body.password,
    };
    let account = credential_service
        .register(register_input)
        .await
        .map_err(|e| context.reject(e))?;

    let api_response = ApiResponse::ok(
        context.messages.register_succeeded(),
        UserView::from(account),
    );
    Ok(warp::reply::json(&api_response))
}

pub async fn login(
    body: CredentialsRequest,
    credential_service: Arc<dyn CredentialService>,
    context: Arc<ApiContext>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_input = LoginInput {
        username: body.username,
        password: body.password,
    };
    let account = credential_service
        .login(login_input)
        .await
        .map_err(|e| context.reject(e))?;

    let api_response =
        ApiResponse::ok(context.messages.login_succeeded(), UserView::from(account));
    Ok(warp::reply::json(&api_response))
}
