use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::github::GithubUser;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Success envelope shared by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthSuccess {
    pub message: String,
    pub user_id: Uuid,
    pub email: String,
    pub auth_token: String,
}

/// Claims echoed back by the verify endpoint.
#[derive(Debug, Serialize)]
pub struct TokenUser {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub user_data: TokenUser,
}

/// Query carrying the GitHub OAuth authorization code.
#[derive(Debug, Deserialize)]
pub struct GithubTokenQuery {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct GithubLinkResponse {
    pub message: String,
    pub user_data: GithubUser,
    pub auth_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_success_serializes_user_id_as_string() {
        let response = AuthSuccess {
            message: "User created successfully".into(),
            user_id: Uuid::new_v4(),
            email: "a@b.com".into(),
            auth_token: "tok".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["user_id"].is_string());
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn verify_response_shape() {
        let response = VerifyResponse {
            success: true,
            message: "Token is valid".into(),
            user_data: TokenUser {
                user_id: Uuid::new_v4(),
                email: "a@b.com".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["user_data"]["email"], "a@b.com");
    }
}
