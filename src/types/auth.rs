use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{User, UserRole};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Session tokens are issued by the server and validated on every request
/// that needs them; there is no server-side session state.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
