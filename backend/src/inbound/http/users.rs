//! Explorer registration and lookup handlers.
//!
//! ```text
//! POST /api/v1/users
//! GET  /api/v1/users/{userId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_username};

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    /// 3 to 32 letters, digits, or underscores.
    #[schema(example = "ada_lovelace")]
    pub username: String,
}

/// Explorer profile with experience totals.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub username: String,
    pub total_xp: u64,
    pub level: u64,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            total_xp: user.total_xp,
            level: user.level,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Register a new explorer at level 1 with no experience.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Explorer registered", body = UserResponse),
        (status = 400, description = "Invalid username", body = ErrorSchema),
        (status = 409, description = "Username already taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let username = parse_username(payload.into_inner().username)?;
    let user = state.users.register_user(username).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Fetch an explorer by id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, format = "uuid", description = "Explorer id")),
    responses(
        (status = 200, description = "Explorer", body = UserResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown explorer", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{userId}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id: UserId = parse_id(&path.into_inner(), FieldName::new("userId"))?;
    let user = state.users_query.get_user(&user_id).await?;
    Ok(web::Json(UserResponse::from(user)))
}
