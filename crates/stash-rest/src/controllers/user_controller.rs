//! User lookup controller.

use crate::{responses::AppError, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use stash_core::{StashError, UserId};
use stash_service::UserLookupService;
use tracing::debug;

/// Body served for ids that resolve to no record.
pub const USER_NOT_FOUND: &str = "User not found";

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new().route("/user/:id", get(get_user).post(get_user))
}

/// Look a user up by id.
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User line, or \"User not found\"", body = String, content_type = "text/plain"),
        (status = 400, description = "Id is not an integer", body = stash_core::ErrorResponse),
        (status = 404, description = "Unknown id, strict mode only", body = String, content_type = "text/plain"),
        (status = 500, description = "Cache or store failure", body = stash_core::ErrorResponse),
        (status = 503, description = "Lookup timed out", body = stash_core::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;

    let response = match state.user_lookup.get_user(user_id).await? {
        Some(user) => user.display_line().into_response(),
        None if state.strict_not_found => (StatusCode::NOT_FOUND, USER_NOT_FOUND).into_response(),
        None => USER_NOT_FOUND.into_response(),
    };
    Ok(response)
}

fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id)
        .map_err(|_| AppError(StashError::validation(format!("Invalid user ID: {}", id))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("1").unwrap(), UserId::new(1));
        assert_eq!(parse_user_id("-5").unwrap(), UserId::new(-5));
        assert!(parse_user_id("abc").is_err());
        assert!(parse_user_id("1.5").is_err());
    }
}
