use rocket::serde::json::Json;

use crate::db::{DbConnection, FindByKey};
use crate::types::{ApiError, ApiResult};

pub mod models;

use self::models::User;

pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    user: User,
}

#[get("/users")]
pub fn list(mut conn: DbConnection) -> ApiResult<UsersResponse> {
    let users = User::all(&mut conn)?;
    Ok(Json(UsersResponse { users }))
}

#[get("/users/<username>")]
pub fn get(mut conn: DbConnection, username: &str) -> ApiResult<UserResponse> {
    let user = User::find_by_key(username, &mut conn)?.ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    Ok(Json(UserResponse { user }))
}
