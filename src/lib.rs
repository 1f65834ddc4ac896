#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

pub mod api;
pub mod article;
pub mod comment;
pub mod config;
pub mod db;
pub mod logging;
pub mod topic;
pub mod types;
pub mod users;
pub mod utils;

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Build, Rocket};
use tracing::debug;

use types::{ErrorBody, BAD_REQUEST, INTERNAL_ERROR};

pub const PATH_NOT_FOUND: &str = "Path not found";

#[catch(404)]
fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody::new(PATH_NOT_FOUND))
}

#[catch(400)]
fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new(BAD_REQUEST))
}

// Rocket answers 422 when a JSON body has the wrong shape.
#[catch(422)]
fn unprocessable() -> status::Custom<Json<ErrorBody>> {
    status::Custom(Status::BadRequest, Json(ErrorBody::new(BAD_REQUEST)))
}

#[catch(default)]
fn fallback(status: Status, req: &Request) -> status::Custom<Json<ErrorBody>> {
    let msg = if status.code >= 500 {
        INTERNAL_ERROR
    } else {
        status.reason().unwrap_or(BAD_REQUEST)
    };
    debug!("{} on {} {}", status, req.method(), req.uri());
    status::Custom(status, Json(ErrorBody::new(msg)))
}

pub fn rocket(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .mount("/", routes![api::describe])
        .mount("/api", routes![topic::list, topic::create])
        .mount(
            "/api",
            routes![
                article::list,
                article::create,
                article::get,
                article::vote,
                article::delete
            ],
        )
        .mount(
            "/api",
            routes![comment::list, comment::add, comment::vote, comment::delete],
        )
        .mount("/api", routes![users::list, users::get])
        .register("/", catchers![not_found, bad_request, unprocessable, fallback])
}
