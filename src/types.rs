use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use std::collections::HashMap;
use tracing::{debug, error};

pub const BAD_REQUEST: &str = "Bad request";
pub const NOT_FOUND: &str = "Not found";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Turns a raw request body into something that is safe to write.
pub trait Validate
where
    Self: Sized,
{
    type Valid;
    fn validate(self) -> Result<Self::Valid, ValidationError>;
}

#[derive(Debug)]
pub enum ApiError {
    Diesel(DieselError),
    Validation(ValidationError),
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal,
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> ApiError {
        ApiError::Validation(err)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub type Created<T> = Result<status::Custom<Json<T>>, ApiError>;

pub type Deleted = Result<status::NoContent, ApiError>;

pub fn created<T>(body: T) -> status::Custom<Json<T>> {
    status::Custom(Status::Created, Json(body))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub msg: String,
}

impl ErrorBody {
    pub fn new<M: Into<String>>(msg: M) -> Self {
        ErrorBody { msg: msg.into() }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ValidationError(HashMap<String, Vec<String>>);

impl ValidationError {
    pub fn add_error<K: Into<String>, V: Into<String>>(&mut self, key: K, val: V) {
        let entry = self.0.entry(key.into()).or_default();
        entry.push(val.into());
    }

    pub fn from<K: Into<String>, V: Into<String>>(key: K, val: V) -> Self {
        let mut error = ValidationError::default();
        error.add_error(key, val);
        error
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn merge(&mut self, other: ValidationError) {
        for (key, errors) in other.0.into_iter() {
            let entry = self.0.entry(key).or_default();
            entry.extend(errors);
        }
    }

    pub fn empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn or_ok<T>(self, value: T) -> Result<T, ValidationError> {
        if self.empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl ApiError {
    pub fn status(&self) -> (Status, &'static str) {
        match self {
            ApiError::Diesel(DieselError::NotFound) => (Status::NotFound, NOT_FOUND),
            ApiError::Diesel(DieselError::DatabaseError(kind, _)) => match kind {
                DatabaseErrorKind::ForeignKeyViolation => (Status::NotFound, NOT_FOUND),
                DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::UniqueViolation => {
                    (Status::BadRequest, BAD_REQUEST)
                }
                _ => (Status::InternalServerError, INTERNAL_ERROR),
            },
            ApiError::Diesel(_) => (Status::InternalServerError, INTERNAL_ERROR),
            ApiError::Validation(_) => (Status::BadRequest, BAD_REQUEST),
            ApiError::BadRequest(msg) => (Status::BadRequest, *msg),
            ApiError::NotFound(msg) => (Status::NotFound, *msg),
            ApiError::Internal => (Status::InternalServerError, INTERNAL_ERROR),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (status, msg) = self.status();
        match self {
            ApiError::Validation(ref errors) => {
                debug!(uri = %req.uri(), ?errors, "rejected request");
            }
            _ if status == Status::InternalServerError => {
                error!(uri = %req.uri(), error = ?self, "request failed");
            }
            _ => {}
        }
        status::Custom(status, Json(ErrorBody::new(msg))).respond_to(req)
    }
}
