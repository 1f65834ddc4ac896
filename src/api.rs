use rocket::serde::json::Json;
use serde_json::Value;

use crate::types::{ApiError, ApiResult};

static ENDPOINTS: &str = include_str!("../endpoints.json");

#[derive(Debug, Serialize)]
pub struct EndpointsResponse {
    endpoints: Value,
}

pub fn endpoints() -> Result<Value, serde_json::Error> {
    serde_json::from_str(ENDPOINTS)
}

#[get("/api")]
pub fn describe() -> ApiResult<EndpointsResponse> {
    let endpoints = endpoints().map_err(|_| ApiError::Internal)?;
    Ok(Json(EndpointsResponse { endpoints }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_has_a_description() {
        let endpoints = endpoints().unwrap();
        let endpoints = endpoints.as_object().unwrap();
        assert!(endpoints.contains_key("GET /api/articles"));
        for (name, endpoint) in endpoints {
            assert!(endpoint["description"].is_string(), "{} has no description", name);
        }
    }
}
