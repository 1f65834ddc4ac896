#![allow(dead_code)]

use nc_news::config::Config;
use nc_news::db;
use nc_news::db::seed::{seed, SeedData};
use rocket::http::Status;
use rocket::local::blocking::{Client, LocalResponse};
use serde_json::Value;

/// A client over a freshly migrated and seeded in-memory database.
pub fn client() -> Client {
    let pool = db::connect(&Config::in_memory()).expect("in-memory database");
    {
        let mut conn = pool.get().expect("database connection");
        let data = SeedData::test().expect("bundled test data");
        seed(&mut conn, &data).expect("seeded database");
    }
    Client::tracked(nc_news::rocket(pool)).expect("valid rocket instance")
}

pub fn read(response: LocalResponse<'_>) -> (Status, Value) {
    let status = response.status();
    let body = response.into_json::<Value>().unwrap_or(Value::Null);
    (status, body)
}

pub fn get(client: &Client, uri: &str) -> (Status, Value) {
    read(client.get(uri.to_string()).dispatch())
}

pub fn post(client: &Client, uri: &str, body: &Value) -> (Status, Value) {
    read(client.post(uri.to_string()).json(body).dispatch())
}

pub fn patch(client: &Client, uri: &str, body: &Value) -> (Status, Value) {
    read(client.patch(uri.to_string()).json(body).dispatch())
}

pub fn delete(client: &Client, uri: &str) -> (Status, String) {
    let response = client.delete(uri.to_string()).dispatch();
    let status = response.status();
    (status, response.into_string().unwrap_or_default())
}

pub fn msg(body: &Value) -> &str {
    body["msg"].as_str().expect("error body has a msg")
}

pub fn ids(items: &Value, key: &str) -> Vec<i64> {
    items
        .as_array()
        .expect("an array")
        .iter()
        .map(|item| item[key].as_i64().expect("integer id"))
        .collect()
}
