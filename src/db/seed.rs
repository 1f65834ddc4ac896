//! Resets the store and loads a dataset into it.
//!
//! A dataset is four JSON files (`topics.json`, `users.json`,
//! `articles.json`, `comments.json`). The test dataset is compiled in;
//! others are read from disk. Comments refer to articles by their position
//! in `articles.json`, counting from 1, since ids restart on every seed.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use diesel::{delete, insert_into, sql_query};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::info;

use super::schema::{articles, comments, topics, users};
use super::Result;
use crate::article::models::DEFAULT_IMG_URL;
use crate::topic::Topic;
use crate::users::models::User;

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = articles)]
pub struct SeedArticle {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub votes: i32,
    #[serde(default = "default_img_url")]
    pub article_img_url: String,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = comments)]
pub struct SeedComment {
    pub body: String,
    pub article_id: i32,
    pub author: String,
    #[serde(default)]
    pub votes: i32,
    pub created_at: NaiveDateTime,
}

fn default_img_url() -> String {
    DEFAULT_IMG_URL.to_string()
}

#[derive(Debug)]
pub struct SeedData {
    pub topics: Vec<Topic>,
    pub users: Vec<User>,
    pub articles: Vec<SeedArticle>,
    pub comments: Vec<SeedComment>,
}

impl SeedData {
    pub fn test() -> Result<SeedData> {
        Ok(SeedData {
            topics: serde_json::from_str(include_str!("../../data/test/topics.json"))?,
            users: serde_json::from_str(include_str!("../../data/test/users.json"))?,
            articles: serde_json::from_str(include_str!("../../data/test/articles.json"))?,
            comments: serde_json::from_str(include_str!("../../data/test/comments.json"))?,
        })
    }

    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<SeedData> {
        let dir = dir.as_ref();
        Ok(SeedData {
            topics: read_json(&dir.join("topics.json"))?,
            users: read_json(&dir.join("users.json"))?,
            articles: read_json(&dir.join("articles.json"))?,
            comments: read_json(&dir.join("comments.json"))?,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Empties every table and inserts `data`, all in one transaction.
pub fn seed(connection: &mut SqliteConnection, data: &SeedData) -> QueryResult<()> {
    connection.transaction::<_, DieselError, _>(|conn| {
        delete(comments::table).execute(conn)?;
        delete(articles::table).execute(conn)?;
        delete(users::table).execute(conn)?;
        delete(topics::table).execute(conn)?;
        sql_query("DELETE FROM sqlite_sequence").execute(conn)?;

        insert_into(topics::table).values(&data.topics).execute(conn)?;
        insert_into(users::table).values(&data.users).execute(conn)?;
        insert_into(articles::table).values(&data.articles).execute(conn)?;
        insert_into(comments::table).values(&data.comments).execute(conn)?;
        Ok(())
    })?;

    info!(
        topics = data.topics.len(),
        users = data.users.len(),
        articles = data.articles.len(),
        comments = data.comments.len(),
        "seeded database"
    );
    Ok(())
}
