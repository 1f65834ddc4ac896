use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Text, Timestamp};
use diesel::sqlite::{Sqlite, SqliteConnection};
use regex::Regex;

use super::query::{detail_sql, ArticleQuery};
use crate::db::schema::articles;
use crate::db::FindByKey;
use crate::types::{Validate, ValidationError};
use crate::utils::{require_text, serialize_date};

pub const DEFAULT_IMG_URL: &str =
    "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700";

lazy_static! {
    static ref IMG_URL_RE: Regex = {
        let pattern = r"\Ahttps?://[^\s/$.?#][^\s]*\z";
        Regex::new(pattern).unwrap()
    };
}

/// A bare `articles` row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = articles, primary_key(article_id))]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    pub votes: i32,
    pub article_img_url: String,
}

/// A full article with its comment count, as served by `GET /api/articles/:id`.
#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct ArticleDetail {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Text)]
    pub body: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Text)]
    pub article_img_url: String,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

/// A listed article: no body, plus its comment count.
#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct ArticleSummary {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Text)]
    pub article_img_url: String,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl From<Article> for ArticleDetail {
    // only used for rows that cannot have comments yet
    fn from(article: Article) -> Self {
        ArticleDetail {
            article_id: article.article_id,
            title: article.title,
            topic: article.topic,
            author: article.author,
            body: article.body,
            created_at: article.created_at,
            votes: article.votes,
            article_img_url: article.article_img_url,
            comment_count: 0,
        }
    }
}

impl FindByKey for Article {
    type Key = i32;

    fn find_by_key(id: &i32, connection: &mut SqliteConnection) -> QueryResult<Option<Article>> {
        articles::table
            .find(*id)
            .select(Article::as_select())
            .first(connection)
            .optional()
    }
}

impl Article {
    pub fn list(query: &ArticleQuery, connection: &mut SqliteConnection) -> QueryResult<Vec<ArticleSummary>> {
        let mut statement = sql_query(query.list_sql()).into_boxed::<Sqlite>();
        if let Some(ref topic) = query.topic {
            statement = statement.bind::<Text, _>(topic.clone());
        }
        statement
            .bind::<BigInt, _>(query.page.limit)
            .bind::<BigInt, _>(query.page.offset())
            .load(connection)
    }

    pub fn count(topic: Option<&str>, connection: &mut SqliteConnection) -> QueryResult<i64> {
        let mut query = articles::table.into_boxed::<Sqlite>();
        if let Some(topic) = topic {
            query = query.filter(articles::topic.eq(topic));
        }
        query.count().get_result(connection)
    }

    pub fn detail(id: i32, connection: &mut SqliteConnection) -> QueryResult<Option<ArticleDetail>> {
        sql_query(detail_sql())
            .bind::<Integer, _>(id)
            .get_result(connection)
            .optional()
    }

    /// One `UPDATE ... SET votes = votes + ?`. A total outside the i32 range
    /// fails the column's CHECK constraint.
    pub fn add_votes(id: i32, inc_votes: i32, connection: &mut SqliteConnection) -> QueryResult<Option<Article>> {
        diesel::update(articles::table.find(id))
            .set(articles::votes.eq(articles::votes + inc_votes))
            .returning(Article::as_returning())
            .get_result(connection)
            .optional()
    }

    pub fn insert(new_article: &NewArticle, connection: &mut SqliteConnection) -> QueryResult<Article> {
        diesel::insert_into(articles::table)
            .values(new_article)
            .returning(Article::as_returning())
            .get_result(connection)
    }

    /// Comments go with it (`ON DELETE CASCADE`). Returns whether a row was removed.
    pub fn delete(id: i32, connection: &mut SqliteConnection) -> QueryResult<bool> {
        diesel::delete(articles::table.find(id))
            .execute(connection)
            .map(|deleted| deleted > 0)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticle {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub article_img_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticle {
    author: Option<String>,
    title: Option<String>,
    body: Option<String>,
    topic: Option<String>,
    article_img_url: Option<String>,
}

impl Validate for CreateArticle {
    type Valid = NewArticle;

    fn validate(self) -> Result<NewArticle, ValidationError> {
        let mut errors = ValidationError::default();
        let author = require_text(&mut errors, "author", self.author);
        let title = require_text(&mut errors, "title", self.title);
        let body = require_text(&mut errors, "body", self.body);
        let topic = require_text(&mut errors, "topic", self.topic);
        let article_img_url = match self.article_img_url.map(|url| url.trim().to_string()) {
            None => DEFAULT_IMG_URL.to_string(),
            Some(url) => {
                if !IMG_URL_RE.is_match(&url) {
                    errors.add_error("article_img_url", format!("Invalid url: {}", url));
                }
                url
            }
        };

        errors.or_ok(NewArticle {
            title,
            topic,
            author,
            body,
            created_at: Utc::now().naive_utc(),
            article_img_url,
        })
    }
}
