//! Translation of the `GET /api/articles` query string into SQL.
//!
//! Column names and sort directions cannot be bound as parameters, so both
//! come from fixed allow-lists; everything else the client sends (topic,
//! limit, offset) is bound.

use std::str::FromStr;

use crate::types::ValidationError;
use crate::utils::Page;

pub const SUMMARY_COLUMNS: &str = "articles.article_id AS article_id, \
     articles.title AS title, \
     articles.topic AS topic, \
     articles.author AS author, \
     articles.created_at AS created_at, \
     articles.votes AS votes, \
     articles.article_img_url AS article_img_url, \
     COUNT(comments.comment_id) AS comment_count";

pub const FROM_ARTICLES: &str =
    "FROM articles LEFT JOIN comments ON comments.article_id = articles.article_id";

/// A single article with its body; one placeholder, the article id.
pub fn detail_sql() -> String {
    format!(
        "SELECT {}, articles.body AS body {} WHERE articles.article_id = ? GROUP BY articles.article_id",
        SUMMARY_COLUMNS, FROM_ARTICLES
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    ArticleId,
    Title,
    Topic,
    Author,
    CreatedAt,
    Votes,
    CommentCount,
    ArticleImgUrl,
}

impl SortBy {
    pub fn column(&self) -> &'static str {
        match self {
            SortBy::ArticleId => "articles.article_id",
            SortBy::Title => "articles.title",
            SortBy::Topic => "articles.topic",
            SortBy::Author => "articles.author",
            SortBy::CreatedAt => "articles.created_at",
            SortBy::Votes => "articles.votes",
            SortBy::CommentCount => "comment_count",
            SortBy::ArticleImgUrl => "articles.article_img_url",
        }
    }
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::CreatedAt
    }
}

impl FromStr for SortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "article_id" => Ok(SortBy::ArticleId),
            "title" => Ok(SortBy::Title),
            "topic" => Ok(SortBy::Topic),
            "author" => Ok(SortBy::Author),
            "created_at" => Ok(SortBy::CreatedAt),
            "votes" => Ok(SortBy::Votes),
            "comment_count" => Ok(SortBy::CommentCount),
            "article_img_url" => Ok(SortBy::ArticleImgUrl),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn keyword(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::Desc
    }
}

impl FromStr for Order {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Order::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Order::Desc)
        } else {
            Err(())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleQuery {
    pub topic: Option<String>,
    pub sort_by: SortBy,
    pub order: Order,
    pub page: Page,
}

impl ArticleQuery {
    pub fn from_params(
        topic: Option<String>,
        sort_by: Option<&str>,
        order: Option<&str>,
        limit: Option<&str>,
        p: Option<&str>,
    ) -> Result<ArticleQuery, ValidationError> {
        let mut errors = ValidationError::default();

        let sort_by = match sort_by {
            None => SortBy::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.add_error("sort_by", format!("cannot sort by {}", raw));
                SortBy::default()
            }),
        };
        let order = match order {
            None => Order::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.add_error("order", format!("expected asc or desc, got {}", raw));
                Order::default()
            }),
        };
        let page = match Page::from_query(limit, p) {
            Ok(page) => page,
            Err(e) => {
                errors.merge(e);
                Page::default()
            }
        };

        errors.or_ok(ArticleQuery {
            topic,
            sort_by,
            order,
            page,
        })
    }

    /// Placeholders, in bind order: topic (when filtering), limit, offset.
    pub fn list_sql(&self) -> String {
        let filter = if self.topic.is_some() {
            " WHERE articles.topic = ?"
        } else {
            ""
        };
        format!(
            "SELECT {} {}{} GROUP BY articles.article_id ORDER BY {} {}, articles.article_id ASC LIMIT ? OFFSET ?",
            SUMMARY_COLUMNS,
            FROM_ARTICLES,
            filter,
            self.sort_by.column(),
            self.order.keyword(),
        )
    }
}
