use chrono::{NaiveDateTime, Utc};
use diesel::insert_into;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rocket::response::status;
use rocket::serde::json::Json;
use tracing::info;

use crate::article::models::Article;
use crate::article::ARTICLE_NOT_FOUND;
use crate::db::schema::comments;
use crate::db::{DbConnection, FindByKey};
use crate::types::*;
use crate::users::models::User;
use crate::users::USER_NOT_FOUND;
use crate::utils::{parse_id, require_text, serialize_date, Page, VoteUpdate};

pub const COMMENT_NOT_FOUND: &str = "Comment not found";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = comments, primary_key(comment_id))]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub votes: i32,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub created_at: NaiveDateTime,
}

impl FindByKey for Comment {
    type Key = i32;

    fn find_by_key(id: &i32, connection: &mut SqliteConnection) -> QueryResult<Option<Comment>> {
        comments::table
            .find(*id)
            .select(Comment::as_select())
            .first(connection)
            .optional()
    }
}

impl Comment {
    /// Newest first.
    pub fn for_article(article_id: i32, page: Page, connection: &mut SqliteConnection) -> QueryResult<Vec<Comment>> {
        comments::table
            .filter(comments::article_id.eq(article_id))
            .order((comments::created_at.desc(), comments::comment_id.desc()))
            .limit(page.limit)
            .offset(page.offset())
            .select(Comment::as_select())
            .load(connection)
    }

    pub fn add_votes(id: i32, inc_votes: i32, connection: &mut SqliteConnection) -> QueryResult<Option<Comment>> {
        diesel::update(comments::table.find(id))
            .set(comments::votes.eq(comments::votes + inc_votes))
            .returning(Comment::as_returning())
            .get_result(connection)
            .optional()
    }

    pub fn delete(id: i32, connection: &mut SqliteConnection) -> QueryResult<bool> {
        diesel::delete(comments::table.find(id))
            .execute(connection)
            .map(|deleted| deleted > 0)
    }
}

#[derive(Debug, Serialize)]
pub struct CommentContainer<T> {
    comment: T,
}

#[derive(Debug, Serialize)]
pub struct CommentsContainer<T> {
    comments: T,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    username: Option<String>,
    body: Option<String>,
}

/// A validated comment body, still missing the article it belongs to.
#[derive(Debug, PartialEq)]
pub struct CommentDetails {
    pub author: String,
    pub body: String,
}

impl Validate for CommentBody {
    type Valid = CommentDetails;

    fn validate(self) -> Result<CommentDetails, ValidationError> {
        let mut errors = ValidationError::default();
        let author = require_text(&mut errors, "username", self.username);
        let body = require_text(&mut errors, "body", self.body);
        errors.or_ok(CommentDetails { author, body })
    }
}

#[get("/articles/<article_id>/comments?<limit>&<p>")]
pub fn list(
    mut conn: DbConnection,
    article_id: &str,
    limit: Option<String>,
    p: Option<String>,
) -> ApiResult<CommentsContainer<Vec<Comment>>> {
    let article_id = parse_id("article_id", article_id)?;
    let page = Page::from_query(limit.as_deref(), p.as_deref())?;
    if !Article::exists(&article_id, &mut conn)? {
        return Err(ApiError::NotFound(ARTICLE_NOT_FOUND));
    }
    let comments = Comment::for_article(article_id, page, &mut conn)?;
    Ok(Json(CommentsContainer { comments }))
}

#[post("/articles/<article_id>/comments", data = "<details>")]
pub fn add(
    mut conn: DbConnection,
    article_id: &str,
    details: Json<CommentBody>,
) -> Created<CommentContainer<Comment>> {
    let article_id = parse_id("article_id", article_id)?;
    let details = details.into_inner().validate()?;
    if !Article::exists(&article_id, &mut conn)? {
        return Err(ApiError::NotFound(ARTICLE_NOT_FOUND));
    }
    if !User::exists(&details.author, &mut conn)? {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }

    let new_comment = NewComment {
        body: details.body,
        article_id,
        author: details.author,
        created_at: Utc::now().naive_utc(),
    };
    let comment = insert_into(comments::table)
        .values(&new_comment)
        .returning(Comment::as_returning())
        .get_result(&mut *conn)?;
    info!(comment_id = comment.comment_id, article_id, "added comment");
    Ok(created(CommentContainer { comment }))
}

#[patch("/comments/<comment_id>", data = "<update>")]
pub fn vote(
    mut conn: DbConnection,
    comment_id: &str,
    update: Json<VoteUpdate>,
) -> ApiResult<CommentContainer<Comment>> {
    let id = parse_id("comment_id", comment_id)?;
    let inc_votes = update.into_inner().validate()?;
    let comment = Comment::add_votes(id, inc_votes, &mut conn)?.ok_or(ApiError::NotFound(COMMENT_NOT_FOUND))?;
    Ok(Json(CommentContainer { comment }))
}

#[delete("/comments/<comment_id>")]
pub fn delete(mut conn: DbConnection, comment_id: &str) -> Deleted {
    let id = parse_id("comment_id", comment_id)?;
    if !Comment::delete(id, &mut conn)? {
        return Err(ApiError::NotFound(COMMENT_NOT_FOUND));
    }
    info!(comment_id = id, "deleted comment");
    Ok(status::NoContent)
}
