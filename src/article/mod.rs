use rocket::response::status;
use rocket::serde::json::Json;
use tracing::{debug, info};

use crate::db::{DbConnection, FindByKey};
use crate::topic::{Topic, TOPIC_NOT_FOUND};
use crate::types::*;
use crate::users::models::User;
use crate::users::USER_NOT_FOUND;
use crate::utils::{parse_id, VoteUpdate};

pub mod models;
pub mod query;

use self::models::{Article, ArticleDetail, ArticleSummary, CreateArticle};
use self::query::ArticleQuery;

pub const ARTICLE_NOT_FOUND: &str = "Article not found";

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    articles: Vec<ArticleSummary>,
    total_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse<T> {
    article: T,
}

#[get("/articles?<topic>&<sort_by>&<order>&<limit>&<p>")]
pub fn list(
    mut conn: DbConnection,
    topic: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    limit: Option<String>,
    p: Option<String>,
) -> ApiResult<ArticlesResponse> {
    let query = ArticleQuery::from_params(
        topic,
        sort_by.as_deref(),
        order.as_deref(),
        limit.as_deref(),
        p.as_deref(),
    )?;
    debug!(?query, "listing articles");

    if let Some(ref topic) = query.topic {
        if !Topic::exists(topic, &mut conn)? {
            return Err(ApiError::NotFound(TOPIC_NOT_FOUND));
        }
    }

    let articles = Article::list(&query, &mut conn)?;
    let total_count = Article::count(query.topic.as_deref(), &mut conn)?;
    Ok(Json(ArticlesResponse {
        articles,
        total_count,
    }))
}

#[post("/articles", data = "<create>")]
pub fn create(mut conn: DbConnection, create: Json<CreateArticle>) -> Created<ArticleResponse<ArticleDetail>> {
    let new_article = create.into_inner().validate()?;
    if !User::exists(&new_article.author, &mut conn)? {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }
    if !Topic::exists(&new_article.topic, &mut conn)? {
        return Err(ApiError::NotFound(TOPIC_NOT_FOUND));
    }

    let article = Article::insert(&new_article, &mut conn)?;
    info!(article_id = article.article_id, author = %article.author, "created article");
    Ok(created(ArticleResponse {
        article: ArticleDetail::from(article),
    }))
}

#[get("/articles/<article_id>")]
pub fn get(mut conn: DbConnection, article_id: &str) -> ApiResult<ArticleResponse<ArticleDetail>> {
    let id = parse_id("article_id", article_id)?;
    let article = Article::detail(id, &mut conn)?.ok_or(ApiError::NotFound(ARTICLE_NOT_FOUND))?;
    Ok(Json(ArticleResponse { article }))
}

#[patch("/articles/<article_id>", data = "<update>")]
pub fn vote(
    mut conn: DbConnection,
    article_id: &str,
    update: Json<VoteUpdate>,
) -> ApiResult<ArticleResponse<Article>> {
    let id = parse_id("article_id", article_id)?;
    let inc_votes = update.into_inner().validate()?;
    let article = Article::add_votes(id, inc_votes, &mut conn)?.ok_or(ApiError::NotFound(ARTICLE_NOT_FOUND))?;
    Ok(Json(ArticleResponse { article }))
}

#[delete("/articles/<article_id>")]
pub fn delete(mut conn: DbConnection, article_id: &str) -> Deleted {
    let id = parse_id("article_id", article_id)?;
    if !Article::delete(id, &mut conn)? {
        return Err(ApiError::NotFound(ARTICLE_NOT_FOUND));
    }
    info!(article_id = id, "deleted article");
    Ok(status::NoContent)
}
