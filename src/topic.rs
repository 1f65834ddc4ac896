use diesel::prelude::*;
use diesel::insert_into;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use rocket::serde::json::Json;
use slug::slugify;
use tracing::info;

use crate::db::schema::topics;
use crate::db::{DbConnection, FindByKey};
use crate::types::*;
use crate::utils::require_text;

pub const TOPIC_NOT_FOUND: &str = "Topic not found";
pub const TOPIC_EXISTS: &str = "Topic already exists";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = topics)]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

impl FindByKey for Topic {
    type Key = str;

    fn find_by_key(slug: &str, connection: &mut SqliteConnection) -> QueryResult<Option<Topic>> {
        topics::table
            .find(slug)
            .select(Topic::as_select())
            .first(connection)
            .optional()
    }
}

impl Topic {
    pub fn all(connection: &mut SqliteConnection) -> QueryResult<Vec<Topic>> {
        topics::table
            .select(Topic::as_select())
            .order(topics::slug.asc())
            .load(connection)
    }

    /// A slug taken between the existence check and the insert is still a 400.
    pub fn insert(topic: &Topic, connection: &mut SqliteConnection) -> Result<Topic, ApiError> {
        match insert_into(topics::table)
            .values(topic)
            .returning(Topic::as_returning())
            .get_result(connection)
        {
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(ApiError::BadRequest(TOPIC_EXISTS))
            }
            result => Ok(result?),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    topics: Vec<Topic>,
}

#[derive(Debug, Serialize)]
pub struct TopicResponse {
    topic: Topic,
}

#[derive(Debug, Deserialize)]
pub struct NewTopic {
    slug: Option<String>,
    description: Option<String>,
}

impl Validate for NewTopic {
    type Valid = Topic;

    fn validate(self) -> Result<Topic, ValidationError> {
        let mut errors = ValidationError::default();
        let slug = require_text(&mut errors, "slug", self.slug);
        let description = require_text(&mut errors, "description", self.description);
        if !slug.is_empty() && slugify(&slug) != slug {
            errors.add_error("slug", format!("not a slug: {}", slug));
        }
        errors.or_ok(Topic { slug, description })
    }
}

#[get("/topics")]
pub fn list(mut conn: DbConnection) -> ApiResult<TopicsResponse> {
    let topics = Topic::all(&mut conn)?;
    Ok(Json(TopicsResponse { topics }))
}

#[post("/topics", data = "<new_topic>")]
pub fn create(mut conn: DbConnection, new_topic: Json<NewTopic>) -> Created<TopicResponse> {
    let topic = new_topic.into_inner().validate()?;
    if Topic::exists(&topic.slug, &mut conn)? {
        return Err(ApiError::BadRequest(TOPIC_EXISTS));
    }
    let topic = Topic::insert(&topic, &mut conn)?;
    info!(slug = %topic.slug, "created topic");
    Ok(created(TopicResponse { topic }))
}
