use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::schema::users;
use crate::db::FindByKey;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = users)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

impl User {
    pub fn all(connection: &mut SqliteConnection) -> QueryResult<Vec<User>> {
        users::table
            .select(User::as_select())
            .order(users::username.asc())
            .load(connection)
    }
}

impl FindByKey for User {
    type Key = str;

    fn find_by_key(name: &str, connection: &mut SqliteConnection) -> QueryResult<Option<User>> {
        users::table
            .find(name)
            .select(User::as_select())
            .first(connection)
            .optional()
    }
}
