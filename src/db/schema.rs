table! {
    topics (slug) {
        slug -> Text,
        description -> Text,
    }
}

table! {
    users (username) {
        username -> Text,
        name -> Text,
        avatar_url -> Text,
    }
}

table! {
    articles (article_id) {
        article_id -> Integer,
        title -> Text,
        topic -> Text,
        author -> Text,
        body -> Text,
        created_at -> Timestamp,
        votes -> Integer,
        article_img_url -> Text,
    }
}

table! {
    comments (comment_id) {
        comment_id -> Integer,
        body -> Text,
        article_id -> Integer,
        author -> Text,
        votes -> Integer,
        created_at -> Timestamp,
    }
}

joinable!(articles -> topics (topic));
joinable!(comments -> articles (article_id));

allow_tables_to_appear_in_same_query!(articles, comments, topics, users);
