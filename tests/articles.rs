mod common;

use common::*;
use rocket::http::Status;
use serde_json::{json, Value};

fn articles(body: &Value) -> &Vec<Value> {
    body["articles"].as_array().expect("articles array")
}

#[test]
fn lists_newest_articles_first() {
    let client = client();
    let (status, body) = get(&client, "/api/articles");
    assert_eq!(status, Status::Ok);
    assert_eq!(body["total_count"], 13);
    // 12 and 13 share a timestamp and fall back to id order
    assert_eq!(ids(&body["articles"], "article_id"), vec![3, 6, 2, 12, 13, 5, 1, 9, 10, 4]);
}

#[test]
fn listed_articles_have_counts_but_no_body() {
    let client = client();
    let (_, body) = get(&client, "/api/articles?limit=100");
    let articles = articles(&body);
    assert_eq!(articles.len(), 13);
    for article in articles {
        assert!(article.get("body").is_none());
        for key in &[
            "article_id",
            "title",
            "topic",
            "author",
            "created_at",
            "votes",
            "article_img_url",
            "comment_count",
        ] {
            assert!(article.get(*key).is_some(), "missing {}", key);
        }
    }
    let first = articles.iter().find(|a| a["article_id"] == 1).unwrap();
    assert_eq!(first["comment_count"], 11);
}

#[test]
fn filters_by_topic() {
    let client = client();
    let (status, body) = get(&client, "/api/articles?topic=cats");
    assert_eq!(status, Status::Ok);
    assert_eq!(ids(&body["articles"], "article_id"), vec![5]);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["articles"][0]["comment_count"], 2);
}

#[test]
fn topic_without_articles_is_empty() {
    let client = client();
    let (status, body) = get(&client, "/api/articles?topic=paper");
    assert_eq!(status, Status::Ok);
    assert!(articles(&body).is_empty());
    assert_eq!(body["total_count"], 0);
}

#[test]
fn unknown_topic_is_404() {
    let client = client();
    let (status, body) = get(&client, "/api/articles?topic=dogs");
    assert_eq!(status, Status::NotFound);
    assert_eq!(msg(&body), "Topic not found");
}

#[test]
fn sorts_by_any_allowed_column() {
    let client = client();
    let (_, body) = get(&client, "/api/articles?sort_by=title&order=asc&limit=100");
    let titles: Vec<&str> = articles(&body)
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 13);
    assert!(titles.windows(2).all(|w| w[0] <= w[1]), "{:?}", titles);

    let (_, body) = get(&client, "/api/articles?sort_by=votes");
    assert_eq!(body["articles"][0]["article_id"], 1);

    let (_, body) = get(&client, "/api/articles?sort_by=comment_count&order=DESC");
    let counts: Vec<i64> = ids(&body["articles"], "comment_count");
    assert_eq!(&counts[..3], &[11, 2, 2]);
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));

    let (_, body) = get(&client, "/api/articles?sort_by=article_id&order=asc&limit=3");
    assert_eq!(ids(&body["articles"], "article_id"), vec![1, 2, 3]);
}

#[test]
fn sort_outside_allow_list_is_400() {
    let client = client();
    for query in &[
        "sort_by=body",
        "sort_by=votes;%20DROP%20TABLE%20articles",
        "order=sideways",
        "limit=0",
        "limit=101",
        "limit=ten",
        "p=0",
        "p=-2",
    ] {
        let (status, body) = get(&client, &format!("/api/articles?{}", query));
        assert_eq!(status, Status::BadRequest, "{}", query);
        assert_eq!(msg(&body), "Bad request");
    }

    let (status, body) = get(&client, "/api/articles");
    assert_eq!(status, Status::Ok);
    assert_eq!(body["total_count"], 13);
}

#[test]
fn paginates() {
    let client = client();
    let (_, body) = get(&client, "/api/articles?limit=5&p=2");
    assert_eq!(ids(&body["articles"], "article_id"), vec![5, 1, 9, 10, 4]);
    assert_eq!(body["total_count"], 13);

    let (_, body) = get(&client, "/api/articles?limit=5&p=3");
    assert_eq!(ids(&body["articles"], "article_id"), vec![8, 11, 7]);

    let (status, body) = get(&client, "/api/articles?p=10");
    assert_eq!(status, Status::Ok);
    assert!(articles(&body).is_empty());
    assert_eq!(body["total_count"], 13);
}

#[test]
fn gets_an_article_by_id() {
    let client = client();
    let (status, body) = get(&client, "/api/articles/1");
    assert_eq!(status, Status::Ok);
    assert_eq!(
        body["article"],
        json!({
            "article_id": 1,
            "title": "Living in the shadow of a great man",
            "topic": "mitch",
            "author": "butter_bridge",
            "body": "I find this existence challenging",
            "created_at": "2020-07-09T20:11:00.000Z",
            "votes": 100,
            "article_img_url": "https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700",
            "comment_count": 11
        })
    );
}

#[test]
fn every_article_is_served_once_under_its_id() {
    let client = client();
    for id in 1..=13 {
        let (status, body) = get(&client, &format!("/api/articles/{}", id));
        assert_eq!(status, Status::Ok);
        assert_eq!(body["article"]["article_id"], id);
    }
    let (_, body) = get(&client, "/api/articles/2");
    assert_eq!(body["article"]["comment_count"], 0);
}

#[test]
fn article_lookup_errors() {
    let client = client();
    let (status, body) = get(&client, "/api/articles/999");
    assert_eq!(status, Status::NotFound);
    assert_eq!(msg(&body), "Article not found");

    for id in &["banana", "1.5", "99999999999"] {
        let (status, body) = get(&client, &format!("/api/articles/{}", id));
        assert_eq!(status, Status::BadRequest, "{}", id);
        assert_eq!(msg(&body), "Bad request");
    }
}

#[test]
fn votes_on_an_article() {
    let client = client();
    let (status, body) = patch(&client, "/api/articles/1", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::Ok);
    assert_eq!(body["article"]["article_id"], 1);
    assert_eq!(body["article"]["votes"], 101);

    let (_, body) = patch(&client, "/api/articles/1", &json!({ "inc_votes": -151 }));
    assert_eq!(body["article"]["votes"], -50);

    let (_, body) = get(&client, "/api/articles/1");
    assert_eq!(body["article"]["votes"], -50);
}

#[test]
fn article_vote_errors() {
    let client = client();
    for update in &[json!({ "inc_votes": "cats" }), json!({}), json!({ "inc_votes": 1.5 })] {
        let (status, body) = patch(&client, "/api/articles/1", update);
        assert_eq!(status, Status::BadRequest, "{}", update);
        assert_eq!(msg(&body), "Bad request");
    }

    let (status, body) = patch(&client, "/api/articles/999", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(msg(&body), "Article not found");

    let (status, _) = patch(&client, "/api/articles/one", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::BadRequest);
}

#[test]
fn vote_totals_stay_within_32_bits() {
    let client = client();
    let (status, body) = patch(&client, "/api/articles/1", &json!({ "inc_votes": i32::MAX }));
    assert_eq!(status, Status::BadRequest);
    assert_eq!(msg(&body), "Bad request");

    let (_, body) = get(&client, "/api/articles/1");
    assert_eq!(body["article"]["votes"], 100);

    let (status, body) = patch(&client, "/api/articles/2", &json!({ "inc_votes": i32::MAX }));
    assert_eq!(status, Status::Ok);
    assert_eq!(body["article"]["votes"], i32::MAX);

    let (status, _) = patch(&client, "/api/articles/2", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::BadRequest);

    let (_, body) = get(&client, "/api/articles?sort_by=votes&limit=1");
    assert_eq!(body["articles"][0]["article_id"], 2);
    assert_eq!(body["articles"][0]["votes"], i32::MAX);
}

#[test]
fn creates_an_article() {
    let client = client();
    let (status, body) = post(
        &client,
        "/api/articles",
        &json!({
            "author": "lurker",
            "title": "Paper cuts",
            "body": "They sting more than you would think.",
            "topic": "paper"
        }),
    );
    assert_eq!(status, Status::Created);
    let article = &body["article"];
    assert_eq!(article["article_id"], 14);
    assert_eq!(article["author"], "lurker");
    assert_eq!(article["votes"], 0);
    assert_eq!(article["comment_count"], 0);
    assert_eq!(
        article["article_img_url"],
        "https://images.pexels.com/photos/97050/pexels-photo-97050.jpeg?w=700&h=700"
    );
    assert!(article["created_at"].as_str().unwrap().ends_with('Z'));

    let (_, body) = get(&client, "/api/articles?topic=paper");
    assert_eq!(body["total_count"], 1);
}

#[test]
fn article_creation_errors() {
    let client = client();
    let valid = json!({
        "author": "lurker",
        "title": "Paper cuts",
        "body": "They sting.",
        "topic": "paper"
    });

    let mut unknown_author = valid.clone();
    unknown_author["author"] = json!("ghost");
    let (status, body) = post(&client, "/api/articles", &unknown_author);
    assert_eq!(status, Status::NotFound);
    assert_eq!(msg(&body), "User not found");

    let mut unknown_topic = valid.clone();
    unknown_topic["topic"] = json!("dogs");
    let (status, body) = post(&client, "/api/articles", &unknown_topic);
    assert_eq!(status, Status::NotFound);
    assert_eq!(msg(&body), "Topic not found");

    let mut missing_title = valid.clone();
    missing_title.as_object_mut().unwrap().remove("title");
    let (status, _) = post(&client, "/api/articles", &missing_title);
    assert_eq!(status, Status::BadRequest);

    let mut bad_image = valid;
    bad_image["article_img_url"] = json!("not a url");
    let (status, _) = post(&client, "/api/articles", &bad_image);
    assert_eq!(status, Status::BadRequest);
}

#[test]
fn deletes_an_article_and_its_comments() {
    let client = client();
    let (status, body) = delete(&client, "/api/articles/1");
    assert_eq!(status, Status::NoContent);
    assert!(body.is_empty());

    let (status, _) = get(&client, "/api/articles/1");
    assert_eq!(status, Status::NotFound);
    let (status, _) = get(&client, "/api/articles/1/comments");
    assert_eq!(status, Status::NotFound);

    // comment 2 belonged to article 1
    let (status, body) = patch(&client, "/api/comments/2", &json!({ "inc_votes": 1 }));
    assert_eq!(status, Status::NotFound);
    assert_eq!(msg(&body), "Comment not found");

    let (_, body) = get(&client, "/api/articles");
    assert_eq!(body["total_count"], 12);
}

#[test]
fn article_deletion_errors() {
    let client = client();
    let (status, _) = delete(&client, "/api/articles/999");
    assert_eq!(status, Status::NotFound);
    let (status, _) = delete(&client, "/api/articles/first");
    assert_eq!(status, Status::BadRequest);
}
