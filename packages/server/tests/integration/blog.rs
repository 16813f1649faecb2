use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn created_blog_has_owner_score_and_creation_date() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Ada").await;

    let res = app
        .post(
            routes::BLOGS,
            &json!({"user_id": user, "title": "Notes on the Engine", "score": 9.5}),
        )
        .await;

    assert_eq!(res.status, 201);
    assert_eq!(res.body["user_id"], user.as_str());
    assert_eq!(res.body["title"], "Notes on the Engine");
    assert_eq!(res.body["score"], 9.5);
    assert!(res.body["created_date"].is_string());
}

#[tokio::test]
async fn blog_for_unknown_user_is_a_foreign_key_violation() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::BLOGS,
            &json!({"user_id": Uuid::new_v4(), "title": "Orphan"}),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "FOREIGN_KEY_VIOLATION");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn negative_score_is_rejected() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Ada").await;

    let res = app
        .post(
            routes::BLOGS,
            &json!({"user_id": user, "title": "Bad", "score": -1}),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_filters_by_owner_and_title() {
    let app = TestApp::spawn().await;
    let ada = app.create_user("Ada").await;
    let bob = app.create_user("Bob").await;
    app.create_blog(&ada, "First").await;
    app.create_blog(&ada, "Second").await;
    app.create_blog(&bob, "First").await;

    let all = app.get(routes::BLOGS).await;
    assert_eq!(all.data().len(), 3);

    let by_ada = app.get_query(routes::BLOGS, &[("user_id", ada.as_str())]).await;
    assert_eq!(by_ada.status, 200);
    assert_eq!(by_ada.data().len(), 2);
    assert!(by_ada.data().iter().all(|b| b["user_id"] == ada.as_str()));

    let titled = app.get_query(routes::BLOGS, &[("title", "First")]).await;
    assert_eq!(titled.data().len(), 2);

    let both = app
        .get_query(routes::BLOGS, &[("title", "First"), ("user_id", bob.as_str())])
        .await;
    assert_eq!(both.data().len(), 1);
    assert_eq!(both.data()[0]["user_id"], bob.as_str());
}

#[tokio::test]
async fn list_with_bad_user_id_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app.get_query(routes::BLOGS, &[("user_id", "abc")]).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn patch_updates_title_and_keeps_creation_date() {
    let app = TestApp::spawn().await;
    let user = app.create_user("Ada").await;
    let id = app.create_blog(&user, "Draft").await;
    let before = app.get(&routes::blog(&id)).await;

    let res = app
        .patch(&routes::blog(&id), &json!({"title": "Final", "score": 1.25}))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Final");
    assert_eq!(res.body["score"], 1.25);
    assert_eq!(res.body["created_date"], before.body["created_date"]);
}

#[tokio::test]
async fn unknown_blog_is_not_found() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4().to_string();

    assert_eq!(app.get(&routes::blog(&id)).await.status, 404);
    assert_eq!(app.delete(&routes::blog(&id)).await.status, 404);
}
