use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn created_user_is_returned_without_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::USERS,
                &json!({"name": "Ada", "email": "ada@example.com", "password": "correct horse"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(Uuid::parse_str(res.body["id"].as_str().unwrap()).is_ok());
        assert_eq!(res.body["name"], "Ada");
        assert_eq!(res.body["email"], "ada@example.com");
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_create_user_with_invalid_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::USERS,
                &json!({"name": "Ada", "email": "ada.example.com", "password": "correct horse"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_create_user_with_short_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::USERS,
                &json!({"name": "Ada", "email": "ada@example.com", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::USERS, "{\"name\": ").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn get_returns_created_user() {
        let app = TestApp::spawn().await;
        let id = app.create_user("Ada").await;

        let res = app.get(&routes::user(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["name"], "Ada");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::user(&Uuid::new_v4().to_string())).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_uuid_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::user("42")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn list_filters_by_exact_name() {
        let app = TestApp::spawn().await;
        app.create_user("Ada").await;
        let bob = app.create_user("Bob").await;

        let all = app.get(routes::USERS).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.data().len(), 2);

        let res = app.get_query(routes::USERS, &[("name", "Bob")]).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.data().len(), 1);
        assert_eq!(res.data()[0]["id"], bob.as_str());

        let none = app.get_query(routes::USERS, &[("name", "bob")]).await;
        assert!(none.data().is_empty());
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn patch_changes_only_given_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_user("Ada").await;

        let res = app
            .patch(&routes::user(&id), &json!({"name": "Ada Lovelace"}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Ada Lovelace");
        assert_eq!(res.body["email"], "ada@example.com");
        let read = app.get(&routes::user(&id)).await;
        assert_eq!(read.body["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn empty_patch_returns_current_user() {
        let app = TestApp::spawn().await;
        let id = app.create_user("Ada").await;

        let res = app.patch(&routes::user(&id), &json!({})).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Ada");
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected_and_not_applied() {
        let app = TestApp::spawn().await;
        let id = app.create_user("Ada").await;

        let res = app.patch(&routes::user(&id), &json!({"name": "   "})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.get(&routes::user(&id)).await.body["name"], "Ada");
    }

    #[tokio::test]
    async fn patching_unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .patch(
                &routes::user(&Uuid::new_v4().to_string()),
                &json!({"name": "Nobody"}),
            )
            .await;

        assert_eq!(res.status, 404);
    }
}
