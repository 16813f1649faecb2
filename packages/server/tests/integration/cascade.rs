use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ::common::storage::{
    EntityStore, Item, MemoryStore, PrimaryKey, PutCondition, Query, StoreError,
};
use async_trait::async_trait;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn comment_listed_by_blog_disappears_with_its_author() {
    let app = TestApp::spawn().await;
    let u1 = app.create_user("Ada").await;
    let b1 = app.create_blog(&u1, "Hello").await;
    app.create_comment(&b1, &u1, "nice post").await;

    let listed = app
        .get_query(routes::COMMENTS, &[("blog_id", b1.as_str())])
        .await;
    assert_eq!(listed.data().len(), 1);
    assert_eq!(listed.data()[0]["message"], "nice post");

    let res = app.delete(&routes::user(&u1)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.deleted().len(), 3);

    assert_eq!(app.get(&routes::blog(&b1)).await.status, 404);
    assert_eq!(app.get(&routes::comment(&b1, &u1)).await.status, 404);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn deleting_user_removes_their_blogs_and_comments() {
    let app = TestApp::spawn().await;
    let ada = app.create_user("Ada").await;
    let bob = app.create_user("Bob").await;
    let ada_post = app.create_blog(&ada, "Ada's").await;
    let bob_post = app.create_blog(&bob, "Bob's").await;
    app.create_comment(&ada_post, &ada, "own").await;
    app.create_comment(&ada_post, &bob, "bob on ada").await;
    app.create_comment(&bob_post, &ada, "ada on bob").await;

    let res = app.delete(&routes::user(&ada)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    // 1 blog, 3 comments (two on her blog, one elsewhere), the user.
    assert_eq!(res.deleted().len(), 5);
    assert_eq!(res.deleted().last().unwrap()["type"], "user");

    assert_eq!(app.get(&routes::user(&ada)).await.status, 404);
    assert_eq!(app.get(&routes::blog(&ada_post)).await.status, 404);
    assert_eq!(
        app.get(&routes::comment(&bob_post, &ada)).await.status,
        404
    );
    assert_eq!(
        app.get(&routes::comment(&ada_post, &bob)).await.status,
        404
    );
    assert_eq!(app.get(&routes::blog(&bob_post)).await.status, 200);
    assert_eq!(app.get(&routes::user(&bob)).await.status, 200);
    // Bob and his blog remain.
    assert_eq!(app.store.len().await, 2);
}

#[tokio::test]
async fn deleting_blog_removes_its_comments_only() {
    let app = TestApp::spawn().await;
    let ada = app.create_user("Ada").await;
    let bob = app.create_user("Bob").await;
    let post = app.create_blog(&ada, "Post").await;
    let other = app.create_blog(&ada, "Other").await;
    app.create_comment(&post, &ada, "x").await;
    app.create_comment(&post, &bob, "y").await;
    app.create_comment(&other, &bob, "z").await;

    let res = app.delete(&routes::blog(&post)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.deleted().len(), 3);
    let kinds: Vec<_> = res.deleted().iter().map(|r| r["type"].clone()).collect();
    assert_eq!(kinds, ["comment", "comment", "blog"]);

    let remaining = app.get(routes::COMMENTS).await;
    assert_eq!(remaining.data().len(), 1);
    assert_eq!(remaining.data()[0]["message"], "z");
    assert_eq!(app.get(&routes::user(&bob)).await.status, 200);
}

/// Fails every delete once `armed` is set.
struct FailingDeletes {
    inner: Arc<MemoryStore>,
    armed: AtomicBool,
}

#[async_trait]
impl EntityStore for FailingDeletes {
    async fn get(&self, key: &PrimaryKey) -> Result<Option<Item>, StoreError> {
        self.inner.get(key).await
    }

    async fn put(&self, item: Item, condition: PutCondition) -> Result<(), StoreError> {
        self.inner.put(item, condition).await
    }

    async fn delete(&self, key: &PrimaryKey) -> Result<bool, StoreError> {
        if self.armed.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected".into()));
        }
        self.inner.delete(key).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Item>, StoreError> {
        self.inner.query(query).await
    }
}

#[tokio::test]
async fn failed_cascade_is_reported_and_leaves_parent_in_place() {
    let store = Arc::new(MemoryStore::new());
    let backend = Arc::new(FailingDeletes {
        inner: store.clone(),
        armed: AtomicBool::new(false),
    });
    let app = TestApp::spawn_over(backend.clone(), store).await;
    let ada = app.create_user("Ada").await;
    app.create_blog(&ada, "Post").await;
    backend.armed.store(true, Ordering::SeqCst);

    let res = app.delete(&routes::user(&ada)).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "CASCADE_FAILED");
    assert!(res.body["message"].as_str().unwrap().contains(&ada));
    backend.armed.store(false, Ordering::SeqCst);
    assert_eq!(app.get(&routes::user(&ada)).await.status, 200);

    let retry = app.delete(&routes::user(&ada)).await;
    assert_eq!(retry.status, 200);
    assert_eq!(retry.deleted().len(), 2);
}

#[tokio::test]
async fn cascade_after_shutdown_is_refused() {
    let app = TestApp::spawn().await;
    let ada = app.create_user("Ada").await;
    app.create_blog(&ada, "Post").await;
    app.shutdown.cancel();

    let res = app.delete(&routes::user(&ada)).await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "CASCADE_FAILED");
    assert_eq!(app.store.len().await, 2);
}
