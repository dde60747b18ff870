//! Integration tests for the table gateways.
//!
//! To run these tests, you need a PostgreSQL database and the
//! DATABASE_URL environment variable set:
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p blog --test gateways`
//!
//! Each test creates its own schema, applies the migrations into it and drops
//! it when the test ends (pass or fail), so tests can safely run against a
//! development database.

use blog::prelude::*;
use blog::testing::TestDb;
use sqlx::postgres::PgPoolOptions;
use std::env;

async fn get_test_db() -> Option<TestDb> {
    TestDb::connect("blog_test").await
}

#[tokio::test]
async fn test_user_crud() {
    let Some(test) = get_test_db().await else {
        return;
    };
    let users = test.db.users();

    let user = users
        .insert(&NewUser::new("alice", "secret"))
        .await
        .expect("Failed to insert user");
    assert!(user.id > 0);
    assert_eq!(user.username, "alice");
    assert_eq!(user.password, "secret");

    let by_id = users.find_by_id(user.id).await.unwrap();
    assert_eq!(by_id.as_ref(), Some(&user));

    let by_name = users.find_by_username("alice").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));
    assert!(users.find_by_username("nobody").await.unwrap().is_none());
    assert!(users.exists("alice").await.unwrap());
    assert!(!users.exists("nobody").await.unwrap());

    let renamed = users
        .update(&User {
            username: "alice2".to_string(),
            ..user.clone()
        })
        .await
        .unwrap();
    assert_eq!(renamed.id, user.id);
    assert_eq!(renamed.username, "alice2");
    assert!(!users.exists("alice").await.unwrap());
    assert!(users.exists("alice2").await.unwrap());

    assert_eq!(users.count().await.unwrap(), 1);
    assert!(users.delete(user.id).await.unwrap());
    assert!(!users.delete(user.id).await.unwrap());
    assert_eq!(users.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_username_is_unique_violation() {
    let Some(test) = get_test_db().await else {
        return;
    };
    let users = test.db.users();

    users.insert(&NewUser::new("bob", "a")).await.unwrap();
    let err = users.insert(&NewUser::new("bob", "b")).await.unwrap_err();
    assert!(
        matches!(err, DbError::UniqueViolation { .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_post_for_unknown_user_is_foreign_key_violation() {
    let Some(test) = get_test_db().await else {
        return;
    };

    let err = test
        .db
        .posts()
        .insert(&NewPost::new("ghost", "boo"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, DbError::ForeignKeyViolation { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_posts_and_comments_queries() {
    let Some(test) = get_test_db().await else {
        return;
    };
    let db = &test.db;

    db.users().insert(&NewUser::new("carol", "x")).await.unwrap();
    db.users().insert(&NewUser::new("dave", "y")).await.unwrap();

    let first = db.posts().insert(&NewPost::new("carol", "first")).await.unwrap();
    let second = db.posts().insert(&NewPost::new("carol", "second")).await.unwrap();
    let third = db.posts().insert(&NewPost::new("dave", "first")).await.unwrap();

    let carol_posts = db.posts().find_by_user("carol").await.unwrap();
    assert_eq!(
        carol_posts.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    let firsts = db.posts().find_by_content("first").await.unwrap();
    assert_eq!(
        firsts.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![first.id, third.id]
    );
    assert_eq!(db.posts().find_all().await.unwrap().len(), 3);

    let comments = db.comments();
    comments
        .insert(&NewComment::new(first.id, "dave", "nice"))
        .await
        .unwrap();
    comments
        .insert(&NewComment::new(first.id, "carol", "thanks"))
        .await
        .unwrap();
    let on_third = comments
        .insert(&NewComment::new(third.id, "carol", "hi"))
        .await
        .unwrap();

    assert_eq!(comments.find_by_post(first.id).await.unwrap().len(), 2);
    assert_eq!(comments.find_by_user("carol").await.unwrap().len(), 2);

    let hi = comments.find_by_content("hi").await.unwrap();
    assert_eq!(hi.iter().map(|c| c.id).collect::<Vec<_>>(), vec![on_third.id]);
    assert!(comments.find_by_content("Hi").await.unwrap().is_empty());

    let busy = comments.counts_per_post(2).await.unwrap();
    assert_eq!(
        busy,
        vec![PostCommentCount {
            post_id: first.id,
            comment_count: 2
        }]
    );
    assert_eq!(comments.counts_per_post(1).await.unwrap().len(), 2);

    let edited = comments
        .update(&Comment {
            content: "hello".to_string(),
            ..on_third
        })
        .await
        .unwrap();
    assert_eq!(edited.content, "hello");
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let Some(test) = get_test_db().await else {
        return;
    };

    let users = test.db.users();

    let user = users.insert(&NewUser::new("erin", "z")).await.unwrap();
    let missing = User {
        id: user.id + 1000,
        ..user
    };
    let err = users.update(&missing).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let Some(test) = get_test_db().await else {
        return;
    };
    let db = &test.db;

    let user = db.users().insert(&NewUser::new("frank", "p")).await.unwrap();
    let post = db.posts().insert(&NewPost::new("frank", "bye")).await.unwrap();
    db.comments()
        .insert(&NewComment::new(post.id, "frank", "self reply"))
        .await
        .unwrap();

    assert!(db.users().delete(user.id).await.unwrap());
    assert_eq!(db.posts().count().await.unwrap(), 0);
    assert_eq!(db.comments().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_with_binds_builder_values() {
    let Some(test) = get_test_db().await else {
        return;
    };
    let posts = test.db.posts();

    test.db.users().insert(&NewUser::new("gina", "q")).await.unwrap();
    let mut ids = Vec::new();
    for content in ["one", "two", "three", "four"] {
        ids.push(posts.insert(&NewPost::new("gina", content)).await.unwrap().id);
    }

    let mut qb = PostTable::select();
    qb.where_eq("user_id", "gina")
        .where_cmp("id", ">", ids[1])
        .order_by("id DESC");
    let newest = posts.find_with(qb).await.unwrap();
    assert_eq!(
        newest.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![ids[3], ids[2]]
    );

    let mut qb = PostTable::select();
    qb.where_eq("content", "two").where_eq("user_id", "nobody");
    assert!(posts.find_with(qb).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_schema_dropped_with_test_db() {
    let Some(test) = get_test_db().await else {
        return;
    };
    let schema = test.schema().to_string();
    test.db.users().insert(&NewUser::new("hank", "r")).await.unwrap();
    drop(test);

    let url = env::var("DATABASE_URL").unwrap();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap();
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
    )
    .bind(&schema)
    .fetch_one(&pool)
    .await
    .unwrap();
    pool.close().await;

    assert!(!exists, "schema {schema} still present");
}
