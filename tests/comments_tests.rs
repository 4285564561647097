// tests/comments_tests.rs

mod common;

use classifieds::models::comment::{CommentResponse, CommentsResponse};
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn comments_are_listed_newest_first() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    app.register("user2@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;

    let first = app.add_comment("user2@mail.ru", ad.pk, "Is it still available?").await;
    let second = app.add_comment("user1@mail.ru", ad.pk, "Yes, it still is.").await;

    let list: CommentsResponse = app
        .get(&format!("/ads/{}/comments", ad.pk), "user2@mail.ru")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.count, 2);
    assert_eq!(list.results[0].pk, second["pk"].as_i64().unwrap() as i32);
    assert_eq!(list.results[1].pk, first["pk"].as_i64().unwrap() as i32);
    assert_eq!(list.results[1].author_first_name, "Ivan");
    assert!(list.results[0].created_at >= list.results[1].created_at);
}

#[tokio::test]
async fn update_changes_only_the_text() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    let created = app.add_comment("user1@mail.ru", ad.pk, "Is it still available?").await;
    let pk = created["pk"].as_i64().unwrap();

    let response = app
        .patch(&format!("/ads/{}/comments/{pk}", ad.pk), "user1@mail.ru")
        .json(&json!({ "text": "Price is negotiable" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let updated: CommentResponse = response.json().await.unwrap();
    assert_eq!(updated.text, "Price is negotiable");
    assert_eq!(updated.created_at, created["createdAt"].as_i64().unwrap());
    assert_eq!(updated.author as i64, created["author"].as_i64().unwrap());
}

#[tokio::test]
async fn only_comment_author_or_admin_may_mutate() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    app.register("user2@mail.ru").await;
    app.register_as("admin@mail.ru", "ADMIN").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    let created = app.add_comment("user2@mail.ru", ad.pk, "Is it still available?").await;
    let path = format!("/ads/{}/comments/{}", ad.pk, created["pk"]);

    // owning the ad does not grant rights over other people's comments
    let response = app
        .patch(&path, "user1@mail.ru")
        .json(&json!({ "text": "Edited by someone else" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.delete(&path, "user1@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.delete(&path, "admin@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.delete(&path, "user2@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn missing_targets_are_404() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;

    let response = app
        .post("/ads/999/comments", "user1@mail.ru")
        .json(&json!({ "text": "Is it still available?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    let response = app
        .patch(&format!("/ads/{}/comments/999", ad.pk), "user1@mail.ru")
        .json(&json!({ "text": "Is it still available?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn comment_text_is_validated() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;

    let response = app
        .post(&format!("/ads/{}/comments", ad.pk), "user1@mail.ru")
        .json(&json!({ "text": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
