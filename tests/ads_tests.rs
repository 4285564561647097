// tests/ads_tests.rs

mod common;

use classifieds::models::ad::{AdResponse, AdsResponse, ExtendedAdResponse};
use common::{ad_form, image_form, spawn_app};
use serde_json::{Value, json};

fn update_body() -> Value {
    json!({ "title": "updTitle", "price": 123 })
}

#[tokio::test]
async fn create_list_and_update_scenario() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;

    let created = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    assert_eq!(created.title, "Sell phone");
    assert_eq!(created.price, 3000);
    assert!(created.image.starts_with("/images/"));
    assert_ne!(created.image, "/images/phone.png");

    let mine: AdsResponse = app
        .get("/ads/me", "user1@mail.ru")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.count, 1);
    assert_eq!(mine.results[0].pk, created.pk);
    assert_eq!(mine.results[0].title, "Sell phone");

    let response = app
        .patch(&format!("/ads/{}", created.pk), "user1@mail.ru")
        .json(&update_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: AdResponse = response.json().await.unwrap();
    assert_eq!(updated.title, "updTitle");
    assert_eq!(updated.price, 123);
    assert_eq!(updated.image, created.image);
    assert_eq!(updated.author, created.author);

    let extended: ExtendedAdResponse = app
        .get(&format!("/ads/{}", created.pk), "user1@mail.ru")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(extended.title, "updTitle");
    assert_eq!(extended.description, "Phone is good");
    assert_eq!(extended.price, 123);
    assert_eq!(extended.image, created.image);
    assert_eq!(extended.email, "user1@mail.ru");
    assert_eq!(extended.author_first_name, "Ivan");
    assert_eq!(extended.phone, "+7(987)654-32-10");
}

#[tokio::test]
async fn patch_validates_only_the_fields_sent() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;

    let response = app
        .patch(&format!("/ads/{}", ad.pk), "user1@mail.ru")
        .json(&json!({ "description": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .patch(&format!("/ads/{}", ad.pk), "user1@mail.ru")
        .json(&json!({ "description": "Screen has no scratches" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: AdResponse = response.json().await.unwrap();
    assert_eq!(updated.title, "Sell phone");
    assert_eq!(updated.price, 3000);
}

#[tokio::test]
async fn malformed_id_is_a_json_400() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;

    let response = app.get("/ads/abc", "user1@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["path"], "/ads/abc");
}

#[tokio::test]
async fn uploaded_image_is_served() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;

    let response = app.client.get(app.url(&ad.image)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"png-bytes");
}

#[tokio::test]
async fn invalid_properties_are_400() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;

    let properties = json!({ "title": "abc", "description": "Phone is good", "price": 10 });
    let response = app
        .post("/ads", "user1@mail.ru")
        .multipart(ad_form(&properties, "phone.png", b"png"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Field 'title': "));

    let response = app
        .post("/ads", "user1@mail.ru")
        .multipart(image_form("phone.png", b"png"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn only_author_or_admin_may_mutate() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    app.register("user2@mail.ru").await;
    app.register_as("admin@mail.ru", "ADMIN").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    let path = format!("/ads/{}", ad.pk);

    let response = app
        .patch(&path, "user2@mail.ru")
        .json(&update_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Forbidden");

    let response = app
        .patch(&format!("{path}/image"), "user2@mail.ru")
        .multipart(image_form("new.png", b"new"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app.delete(&path, "user2@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app
        .patch(&path, "admin@mail.ru")
        .json(&update_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = app.delete(&path, "admin@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn missing_ad_is_404_not_403() {
    let app = spawn_app().await;
    app.register("user2@mail.ru").await;

    let response = app
        .patch("/ads/999", "user2@mail.ru")
        .json(&update_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = app.delete("/ads/999", "user2@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = app.get("/ads/999", "user2@mail.ru").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["path"], "/ads/999");
}

#[tokio::test]
async fn image_update_returns_new_bytes_and_drops_old_file() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    assert!(app.image_file(&ad.image).exists());

    let response = app
        .patch(&format!("/ads/{}/image", ad.pk), "user1@mail.ru")
        .multipart(image_form("new.png", b"new-bytes"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"new-bytes");

    assert!(!app.image_file(&ad.image).exists());
    let extended: ExtendedAdResponse = app
        .get(&format!("/ads/{}", ad.pk), "user1@mail.ru")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_ne!(extended.image, ad.image);
    assert!(app.image_file(&extended.image).exists());
}

#[tokio::test]
async fn deleting_an_ad_removes_comments_and_file() {
    let app = spawn_app().await;
    app.register("user1@mail.ru").await;
    app.register("user2@mail.ru").await;
    let ad = app.create_ad("user1@mail.ru", "Sell phone", 3000).await;
    app.add_comment("user2@mail.ru", ad.pk, "Is it still available?").await;

    let response = app
        .delete(&format!("/ads/{}", ad.pk), "user1@mail.ru")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    assert!(!app.image_file(&ad.image).exists());

    let response = app
        .get(&format!("/ads/{}/comments", ad.pk), "user1@mail.ru")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let all: AdsResponse = app
        .client
        .get(app.url("/ads"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.count, 0);
}
