// tests/common/mod.rs
#![allow(dead_code)]

use std::{path::PathBuf, time::Duration};

use classifieds::{
    config::Config,
    models::ad::AdResponse,
    repository::Repositories,
    routes,
    services::{images::ImageStore, janitor::ImageJanitor},
    state::AppState,
};
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tempfile::TempDir;

pub const PASSWORD: &str = "12345678";
pub const AVATAR_DELETE_DELAY: Duration = Duration::from_millis(300);

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    /// Kept alive for the duration of the test; removed on drop.
    pub image_dir: TempDir,
}

/// Spawns the app on a random port, backed by in-memory repositories and a
/// temporary image directory.
pub async fn spawn_app() -> TestApp {
    let image_dir = tempfile::tempdir().expect("Failed to create image dir");

    let config = Config {
        database_url: String::new(),
        rust_log: "error".to_string(),
        log_dir: "logs".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        image_dir: image_dir.path().to_path_buf(),
        cors_origin: "http://localhost:3000".parse().unwrap(),
        max_upload_bytes: 1024 * 1024,
        avatar_delete_delay: AVATAR_DELETE_DELAY,
        admin_username: None,
        admin_password: None,
    };

    let images = ImageStore::new(&config.image_dir);
    let (janitor, _worker) = ImageJanitor::start(images.clone(), config.avatar_delete_delay);
    let state = AppState::new(config, Repositories::in_memory(), images, janitor);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        image_dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Filesystem location of an `/images/...` URL.
    pub fn image_file(&self, url: &str) -> PathBuf {
        self.image_dir
            .path()
            .join(url.strip_prefix("/images/").expect("image url"))
    }

    pub async fn register_as(&self, username: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/register"))
            .json(&json!({
                "username": username,
                "password": PASSWORD,
                "firstName": "Ivan",
                "lastName": "Petrov",
                "phone": "+7(987)654-32-10",
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn register(&self, username: &str) -> reqwest::Response {
        self.register_as(username, "USER").await
    }

    pub fn get(&self, path: &str, username: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .basic_auth(username, Some(PASSWORD))
    }

    pub fn patch(&self, path: &str, username: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(self.url(path))
            .basic_auth(username, Some(PASSWORD))
    }

    pub fn post(&self, path: &str, username: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(username, Some(PASSWORD))
    }

    pub fn delete(&self, path: &str, username: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .basic_auth(username, Some(PASSWORD))
    }

    pub async fn create_ad(&self, username: &str, title: &str, price: i32) -> AdResponse {
        let properties = json!({
            "title": title,
            "description": "Phone is good",
            "price": price,
        });
        let response = self
            .post("/ads", username)
            .multipart(ad_form(&properties, "phone.png", b"png-bytes"))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.unwrap()
    }

    pub async fn add_comment(&self, username: &str, ad_id: i32, text: &str) -> serde_json::Value {
        let response = self
            .post(&format!("/ads/{ad_id}/comments"), username)
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.unwrap()
    }
}

pub fn ad_form(properties: &serde_json::Value, file_name: &str, bytes: &'static [u8]) -> Form {
    Form::new()
        .part(
            "properties",
            Part::text(properties.to_string())
                .mime_str("application/json")
                .unwrap(),
        )
        .part("image", Part::bytes(bytes).file_name(file_name.to_string()))
}

pub fn image_form(file_name: &str, bytes: &'static [u8]) -> Form {
    Form::new().part("image", Part::bytes(bytes).file_name(file_name.to_string()))
}
