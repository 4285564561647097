// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use axum::http::HeaderValue;
use dotenvy::dotenv;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_AVATAR_DELETE_DELAY_MS: u64 = 800;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub log_dir: String,
    pub bind_addr: SocketAddr,

    /// Directory uploaded images are written to and served from under `/images`.
    pub image_dir: PathBuf,

    /// The single origin allowed to make credentialed cross-origin requests.
    pub cors_origin: HeaderValue,

    pub max_upload_bytes: usize,

    /// How long a replaced avatar stays on disk before the janitor removes it.
    pub avatar_delete_delay: Duration,

    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address, e.g. 0.0.0.0:8080");

        let image_dir = env::var("IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("images"));

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a number"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let avatar_delete_delay = env::var("AVATAR_DELETE_DELAY_MS")
            .ok()
            .map(|v| v.parse().expect("AVATAR_DELETE_DELAY_MS must be a number"))
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_AVATAR_DELETE_DELAY_MS));

        let admin_username = env::var("ADMIN_USERNAME").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Self {
            database_url,
            rust_log,
            log_dir,
            bind_addr,
            image_dir,
            cors_origin,
            max_upload_bytes,
            avatar_delete_delay,
            admin_username,
            admin_password,
        }
    }
}
