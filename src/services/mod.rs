// src/services/mod.rs

pub mod access;
pub mod ads;
pub mod auth;
pub mod comments;
pub mod images;
pub mod janitor;
pub mod users;
