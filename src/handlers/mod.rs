// src/handlers/mod.rs

pub mod ads;
pub mod auth;
pub mod comments;
pub mod users;
