// src/models/mod.rs

pub mod ad;
pub mod comment;
pub mod user;
