pub mod basic_auth;
pub mod hash;
pub mod multipart;
pub mod path;
pub mod validation;
