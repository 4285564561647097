//! Ownership gate for mutating operations.

use std::future::IntoFuture;

use crate::{error::AppError, utils::basic_auth::AuthUser};

/// `role == ADMIN || is_owner()`, checked by handlers before any state change.
///
/// `is_owner` is lazy and never polled for admins. The ownership predicates
/// report a missing resource as owned, so the mutation that follows is what
/// produces the 404; not-found therefore wins over forbidden.
pub async fn authorize<F>(user: &AuthUser, is_owner: F) -> Result<(), AppError>
where
    F: IntoFuture<Output = Result<bool, AppError>>,
{
    if user.is_admin() || is_owner.await? {
        return Ok(());
    }

    tracing::warn!(username = %user.username, "mutation refused: not the owner");
    Err(AppError::Forbidden(
        "You do not have permission to modify this resource".to_string(),
    ))
}
