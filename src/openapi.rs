// src/openapi.rs

use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

use crate::{
    error::ErrorBody,
    models::{
        ad::{AdResponse, AdsResponse, CreateAdRequest, ExtendedAdResponse, UpdateAdRequest},
        comment::{CommentResponse, CommentsResponse, CreateOrUpdateCommentRequest},
        user::{LoginRequest, NewPasswordRequest, RegisterRequest, Role, UpdateUserRequest, UserResponse},
    },
};

/// Multipart body of `POST /ads`.
#[derive(ToSchema)]
pub struct CreateAdForm {
    pub properties: CreateAdRequest,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Multipart body carrying a single `image` file part.
#[derive(ToSchema)]
pub struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basicAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::ads::list_ads,
        crate::handlers::ads::my_ads,
        crate::handlers::ads::get_ad,
        crate::handlers::ads::create_ad,
        crate::handlers::ads::update_ad,
        crate::handlers::ads::delete_ad,
        crate::handlers::ads::update_ad_image,
        crate::handlers::comments::list_comments,
        crate::handlers::comments::add_comment,
        crate::handlers::comments::update_comment,
        crate::handlers::comments::delete_comment,
        crate::handlers::users::get_me,
        crate::handlers::users::update_me,
        crate::handlers::users::update_avatar,
        crate::handlers::users::set_password,
    ),
    components(
        schemas(
            ErrorBody,
            Role,
            RegisterRequest,
            LoginRequest,
            UserResponse,
            UpdateUserRequest,
            NewPasswordRequest,
            CreateAdRequest,
            UpdateAdRequest,
            AdResponse,
            AdsResponse,
            ExtendedAdResponse,
            CreateOrUpdateCommentRequest,
            CommentResponse,
            CommentsResponse,
            CreateAdForm,
            ImageForm,
        )
    ),
    modifiers(&BasicAuthScheme),
    tags(
        (name = "Auth", description = "Registration and credential checks"),
        (name = "Ads", description = "Classified ads"),
        (name = "Comments", description = "Comments on ads"),
        (name = "Users", description = "Profile of the authenticated user")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route_with_basic_auth() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        for path in [
            "/register",
            "/login",
            "/ads",
            "/ads/me",
            "/ads/{id}",
            "/ads/{id}/image",
            "/ads/{id}/comments",
            "/ads/{id}/comments/{comment_id}",
            "/users/me",
            "/users/me/image",
            "/users/set_password",
        ] {
            assert!(doc["paths"][path].is_object(), "{path} is not documented");
        }
        assert_eq!(doc["components"]["securitySchemes"]["basicAuth"]["scheme"], "basic");
        assert!(doc["paths"]["/ads"]["get"]["security"].is_null());
        assert!(doc["paths"]["/ads/me"]["get"]["security"].is_array());
    }
}
