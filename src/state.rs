use axum::extract::FromRef;

use crate::{
    config::Config,
    repository::Repositories,
    services::{
        ads::AdService, auth::AuthService, comments::CommentService, images::ImageStore,
        janitor::ImageJanitor, users::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub users: UserService,
    pub ads: AdService,
    pub comments: CommentService,
}

impl AppState {
    /// Wires the services over one set of repositories and one image directory.
    pub fn new(config: Config, repos: Repositories, images: ImageStore, janitor: ImageJanitor) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone()),
            users: UserService::new(repos.users.clone(), images.clone(), janitor),
            ads: AdService::new(repos.ads.clone(), repos.users.clone(), images),
            comments: CommentService::new(repos.comments, repos.ads, repos.users),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for AdService {
    fn from_ref(state: &AppState) -> Self {
        state.ads.clone()
    }
}

impl FromRef<AppState> for CommentService {
    fn from_ref(state: &AppState) -> Self {
        state.comments.clone()
    }
}
