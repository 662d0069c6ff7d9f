use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    auth::{DynTokenStore, TokenStore},
    config::Config,
    store::{CommentStore, DynCommentStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: DynCommentStore,
    pub tokens: DynTokenStore,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: impl CommentStore + 'static,
        tokens: impl TokenStore + 'static,
        config: Config,
    ) -> Self {
        Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
            config,
        }
    }
}

impl FromRef<AppState> for DynCommentStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for DynTokenStore {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
