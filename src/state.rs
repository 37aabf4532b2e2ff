use std::sync::Arc;

use crate::database::GroupStore;

/// Shared handler state: the datastore and the secret used to verify caller tokens
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GroupStore>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn GroupStore>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
        }
    }
}
