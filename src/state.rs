//! Shared application state for all routes.

use crate::config::ResponsePolicy;
use crate::store::Datastore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub policy: ResponsePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn Datastore>, policy: ResponsePolicy) -> Self {
        AppState { store, policy }
    }
}
