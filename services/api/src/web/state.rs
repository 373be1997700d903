//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the authenticated identity
//! handlers receive.

use crate::config::Config;
use std::sync::Arc;
use uuid::Uuid;
use welcomebook_core::authz::Actor;
use welcomebook_core::domain::Role;
use welcomebook_core::ports::{BlobStore, Store};

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Arc<Config>,
}

/// The authenticated caller, resolved by the auth middleware and inserted
/// into request extensions. Handlers receive it explicitly; there is no
/// ambient current-user state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}
