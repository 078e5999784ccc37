use std::sync::Arc;

use crate::render::Renderer;
use crate::session::SessionStore;
use crate::storage::PageStore;

/// The services every handler needs, constructed once at startup and passed
/// through axum's state. Trait objects at the storage and rendering seams so
/// tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<dyn PageStore>,
    pub sessions: SessionStore,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(
        pages: Arc<dyn PageStore>,
        sessions: SessionStore,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self { pages, sessions, renderer }
    }
}
