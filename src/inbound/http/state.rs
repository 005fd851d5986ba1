//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they depend only on
//! [`ParseService`], never on the store or router directly.

use std::sync::Arc;

use crate::domain::parse_service::ParseService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub parse_service: Arc<ParseService>,
}

impl AppState {
    /// Construct state wrapping an already-assembled [`ParseService`].
    pub fn new(parse_service: Arc<ParseService>) -> Self {
        Self { parse_service }
    }
}
