//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only ever see
//! driving ports, so they can be exercised against the in-memory store or
//! mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, CoordinateService, ItemService, SocialService, TokenService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub items: Arc<dyn ItemService>,
    pub coordinates: Arc<dyn CoordinateService>,
    pub social: Arc<dyn SocialService>,
    /// Verifies bearer tokens for [`crate::inbound::http::session::SessionContext`].
    pub tokens: Arc<dyn TokenService>,
}
