//! Application state - Dependency injection container.
//!
//! Wires the member service to whichever storage backend the server runs on.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{Argon2PasswordEncoder, PasswordEncoder};
use crate::errors::AppResult;
use crate::infra::{Database, InMemoryPersistence, Persistence, UnitOfWork};
use crate::security::TokenProvider;
use crate::services::{MemberManager, MemberService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Signup, login, reissue and token authentication
    pub member_service: Arc<dyn MemberService>,
    /// Database handle, absent when running on the in-memory backend
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state backed by the database.
    pub fn from_database(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let uow = Persistence::new(database.get_connection());

        Ok(Self {
            member_service: Self::member_service(uow, config)?,
            database: Some(database),
        })
    }

    /// Create application state backed by process memory.
    ///
    /// Nothing survives a restart; intended for local runs and tests.
    pub fn in_memory(config: &Config) -> AppResult<Self> {
        Ok(Self {
            member_service: Self::member_service(InMemoryPersistence::new(), config)?,
            database: None,
        })
    }

    /// Create application state with a manually injected service.
    pub fn new(member_service: Arc<dyn MemberService>, database: Option<Arc<Database>>) -> Self {
        Self {
            member_service,
            database,
        }
    }

    fn member_service<U: UnitOfWork + 'static>(
        uow: U,
        config: &Config,
    ) -> AppResult<Arc<dyn MemberService>> {
        let tokens = Arc::new(TokenProvider::from_config(config));
        let encoder: Arc<dyn PasswordEncoder> = Arc::new(Argon2PasswordEncoder);

        Ok(Arc::new(MemberManager::new(Arc::new(uow), tokens, encoder)?))
    }
}
