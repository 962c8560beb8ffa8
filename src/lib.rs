//! Member Auth - member identity and session token service
//!
//! Members sign up with a unique name and password, log in to receive a
//! short-lived access token and a long-lived refresh token, and trade the
//! refresh token for a new pair. Each member has exactly one live refresh
//! token; every reissue rotates it and the previous one stops working.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Members, authorities, refresh token records and passwords
//! - **security**: JWT token issuing and validation
//! - **services**: Signup, login and reissue orchestration
//! - **infra**: Database, migrations, repositories and the in-memory backend
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against Postgres
//! cargo run -- serve
//!
//! # Start the server without a database
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod security;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Authority, Member, RefreshToken};
pub use errors::{AppError, AppResult};
pub use security::{TokenPair, TokenProvider};
pub use services::{MemberManager, MemberService};
