//! Domain layer - Core business entities and logic
//!
//! Members, their authority, the refresh token record and password hashing.
//! Nothing here knows about HTTP or the database.

pub mod member;
pub mod password;
pub mod refresh_token;

pub use member::{Authority, Member};
pub use password::{Argon2PasswordEncoder, Password, PasswordEncoder};
pub use refresh_token::RefreshToken;
