//! Token signing and verification.

mod token_provider;

pub use token_provider::{Claims, IdentityClaims, TokenPair, TokenProvider};
