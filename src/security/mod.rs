//! Credential hashing and access tokens.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{AuthenticatedUser, Claims, TOKEN_LIFETIME_HOURS, decode_token, issue_token};
