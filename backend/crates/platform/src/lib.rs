//! Platform Crate - Technical Infrastructure
//!
//! Technical foundations shared by the service crates:
//! - Password hashing and verification (Argon2id)
//! - HMAC-SHA256 signing and base64 helpers
//! - Cookie building and credential extraction from headers

pub mod cookie;
pub mod crypto;
pub mod password;
