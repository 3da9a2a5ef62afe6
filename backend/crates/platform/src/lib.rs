//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random bytes)
//! - Password hashing (bcrypt, tunable cost, strength policy)
//! - Client identification (IP extraction, rate-limit keys)
//! - Rate limiting infrastructure
//! - Object storage client for uploaded assets

pub mod client;
pub mod crypto;
pub mod password;
pub mod rate_limit;
pub mod storage;
