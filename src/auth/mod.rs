//! Authentication against Adobe IMS
//!
//! Implements the JWT service-account flow: a short-lived JWT signed with the
//! technical account's private key is exchanged at IMS for a bearer access
//! token, which is cached until shortly before expiry.

mod provider;
mod types;


pub use provider::TokenProvider;
pub use types::CachedToken;
