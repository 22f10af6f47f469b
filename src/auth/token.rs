//! Token secrets and the immutable credential built around them.

pub mod credential;
pub mod secret;
