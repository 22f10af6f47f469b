//! A small endpoint catalog built on [`Request`](crate::request::Request).
//!
//! Each endpoint pairs a request struct with its response model. Models use the lenient
//! decoders from [`decode`](crate::decode) where Helix is known to send inconsistent data.

pub mod channels;
pub mod ingest;
pub mod schedule;
pub mod streams;
pub mod users;
pub mod validate;

pub use channels::*;
pub use ingest::*;
pub use schedule::*;
pub use streams::*;
pub use users::*;
pub use validate::*;
