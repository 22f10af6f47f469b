//! Lenient field decoders for response models.
//!
//! Each strategy is a plain function (or `with` module) wired per field through
//! `#[serde(deserialize_with = "...")]`, so a model composes exactly the tolerance it needs:
//!
//! - [`tolerant_url`] turns malformed URLs into `None`.
//! - [`date`] accepts RFC 3339 timestamps with or without fractional seconds, and plain dates.
//! - [`interval`] decodes `{start, end}` pairs into a [`DateInterval`].
//! - [`singleton`] unwraps one-element arrays and rejects any other length.
//! - [`collection`] treats `null` lists as empty.
//! - [`cursor`] reads the opaque pagination cursor.
//! - [`template`] keeps placeholder URLs unresolved until the caller supplies values.

pub mod collection;
pub mod cursor;
pub mod date;
pub mod interval;
pub mod singleton;
pub mod template;
pub mod tolerant_url;

pub use cursor::*;
pub use interval::*;
pub use template::*;
