//! Credential model, credential policy, and acting-identity injection.

pub mod id;
pub mod identity;
pub mod policy;
pub mod scope;
pub mod token;

pub use id::*;
pub use identity::*;
pub use policy::*;
pub use scope::*;
pub use token::{credential::*, secret::*};
