//! Injects the caller's user id into requests that declare an identity slot.

// self
use crate::{auth::Credential, request::RequestDescriptor};

/// What [`inject_identity`] did to a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectionOutcome {
	/// The slot was unset and now carries the credential owner's id.
	Filled,
	/// The caller already supplied a value; it was kept.
	AlreadySet,
	/// The request declares no identity slot.
	NoField,
	/// The credential has no validation metadata, so there is no id to inject.
	NoValidation,
}

/// Fills the descriptor's identity slot from the credential's validated owner.
///
/// Never overwrites a caller-supplied value and never fails; a credential without validation
/// metadata leaves the descriptor untouched.
pub fn inject_identity(
	descriptor: &mut RequestDescriptor,
	credential: &Credential,
) -> InjectionOutcome {
	let Some(field) = descriptor.identity().cloned() else {
		return InjectionOutcome::NoField;
	};
	let Some(user_id) = credential.user_id() else {
		return InjectionOutcome::NoValidation;
	};

	if descriptor.fill_identity(&field, user_id.as_str()) {
		InjectionOutcome::Filled
	} else {
		InjectionOutcome::AlreadySet
	}
}
