//! URLs with unresolved placeholders.
//!
//! Thumbnail and box-art URLs carry `{width}x{height}` (or `%{width}x%{height}`) placeholders and
//! ingest URLs carry `{stream_key}`. Decoding only records the raw string and which placeholders
//! it uses; a concrete [`Url`] is produced by [`TemplateUrl::resolve`] once the caller picks the
//! values.

// crates.io
use serde::{Deserializer, Serializer};
// self
use crate::_prelude::*;

/// Placeholder style detected in a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateStrategy {
	/// `{width}` and `{height}`.
	Dimensions,
	/// `%{width}` and `%{height}`.
	PercentDimensions,
	/// `{stream_key}`.
	StreamKey,
	/// No placeholders.
	Literal,
}
impl TemplateStrategy {
	fn detect(raw: &str) -> Self {
		if raw.contains("%{width}") && raw.contains("%{height}") {
			Self::PercentDimensions
		} else if raw.contains("{width}") && raw.contains("{height}") {
			Self::Dimensions
		} else if raw.contains("{stream_key}") {
			Self::StreamKey
		} else {
			Self::Literal
		}
	}

	/// Returns a stable label suitable for error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			TemplateStrategy::Dimensions => "dimensions",
			TemplateStrategy::PercentDimensions => "percent_dimensions",
			TemplateStrategy::StreamKey => "stream_key",
			TemplateStrategy::Literal => "literal",
		}
	}
}
impl Display for TemplateStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Values substituted into a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Substitution<'a> {
	/// No values; only literal templates resolve.
	None,
	/// Image dimensions in pixels.
	Dimensions {
		/// Width in pixels.
		width: u32,
		/// Height in pixels.
		height: u32,
	},
	/// Stream key for ingest URLs.
	StreamKey(&'a str),
}

/// Errors emitted while resolving a template.
#[derive(Debug, ThisError)]
pub enum TemplateError {
	/// The supplied values do not fit the template's placeholders.
	#[error("Template uses {strategy} placeholders which the supplied values do not cover.")]
	MissingSubstitution {
		/// Strategy detected in the template.
		strategy: TemplateStrategy,
	},
	/// The substituted string is not a URL.
	#[error(transparent)]
	InvalidUrl(#[from] url::ParseError),
}

/// Raw template string plus its detected strategy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateUrl {
	raw: String,
	strategy: TemplateStrategy,
}
impl TemplateUrl {
	/// Wraps a raw template string.
	pub fn new(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let strategy = TemplateStrategy::detect(&raw);

		Self { raw, strategy }
	}

	/// Unresolved template string.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Placeholder style.
	pub fn strategy(&self) -> TemplateStrategy {
		self.strategy
	}

	/// Produces a concrete URL from the template.
	pub fn resolve(&self, substitution: Substitution) -> Result<Url, TemplateError> {
		let resolved = match (self.strategy, substitution) {
			(TemplateStrategy::Literal, _) => self.raw.clone(),
			(TemplateStrategy::Dimensions, Substitution::Dimensions { width, height }) => self
				.raw
				.replace("{width}", &width.to_string())
				.replace("{height}", &height.to_string()),
			(TemplateStrategy::PercentDimensions, Substitution::Dimensions { width, height }) =>
				self.raw
					.replace("%{width}", &width.to_string())
					.replace("%{height}", &height.to_string()),
			(TemplateStrategy::StreamKey, Substitution::StreamKey(key)) =>
				self.raw.replace("{stream_key}", key),
			(strategy, _) => return Err(TemplateError::MissingSubstitution { strategy }),
		};

		Ok(Url::parse(&resolved)?)
	}
}
impl Serialize for TemplateUrl {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.raw)
	}
}
impl<'de> Deserialize<'de> for TemplateUrl {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Self::new(String::deserialize(deserializer)?))
	}
}
