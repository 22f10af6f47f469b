//! Start/end timestamp pairs.

// self
use crate::{_prelude::*, decode::date};

/// Closed-open time span decoded from a `{start, end}` object.
///
/// Accepts `start`/`end` as well as the `start_time`/`end_time` spelling used by schedule
/// payloads. Both ends accept RFC 3339 timestamps or plain calendar dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct DateInterval {
	/// First instant covered by the interval.
	#[serde(alias = "start_time", deserialize_with = "date::flexible")]
	pub start: OffsetDateTime,
	/// Instant the interval ends.
	#[serde(alias = "end_time", deserialize_with = "date::flexible")]
	pub end: OffsetDateTime,
}
impl DateInterval {
	/// Length of the interval; zero when `end` precedes `start`.
	pub fn duration(&self) -> Duration {
		if self.end > self.start { self.end - self.start } else { Duration::ZERO }
	}

	/// Returns true if `instant` falls within `[start, end)`.
	pub fn contains(&self, instant: OffsetDateTime) -> bool {
		self.start <= instant && instant < self.end
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn decodes_both_spellings() {
		let short: DateInterval =
			serde_json::from_str(r#"{"start":"2021-05-16T00:00:00Z","end":"2021-05-23"}"#)
				.expect("Interval should decode.");
		let long: DateInterval = serde_json::from_str(
			r#"{"start_time":"2021-05-16T00:00:00.5Z","end_time":"2021-05-23T00:00:00Z"}"#,
		)
		.expect("Schedule interval should decode.");

		assert_eq!(short.start, macros::datetime!(2021-05-16 00:00 UTC));
		assert_eq!(short.end, macros::datetime!(2021-05-23 00:00 UTC));
		assert_eq!(short.duration(), Duration::days(7));
		assert_eq!(long.end, short.end);
		assert!(long.contains(macros::datetime!(2021-05-20 12:00 UTC)));
		assert!(!long.contains(long.end));
	}

	#[test]
	fn missing_end_fails() {
		assert!(serde_json::from_str::<DateInterval>(r#"{"start":"2021-05-16"}"#).is_err());
	}
}
