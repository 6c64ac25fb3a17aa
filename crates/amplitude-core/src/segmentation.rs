// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query model for the event segmentation endpoint.
//!
//! A [`SegmentationQuery`] renders to the query string pairs the provider
//! expects: `e`, `m`, `start`, `end`, `i`, `s`, `g` and `limit`. Parameters
//! without a value are left out.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Largest `limit` the provider accepts.
pub const MAX_SEGMENTATION_LIMIT: u32 = 1000;

/// Number of group-by values the provider returns when `limit` is omitted.
pub const DEFAULT_SEGMENTATION_LIMIT: u32 = 100;

const DATE_FORMAT: &str = "%Y%m%d";
// Years outside this range do not render as four digits.
const MIN_QUERY_YEAR: i32 = 0;
const MAX_QUERY_YEAR: i32 = 9999;

/// A property filter, used both inside an event definition and as a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDefinition {
	pub prop: String,
	pub op: String,
	pub values: Vec<String>,
}

impl SegmentDefinition {
	pub fn new(prop: impl Into<String>, op: impl Into<String>, values: Vec<String>) -> Self {
		Self {
			prop: prop.into(),
			op: op.into(),
			values,
		}
	}

	/// Shorthand for the `is` operator.
	pub fn is(prop: impl Into<String>, values: Vec<String>) -> Self {
		Self::new(prop, "is", values)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupByKind {
	Event,
	User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBy {
	#[serde(rename = "type")]
	pub kind: GroupByKind,
	pub value: String,
}

/// The event being segmented (the `e` parameter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
	pub event_type: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub filters: Vec<SegmentDefinition>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub group_by: Vec<GroupBy>,
}

impl EventDefinition {
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			filters: Vec::new(),
			group_by: Vec::new(),
		}
	}

	pub fn with_filter(mut self, filter: SegmentDefinition) -> Self {
		self.filters.push(filter);
		self
	}

	pub fn with_group_by(mut self, kind: GroupByKind, value: impl Into<String>) -> Self {
		self.group_by.push(GroupBy {
			kind,
			value: value.into(),
		});
		self
	}
}

/// Aggregate function for the `m` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMetric {
	Uniques,
	Totals,
	PctDau,
	Average,
	Histogram,
	Sums,
	ValueAvg,
	Formula,
}

impl AggregateMetric {
	pub fn as_str(&self) -> &'static str {
		match self {
			AggregateMetric::Uniques => "uniques",
			AggregateMetric::Totals => "totals",
			AggregateMetric::PctDau => "pct_dau",
			AggregateMetric::Average => "average",
			AggregateMetric::Histogram => "histogram",
			AggregateMetric::Sums => "sums",
			AggregateMetric::ValueAvg => "value_avg",
			AggregateMetric::Formula => "formula",
		}
	}
}

impl std::fmt::Display for AggregateMetric {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Bucket size for the `i` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
	Realtime,
	Hourly,
	Daily,
	Weekly,
	Monthly,
}

impl Interval {
	/// The provider's numeric code for this interval.
	pub fn code(&self) -> i64 {
		match self {
			Interval::Realtime => -300_000,
			Interval::Hourly => -3_600_000,
			Interval::Daily => 1,
			Interval::Weekly => 7,
			Interval::Monthly => 30,
		}
	}
}

/// Optional parameters of a segmentation query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentationOptions {
	pub metric: Option<AggregateMetric>,
	pub interval: Option<Interval>,
	pub segments: Vec<SegmentDefinition>,
	pub group_by: Option<String>,
	pub limit: Option<u32>,
}

impl SegmentationOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn metric(mut self, metric: AggregateMetric) -> Self {
		self.metric = Some(metric);
		self
	}

	pub fn interval(mut self, interval: Interval) -> Self {
		self.interval = Some(interval);
		self
	}

	pub fn segment(mut self, segment: SegmentDefinition) -> Self {
		self.segments.push(segment);
		self
	}

	pub fn group_by(mut self, property: impl Into<String>) -> Self {
		self.group_by = Some(property.into());
		self
	}

	/// Caps the number of group-by values; must be in `1..=1000`.
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);
		self
	}
}

/// A complete segmentation request.
///
/// # Example
///
/// ```
/// use amplitude_core::{AggregateMetric, EventDefinition, SegmentationOptions, SegmentationQuery};
/// use chrono::NaiveDate;
///
/// let event = EventDefinition::new("login");
/// let options = SegmentationOptions::new().metric(AggregateMetric::Totals);
/// let query = SegmentationQuery::new(
///     &event,
///     NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
///     &options,
/// );
///
/// let pairs = query.to_pairs()?;
/// assert!(pairs.contains(&("start", "20230115".to_string())));
/// # Ok::<(), amplitude_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SegmentationQuery<'a> {
	event: &'a EventDefinition,
	start: NaiveDate,
	end: NaiveDate,
	options: &'a SegmentationOptions,
}

impl<'a> SegmentationQuery<'a> {
	pub fn new(
		event: &'a EventDefinition,
		start: NaiveDate,
		end: NaiveDate,
		options: &'a SegmentationOptions,
	) -> Self {
		Self {
			event,
			start,
			end,
			options,
		}
	}

	/// Renders the query string pairs in a stable order.
	///
	/// # Errors
	///
	/// [`ValidationError::LimitOutOfRange`] for a limit of 0 or above
	/// [`MAX_SEGMENTATION_LIMIT`]; [`ValidationError::DateOutOfRange`] for a
	/// start or end date outside years 0 to 9999.
	pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>> {
		let opts = self.options;
		if let Some(limit) = opts.limit {
			if limit == 0 || limit > MAX_SEGMENTATION_LIMIT {
				return Err(ValidationError::LimitOutOfRange(limit));
			}
		}

		for date in [self.start, self.end] {
			if !(MIN_QUERY_YEAR..=MAX_QUERY_YEAR).contains(&date.year()) {
				return Err(ValidationError::DateOutOfRange(date));
			}
		}

		let mut pairs = vec![("e", serde_json::to_string(self.event)?)];
		if let Some(metric) = opts.metric {
			pairs.push(("m", metric.as_str().to_string()));
		}
		pairs.push(("start", self.start.format(DATE_FORMAT).to_string()));
		pairs.push(("end", self.end.format(DATE_FORMAT).to_string()));
		if let Some(interval) = opts.interval {
			pairs.push(("i", interval.code().to_string()));
		}
		if !opts.segments.is_empty() {
			pairs.push(("s", serde_json::to_string(&opts.segments)?));
		}
		if let Some(group_by) = &opts.group_by {
			pairs.push(("g", group_by.clone()));
		}
		if let Some(limit) = opts.limit {
			pairs.push(("limit", limit.to_string()));
		}
		Ok(pairs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn date(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	fn lookup<'p>(pairs: &'p [(&'static str, String)], key: &str) -> Option<&'p str> {
		pairs
			.iter()
			.find(|(k, _)| *k == key)
			.map(|(_, v)| v.as_str())
	}

	#[test]
	fn minimal_query_has_event_and_dates_only() {
		let event = EventDefinition::new("login");
		let options = SegmentationOptions::new();
		let pairs = SegmentationQuery::new(&event, date(2023, 1, 15), date(2023, 2, 1), &options)
			.to_pairs()
			.unwrap();

		let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
		assert_eq!(keys, vec!["e", "start", "end"]);
		assert_eq!(lookup(&pairs, "e"), Some(r#"{"event_type":"login"}"#));
		assert_eq!(lookup(&pairs, "start"), Some("20230115"));
		assert_eq!(lookup(&pairs, "end"), Some("20230201"));
	}

	#[test]
	fn full_query_renders_every_parameter() {
		let event = EventDefinition::new("purchase")
			.with_filter(SegmentDefinition::is("platform", vec!["ios".to_string()]))
			.with_group_by(GroupByKind::User, "country");
		let options = SegmentationOptions::new()
			.metric(AggregateMetric::PctDau)
			.interval(Interval::Weekly)
			.segment(SegmentDefinition::is("country", vec!["NZ".to_string()]))
			.group_by("city")
			.limit(250);

		let pairs = SegmentationQuery::new(&event, date(2024, 3, 1), date(2024, 3, 31), &options)
			.to_pairs()
			.unwrap();

		let e: serde_json::Value = serde_json::from_str(lookup(&pairs, "e").unwrap()).unwrap();
		assert_eq!(e["group_by"][0]["type"], "user");
		assert_eq!(e["filters"][0]["op"], "is");
		assert_eq!(lookup(&pairs, "m"), Some("pct_dau"));
		assert_eq!(lookup(&pairs, "i"), Some("7"));
		assert_eq!(
			lookup(&pairs, "s"),
			Some(r#"[{"prop":"country","op":"is","values":["NZ"]}]"#)
		);
		assert_eq!(lookup(&pairs, "g"), Some("city"));
		assert_eq!(lookup(&pairs, "limit"), Some("250"));
	}

	#[test]
	fn limit_bounds_are_enforced() {
		let event = EventDefinition::new("login");
		for limit in [0, MAX_SEGMENTATION_LIMIT + 1] {
			let options = SegmentationOptions::new().limit(limit);
			let err = SegmentationQuery::new(&event, date(2023, 1, 1), date(2023, 1, 2), &options)
				.to_pairs()
				.unwrap_err();
			assert_eq!(err, ValidationError::LimitOutOfRange(limit));
		}

		let options = SegmentationOptions::new().limit(MAX_SEGMENTATION_LIMIT);
		assert!(
			SegmentationQuery::new(&event, date(2023, 1, 1), date(2023, 1, 2), &options)
				.to_pairs()
				.is_ok()
		);
	}

	#[test]
	fn dates_beyond_four_digit_years_are_rejected() {
		let event = EventDefinition::new("login");
		let options = SegmentationOptions::new();
		let far = date(10_000, 1, 1);

		let err = SegmentationQuery::new(&event, date(2023, 1, 1), far, &options)
			.to_pairs()
			.unwrap_err();
		assert_eq!(err, ValidationError::DateOutOfRange(far));

		let before = date(-1, 12, 31);
		let err = SegmentationQuery::new(&event, before, date(2023, 1, 1), &options)
			.to_pairs()
			.unwrap_err();
		assert_eq!(err, ValidationError::DateOutOfRange(before));

		let pairs = SegmentationQuery::new(&event, date(9999, 12, 31), date(9999, 12, 31), &options)
			.to_pairs()
			.unwrap();
		assert_eq!(lookup(&pairs, "start"), Some("99991231"));
	}

	#[test]
	fn interval_codes() {
		assert_eq!(Interval::Realtime.code(), -300_000);
		assert_eq!(Interval::Hourly.code(), -3_600_000);
		assert_eq!(Interval::Daily.code(), 1);
		assert_eq!(Interval::Monthly.code(), 30);
	}

	#[test]
	fn metric_names_match_serde() {
		for metric in [
			AggregateMetric::Uniques,
			AggregateMetric::Totals,
			AggregateMetric::PctDau,
			AggregateMetric::Average,
			AggregateMetric::Histogram,
			AggregateMetric::Sums,
			AggregateMetric::ValueAvg,
			AggregateMetric::Formula,
		] {
			assert_eq!(
				serde_json::to_value(metric).unwrap(),
				serde_json::Value::from(metric.as_str())
			);
		}
	}

	proptest! {
		#[test]
		// Day offsets from 1970-01-01 covering years 1 through 9999.
		fn dates_are_eight_digits(a in -719_162i64..2_932_897, b in -719_162i64..2_932_897) {
			let epoch = date(1970, 1, 1);
			let start = epoch + chrono::Duration::days(a.min(b));
			let end = epoch + chrono::Duration::days(a.max(b));
			let event = EventDefinition::new("login");
			let options = SegmentationOptions::new();
			let pairs = SegmentationQuery::new(&event, start, end, &options).to_pairs().unwrap();

			for key in ["start", "end"] {
				let value = lookup(&pairs, key).unwrap();
				prop_assert_eq!(value.len(), 8);
				prop_assert!(value.chars().all(|c| c.is_ascii_digit()));
			}
			prop_assert_eq!(lookup(&pairs, "start").unwrap(), start.format("%Y%m%d").to_string());
		}

		#[test]
		fn s_is_present_iff_segments_supplied(count in 0usize..4) {
			let event = EventDefinition::new("login");
			let options = (0..count).fold(SegmentationOptions::new(), |o, n| {
				o.segment(SegmentDefinition::is("prop", vec![n.to_string()]))
			});
			let pairs = SegmentationQuery::new(&event, date(2023, 1, 1), date(2023, 1, 2), &options)
				.to_pairs()
				.unwrap();
			prop_assert_eq!(lookup(&pairs, "s").is_some(), count > 0);
		}
	}
}
