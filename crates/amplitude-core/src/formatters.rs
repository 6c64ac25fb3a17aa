// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Host-supplied transforms applied while normalizing records.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::properties::Properties;

pub type TimeFormatter = Arc<dyn Fn(DateTime<Utc>) -> Option<i64> + Send + Sync>;
pub type PropertiesFormatter = Arc<dyn Fn(Properties) -> Properties + Send + Sync>;

/// The three formatter functions used when records are normalized.
///
/// Defaults:
/// - time: milliseconds since the Unix epoch, truncated
/// - event and user properties: returned unchanged
///
/// # Example
///
/// ```
/// use amplitude_core::{Formatters, Properties};
///
/// let formatters = Formatters::default()
///     .with_time_formatter(|t| Some(t.timestamp()))
///     .with_user_properties_formatter(|p| p.insert("source", "backend"));
/// ```
#[derive(Clone)]
pub struct Formatters {
	time: TimeFormatter,
	event_properties: PropertiesFormatter,
	user_properties: PropertiesFormatter,
}

impl Formatters {
	pub fn with_time_formatter<F>(mut self, f: F) -> Self
	where
		F: Fn(DateTime<Utc>) -> Option<i64> + Send + Sync + 'static,
	{
		self.time = Arc::new(f);
		self
	}

	pub fn with_event_properties_formatter<F>(mut self, f: F) -> Self
	where
		F: Fn(Properties) -> Properties + Send + Sync + 'static,
	{
		self.event_properties = Arc::new(f);
		self
	}

	pub fn with_user_properties_formatter<F>(mut self, f: F) -> Self
	where
		F: Fn(Properties) -> Properties + Send + Sync + 'static,
	{
		self.user_properties = Arc::new(f);
		self
	}

	pub fn format_time(&self, time: DateTime<Utc>) -> Option<i64> {
		(self.time)(time)
	}

	pub fn format_event_properties(&self, props: Properties) -> Properties {
		(self.event_properties)(props)
	}

	pub fn format_user_properties(&self, props: Properties) -> Properties {
		(self.user_properties)(props)
	}
}

impl Default for Formatters {
	fn default() -> Self {
		Self {
			time: Arc::new(|t| Some(t.timestamp_millis())),
			event_properties: Arc::new(|p| p),
			user_properties: Arc::new(|p| p),
		}
	}
}

impl fmt::Debug for Formatters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Formatters").finish_non_exhaustive()
	}
}
