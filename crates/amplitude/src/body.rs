// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Form bodies for the track and identify requests.
//!
//! Both endpoints take a form-encoded body with the project `api_key` and a
//! field holding a JSON array of normalized records.

use amplitude_core::{Event, Identification};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Body of a track request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackBody {
	pub api_key: String,
	/// JSON array of normalized events.
	pub event: String,
}

/// Body of an identify request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifyBody {
	pub api_key: String,
	/// JSON array of normalized identifications.
	pub identification: String,
}

pub fn track_body(api_key: &str, events: &[Event]) -> Result<TrackBody> {
	let records: Vec<Value> = events
		.iter()
		.map(|e| Value::Object(e.to_normalized_map()))
		.collect();

	Ok(TrackBody {
		api_key: api_key.to_string(),
		event: serde_json::to_string(&records)?,
	})
}

pub fn identify_body(api_key: &str, identifications: &[Identification]) -> Result<IdentifyBody> {
	let records: Vec<Value> = identifications
		.iter()
		.map(|i| Value::Object(i.to_normalized_map()))
		.collect();

	Ok(IdentifyBody {
		api_key: api_key.to_string(),
		identification: serde_json::to_string(&records)?,
	})
}
