// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors raised while building records and queries.

use thiserror::Error;

/// Errors raised synchronously when a record or query is constructed.
///
/// These are caller mistakes. Fix the input; retrying will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("missing identifier: provide user_id or device_id (or both)")]
	MissingIdentifier,

	#[error("missing event type")]
	MissingEventType,

	#[error("reserved event type: {0} is reserved by Amplitude")]
	ReservedEventType(String),

	#[error("price required: {field} cannot be set without a price")]
	PriceRequired { field: &'static str },

	#[error("invalid price: must be a finite number")]
	InvalidPrice,

	#[error("segmentation limit {0} out of range (1..=1000)")]
	LimitOutOfRange(u32),

	#[error("segmentation date {0} cannot be written as YYYYMMDD")]
	DateOutOfRange(chrono::NaiveDate),

	#[error("serialization error: {0}")]
	Serialization(String),
}

impl From<serde_json::Error> for ValidationError {
	fn from(err: serde_json::Error) -> Self {
		ValidationError::Serialization(err.to_string())
	}
}

/// A specialized `Result` type for record construction.
pub type Result<T> = std::result::Result<T, ValidationError>;
