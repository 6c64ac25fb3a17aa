// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Amplitude SDK.

use std::path::PathBuf;

use amplitude_core::ValidationError;
use thiserror::Error;

/// Amplitude SDK errors.
///
/// HTTP status codes are never turned into errors; the raw response is
/// returned for the caller to inspect.
#[derive(Debug, Error)]
pub enum AmplitudeError {
	/// API key is missing or empty.
	#[error("invalid API key: an api_key must be configured")]
	InvalidApiKey,

	/// A record or query failed validation.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Transport failure (connect, TLS, timeout). Passed through unchanged.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	#[error("serialization error: {0}")]
	Serialization(String),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl From<serde_json::Error> for AmplitudeError {
	fn from(err: serde_json::Error) -> Self {
		AmplitudeError::Serialization(err.to_string())
	}
}

/// Errors raised while loading [`Config`](crate::Config) from the
/// environment.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },

	#[error("required secret not found: set either {var} or {var}_FILE")]
	MissingApiKey { var: String },
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, AmplitudeError>;
