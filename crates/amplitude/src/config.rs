// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SDK configuration: credentials, logging choice and record formatters.
//!
//! A [`Config`] is built once at startup, either in code or from the
//! environment, and handed to [`AmplitudeClient`](crate::AmplitudeClient).
//! It is immutable afterwards; clone it to share.
//!
//! # Environment
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `AMPLITUDE_API_KEY` / `AMPLITUDE_API_KEY_FILE` | project API key (required) |
//! | `AMPLITUDE_SECRET_KEY` / `AMPLITUDE_SECRET_KEY_FILE` | secret key for segmentation and deletion |
//! | `AMPLITUDE_USE_HOST_LOGGER` | skip the built-in console logger; anything but `false`, `0` or empty counts as true |
//!
//! `*_FILE` variants take precedence and have a single trailing newline
//! stripped, matching Docker and Kubernetes secret mounts.

use std::path::PathBuf;
use std::{env, fs};

use amplitude_core::Formatters;

use crate::error::ConfigError;
use crate::secret::SecretString;

const DEFAULT_ENV_PREFIX: &str = "AMPLITUDE";

#[derive(Debug, Clone)]
pub struct Config {
	api_key: SecretString,
	secret_key: Option<SecretString>,
	use_host_logger: bool,
	formatters: Formatters,
}

impl Config {
	pub fn new(api_key: impl Into<SecretString>) -> Self {
		Self {
			api_key: api_key.into(),
			secret_key: None,
			use_host_logger: false,
			formatters: Formatters::default(),
		}
	}

	/// Loads configuration from `AMPLITUDE_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_prefixed(DEFAULT_ENV_PREFIX)
	}

	/// Loads configuration from `{prefix}_API_KEY`, `{prefix}_SECRET_KEY` and
	/// `{prefix}_USE_HOST_LOGGER`.
	pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
		let api_key_var = format!("{prefix}_API_KEY");
		let api_key = load_secret_env(&api_key_var)?
			.ok_or(ConfigError::MissingApiKey { var: api_key_var })?;
		let secret_key = load_secret_env(&format!("{prefix}_SECRET_KEY"))?;
		let use_host_logger = env::var(format!("{prefix}_USE_HOST_LOGGER"))
			.map(|value| parse_flag(&value))
			.unwrap_or(false);

		Ok(Self {
			api_key,
			secret_key,
			use_host_logger,
			formatters: Formatters::default(),
		})
	}

	pub fn with_secret_key(mut self, secret_key: impl Into<SecretString>) -> Self {
		self.secret_key = Some(secret_key.into());
		self
	}

	/// When true, log output goes to whatever `tracing` subscriber the host
	/// installed and the SDK does not install its own.
	pub fn with_host_logger(mut self, use_host_logger: bool) -> Self {
		self.use_host_logger = use_host_logger;
		self
	}

	pub fn with_formatters(mut self, formatters: Formatters) -> Self {
		self.formatters = formatters;
		self
	}

	pub fn api_key(&self) -> &SecretString {
		&self.api_key
	}

	pub fn secret_key(&self) -> Option<&SecretString> {
		self.secret_key.as_ref()
	}

	pub fn use_host_logger(&self) -> bool {
		self.use_host_logger
	}

	pub fn formatters(&self) -> &Formatters {
		&self.formatters
	}
}

fn parse_flag(value: &str) -> bool {
	!matches!(
		value.trim().to_ascii_lowercase().as_str(),
		"" | "false" | "0"
	)
}

/// Reads `VAR_FILE` (preferred) or `VAR`. Returns `Ok(None)` if neither is
/// set.
fn load_secret_env(var: &str) -> Result<Option<SecretString>, ConfigError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(ConfigError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path_str);
		let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
			path: path.clone(),
			source,
		})?;
		let secret = content.strip_suffix('\n').unwrap_or(&content);
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(env::var(var).ok().map(SecretString::from))
}
