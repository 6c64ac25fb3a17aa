// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction with the SDK User-Agent.

use reqwest::{Client, ClientBuilder};

const SDK_NAME: &str = "amplitude-rs";
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the SDK User-Agent string, e.g. `amplitude-rs/0.1.0`.
pub fn user_agent() -> String {
	format!("{SDK_NAME}/{SDK_VERSION}")
}

/// A client builder preconfigured with the SDK User-Agent.
///
/// No timeout is set; the transport default applies unless the caller adds
/// one.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_name_and_version() {
		let ua = user_agent();
		let (name, version) = ua.split_once('/').unwrap();
		assert_eq!(name, "amplitude-rs");
		assert_eq!(version, env!("CARGO_PKG_VERSION"));
	}

	#[test]
	fn builder_builds() {
		assert!(builder().build().is_ok());
	}
}
