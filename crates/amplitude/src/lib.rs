// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK for the Amplitude HTTP API.
//!
//! This crate sends events and user identifications to Amplitude, queries
//! event segmentation and requests user deletion. Each call sends one request
//! and hands back the provider's response untouched.
//!
//! # Quick Start
//!
//! ```ignore
//! use amplitude::{AmplitudeClient, Config, Properties};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AmplitudeClient::builder()
//!         .config(Config::new("api-key").with_secret_key("secret-key"))
//!         .build()?;
//!
//!     // One-off event; `None` user sends the no-account sentinel
//!     client.send_event("button_clicked", Some("user_123"), None, Some(
//!         Properties::new().insert("button_name", "checkout"),
//!     )).await?;
//!
//!     // Set user properties
//!     client.send_identify(Some("user_123"), None, Some(
//!         Properties::new().insert("plan", "pro"),
//!     )).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`Config::from_env`] reads `AMPLITUDE_API_KEY`, `AMPLITUDE_SECRET_KEY` and
//! `AMPLITUDE_USE_HOST_LOGGER`. Formatters for timestamps and property maps
//! are set with [`Config::with_formatters`] and apply to every record built
//! through [`AmplitudeClient::event_builder`] and
//! [`AmplitudeClient::identification_builder`].
//!
//! # Logging
//!
//! The SDK logs through `tracing`. Unless the config opts into the host's
//! logger, building a client installs a warn-level console subscriber if
//! none is set.
//!
//! # Error Handling
//!
//! Records are validated when built, so an invalid event never reaches the
//! network. Non-2xx responses are not errors.
//!
//! ```ignore
//! use amplitude::AmplitudeError;
//!
//! match client.send_event("[Amplitude] Revenue", Some("u1"), None, None).await {
//!     Ok(response) => println!("status {}", response.status()),
//!     Err(AmplitudeError::Validation(e)) => eprintln!("invalid event: {e}"),
//!     Err(e) => eprintln!("request failed: {e}"),
//! }
//! ```

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod secret;

pub use client::{
	AmplitudeClient, AmplitudeClientBuilder, ClientConfig, Endpoints, DELETION_URL, IDENTIFY_URL,
	SEGMENTATION_URL, TRACK_URL,
};
pub use config::Config;
pub use error::{AmplitudeError, ConfigError, Result};
pub use secret::SecretString;

// Re-export the record and query types callers build
pub use amplitude_core::{
	is_reserved_event_type, reserved_events, AccountIdentity, AggregateMetric, DeletionRequest,
	Event, EventBuilder, EventDefinition, Formatters, GroupBy, GroupByKind, Identification,
	IdentificationBuilder, Interval, Properties, SegmentDefinition, SegmentationOptions,
	SegmentationQuery, UserIdentifier, ValidationError, DEFAULT_SEGMENTATION_LIMIT,
	MAX_SEGMENTATION_LIMIT, NO_ACCOUNT_USER_ID,
};
