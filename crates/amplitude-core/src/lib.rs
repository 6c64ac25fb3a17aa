// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core record types for the Amplitude HTTP API.
//!
//! This crate holds the validation and serialization model shared by the
//! client SDK (`amplitude`). It performs no I/O.
//!
//! # Overview
//!
//! - [`Event`]: one analytics occurrence, validated when built
//! - [`Identification`]: a user property update without an event
//! - [`Formatters`]: host-supplied transforms for time and property maps
//! - [`SegmentationQuery`]: query parameters for the segmentation endpoint
//! - [`DeletionRequest`]: form fields for the user deletion endpoint
//!
//! # Example
//!
//! ```
//! use amplitude_core::{Event, Properties};
//!
//! let event = Event::builder()
//!     .user_id("u1")
//!     .event_type("login")
//!     .build()?;
//!
//! let map = event.to_normalized_map();
//! assert_eq!(map["event_type"], "login");
//! assert_eq!(map["user_id"], "u1");
//! assert!(!map.contains_key("device_id"));
//! # Ok::<(), amplitude_core::ValidationError>(())
//! ```

pub mod deletion;
pub mod error;
pub mod event;
pub mod formatters;
pub mod identification;
pub mod identifier;
pub mod properties;
pub mod segmentation;

pub use deletion::DeletionRequest;
pub use error::{Result, ValidationError};
pub use event::{is_reserved_event_type, reserved_events, Event, EventBuilder};
pub use formatters::{Formatters, PropertiesFormatter, TimeFormatter};
pub use identification::{Identification, IdentificationBuilder};
pub use identifier::{AccountIdentity, UserIdentifier, NO_ACCOUNT_USER_ID};
pub use properties::Properties;
pub use segmentation::{
	AggregateMetric, EventDefinition, GroupBy, GroupByKind, Interval, SegmentDefinition,
	SegmentationOptions, SegmentationQuery, DEFAULT_SEGMENTATION_LIMIT, MAX_SEGMENTATION_LIMIT,
};
