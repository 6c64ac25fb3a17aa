// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event records for the track endpoint.
//!
//! An [`Event`] is validated once, when [`EventBuilder::build`] runs, and is
//! then serialized with [`Event::to_normalized_map`] into the object the
//! provider expects inside the `event` form field.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::formatters::Formatters;
use crate::identifier::{AccountIdentity, UserIdentifier};
use crate::properties::Properties;

/// Event types the provider reserves for its own use.
pub mod reserved_events {
	pub const START_SESSION: &str = "[Amplitude] Start Session";
	pub const END_SESSION: &str = "[Amplitude] End Session";
	pub const REVENUE: &str = "[Amplitude] Revenue";
	pub const REVENUE_VERIFIED: &str = "[Amplitude] Revenue (Verified)";
	pub const REVENUE_UNVERIFIED: &str = "[Amplitude] Revenue (Unverified)";
	pub const MERGED_USER: &str = "[Amplitude] Merged User";

	pub const ALL: [&str; 6] = [
		START_SESSION,
		END_SESSION,
		REVENUE,
		REVENUE_VERIFIED,
		REVENUE_UNVERIFIED,
		MERGED_USER,
	];
}

/// Returns true if `event_type` is reserved and may not be sent by clients.
pub fn is_reserved_event_type(event_type: &str) -> bool {
	reserved_events::ALL.contains(&event_type)
}

/// Descriptive attributes sent as-is when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct EventContext {
	#[serde(skip_serializing_if = "Option::is_none")]
	app_version: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	platform: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	os_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	os_version: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	device_brand: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	device_manufacturer: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	device_model: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	carrier: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	country: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	region: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	city: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	dma: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	language: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	location_lat: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	location_lng: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	ip: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	idfa: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	adid: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	insert_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	session_id: Option<i64>,
}

/// Revenue attributes, named the way the provider spells them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct Revenue {
	#[serde(skip_serializing_if = "Option::is_none")]
	price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	quantity: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	revenue: Option<f64>,
	#[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
	product_id: Option<String>,
	#[serde(rename = "revenueType", skip_serializing_if = "Option::is_none")]
	revenue_type: Option<String>,
}

impl Revenue {
	fn validate(&self) -> Result<()> {
		if let Some(price) = self.price {
			// Non-finite floats encode as null and would vanish from the wire.
			if !price.is_finite() {
				return Err(ValidationError::InvalidPrice);
			}
			return Ok(());
		}
		if self.product_id.is_some() {
			return Err(ValidationError::PriceRequired {
				field: "product_id",
			});
		}
		if self.revenue_type.is_some() {
			return Err(ValidationError::PriceRequired {
				field: "revenue_type",
			});
		}
		Ok(())
	}
}

/// A single analytics event.
///
/// # Example
///
/// ```
/// use amplitude_core::{Event, Properties};
///
/// let event = Event::builder()
///     .user_id("u1")
///     .event_type("purchase")
///     .event_properties(Properties::new().insert("sku", "A-1"))
///     .price(9.99)
///     .build()?;
///
/// assert_eq!(event.quantity(), Some(1));
/// # Ok::<(), amplitude_core::ValidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Event {
	user_id: Option<UserIdentifier>,
	device_id: Option<String>,
	event_type: String,
	time: Option<DateTime<Utc>>,
	event_properties: Properties,
	user_properties: Properties,
	groups: Option<Properties>,
	context: EventContext,
	revenue: Revenue,
	formatters: Formatters,
}

impl Event {
	pub fn builder() -> EventBuilder {
		EventBuilder::default()
	}

	pub fn user_id(&self) -> Option<&UserIdentifier> {
		self.user_id.as_ref()
	}

	pub fn device_id(&self) -> Option<&str> {
		self.device_id.as_deref()
	}

	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	pub fn time(&self) -> Option<DateTime<Utc>> {
		self.time
	}

	pub fn event_properties(&self) -> &Properties {
		&self.event_properties
	}

	pub fn user_properties(&self) -> &Properties {
		&self.user_properties
	}

	pub fn groups(&self) -> Option<&Properties> {
		self.groups.as_ref()
	}

	pub fn insert_id(&self) -> Option<&str> {
		self.context.insert_id.as_deref()
	}

	pub fn price(&self) -> Option<f64> {
		self.revenue.price
	}

	pub fn quantity(&self) -> Option<i64> {
		self.revenue.quantity
	}

	pub fn revenue(&self) -> Option<f64> {
		self.revenue.revenue
	}

	pub fn product_id(&self) -> Option<&str> {
		self.revenue.product_id.as_deref()
	}

	pub fn revenue_type(&self) -> Option<&str> {
		self.revenue.revenue_type.as_deref()
	}

	/// Sets one event property. The event is not re-validated.
	pub fn set_event_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.event_properties.set(key, value);
	}

	/// Sets one user property. The event is not re-validated.
	pub fn set_user_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.user_properties.set(key, value);
	}

	/// Builds the wire object for this event.
	///
	/// Always contains `event_type`, `event_properties` and `user_properties`;
	/// every other key appears only when it has a value. No key maps to
	/// `null`.
	pub fn to_normalized_map(&self) -> Map<String, Value> {
		let mut map = Map::new();
		map.insert(
			"event_type".to_string(),
			Value::String(self.event_type.clone()),
		);
		map.insert(
			"event_properties".to_string(),
			self
				.formatters
				.format_event_properties(self.event_properties.clone())
				.into_value(),
		);
		map.insert(
			"user_properties".to_string(),
			self
				.formatters
				.format_user_properties(self.user_properties.clone())
				.into_value(),
		);
		if let Some(user_id) = &self.user_id {
			map.insert("user_id".to_string(), Value::from(user_id.as_str()));
		}
		if let Some(device_id) = &self.device_id {
			map.insert("device_id".to_string(), Value::from(device_id.as_str()));
		}
		if let Some(time) = self.time.and_then(|t| self.formatters.format_time(t)) {
			map.insert("time".to_string(), Value::from(time));
		}
		if let Some(groups) = &self.groups {
			map.insert("groups".to_string(), groups.clone().into_value());
		}
		extend_with(&mut map, &self.context);
		extend_with(&mut map, &self.revenue);

		// Formatters may hand back nulls, and non-finite floats encode as null.
		map.retain(|_, value| !value.is_null());
		map
	}
}

impl PartialEq for Event {
	fn eq(&self, other: &Self) -> bool {
		self.to_normalized_map() == other.to_normalized_map()
	}
}

fn extend_with<T: Serialize>(map: &mut Map<String, Value>, fields: &T) {
	// Plain structs of strings and numbers always serialize to an object.
	if let Ok(Value::Object(fields)) = serde_json::to_value(fields) {
		map.extend(fields);
	}
}

/// Builder for [`Event`]. Validation runs in [`EventBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
	user_id: Option<UserIdentifier>,
	device_id: Option<String>,
	event_type: Option<String>,
	time: Option<DateTime<Utc>>,
	event_properties: Properties,
	user_properties: Properties,
	groups: Option<Properties>,
	context: EventContext,
	revenue: Revenue,
	formatters: Formatters,
}

macro_rules! context_setters {
	($($(#[$meta:meta])* $field:ident),* $(,)?) => {
		$(
			$(#[$meta])*
			pub fn $field(mut self, value: impl Into<String>) -> Self {
				self.context.$field = Some(value.into());
				self
			}
		)*
	};
}

impl EventBuilder {
	/// Sets the user id. Passing `None` records the no-account sentinel.
	pub fn user_id(mut self, user_id: impl Into<UserIdentifier>) -> Self {
		self.user_id = Some(user_id.into());
		self
	}

	/// Sets the user id from anything that carries an account id.
	pub fn user<A>(mut self, account: &A) -> Self
	where
		A: AccountIdentity + ?Sized,
	{
		self.user_id = Some(UserIdentifier::from_account(account));
		self
	}

	pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
		self.device_id = Some(device_id.into());
		self
	}

	pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
		self.event_type = Some(event_type.into());
		self
	}

	pub fn time(mut self, time: DateTime<Utc>) -> Self {
		self.time = Some(time);
		self
	}

	pub fn event_properties(mut self, properties: impl Into<Properties>) -> Self {
		self.event_properties = properties.into();
		self
	}

	pub fn user_properties(mut self, properties: impl Into<Properties>) -> Self {
		self.user_properties = properties.into();
		self
	}

	pub fn groups(mut self, groups: impl Into<Properties>) -> Self {
		self.groups = Some(groups.into());
		self
	}

	context_setters! {
		app_version,
		platform,
		os_name,
		os_version,
		device_brand,
		device_manufacturer,
		device_model,
		carrier,
		country,
		region,
		city,
		/// Designated market area.
		dma,
		language,
		ip,
		/// iOS advertising id.
		idfa,
		/// Android advertising id.
		adid,
		/// Deduplication key; the provider drops repeats within a window.
		insert_id,
	}

	pub fn location(mut self, lat: f64, lng: f64) -> Self {
		self.context.location_lat = Some(lat);
		self.context.location_lng = Some(lng);
		self
	}

	pub fn session_id(mut self, session_id: i64) -> Self {
		self.context.session_id = Some(session_id);
		self
	}

	/// Sets `insert_id` to a fresh time-ordered UUIDv7.
	pub fn generate_insert_id(mut self) -> Self {
		let id = Uuid::from_bytes(*uuid7::uuid7().as_bytes());
		self.context.insert_id = Some(id.to_string());
		self
	}

	pub fn price(mut self, price: f64) -> Self {
		self.revenue.price = Some(price);
		self
	}

	pub fn quantity(mut self, quantity: i64) -> Self {
		self.revenue.quantity = Some(quantity);
		self
	}

	pub fn revenue(mut self, revenue: f64) -> Self {
		self.revenue.revenue = Some(revenue);
		self
	}

	pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
		self.revenue.product_id = Some(product_id.into());
		self
	}

	pub fn revenue_type(mut self, revenue_type: impl Into<String>) -> Self {
		self.revenue.revenue_type = Some(revenue_type.into());
		self
	}

	/// Formatters used when the event is normalized.
	pub fn formatters(mut self, formatters: Formatters) -> Self {
		self.formatters = formatters;
		self
	}

	/// Validates the fields and builds the event.
	///
	/// # Errors
	///
	/// - [`ValidationError::MissingIdentifier`] without user_id and device_id
	/// - [`ValidationError::MissingEventType`] without a non-empty event type
	/// - [`ValidationError::ReservedEventType`] for a reserved event type
	/// - [`ValidationError::InvalidPrice`] for a NaN or infinite price
	/// - [`ValidationError::PriceRequired`] for product_id or revenue_type
	///   without a price
	pub fn build(self) -> Result<Event> {
		if self.user_id.is_none() && self.device_id.is_none() {
			return Err(ValidationError::MissingIdentifier);
		}

		let event_type = match self.event_type {
			Some(event_type) if !event_type.is_empty() => event_type,
			_ => return Err(ValidationError::MissingEventType),
		};
		if is_reserved_event_type(&event_type) {
			return Err(ValidationError::ReservedEventType(event_type));
		}

		let mut revenue = self.revenue;
		revenue.validate()?;
		if revenue.price.is_some() && revenue.quantity.is_none() {
			revenue.quantity = Some(1);
		}

		Ok(Event {
			user_id: self.user_id,
			device_id: self.device_id,
			event_type,
			time: self.time,
			event_properties: self.event_properties,
			user_properties: self.user_properties,
			groups: self.groups,
			context: self.context,
			revenue,
			formatters: self.formatters,
		})
	}
}
