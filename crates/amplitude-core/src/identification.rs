// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identification records: user property updates sent without an event.

use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::formatters::Formatters;
use crate::identifier::{AccountIdentity, UserIdentifier};
use crate::properties::Properties;

/// An update to a user's properties.
///
/// # Example
///
/// ```
/// use amplitude_core::{Identification, Properties};
///
/// let identification = Identification::builder()
///     .user_id("u1")
///     .user_properties(Properties::new().insert("plan", "pro"))
///     .build()?;
///
/// let map = identification.to_normalized_map();
/// assert_eq!(map["user_properties"]["plan"], "pro");
/// # Ok::<(), amplitude_core::ValidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Identification {
	user_id: Option<UserIdentifier>,
	device_id: Option<String>,
	user_properties: Properties,
	groups: Option<Properties>,
	formatters: Formatters,
}

impl Identification {
	pub fn builder() -> IdentificationBuilder {
		IdentificationBuilder::default()
	}

	pub fn user_id(&self) -> Option<&UserIdentifier> {
		self.user_id.as_ref()
	}

	pub fn device_id(&self) -> Option<&str> {
		self.device_id.as_deref()
	}

	pub fn user_properties(&self) -> &Properties {
		&self.user_properties
	}

	pub fn groups(&self) -> Option<&Properties> {
		self.groups.as_ref()
	}

	/// Sets one user property. The record is not re-validated.
	pub fn set_user_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.user_properties.set(key, value);
	}

	/// Builds the wire object for the `identification` form field.
	pub fn to_normalized_map(&self) -> Map<String, Value> {
		let mut map = Map::new();
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
		if let Some(groups) = &self.groups {
			map.insert("groups".to_string(), groups.clone().into_value());
		}
		map.retain(|_, value| !value.is_null());
		map
	}
}

impl PartialEq for Identification {
	fn eq(&self, other: &Self) -> bool {
		self.to_normalized_map() == other.to_normalized_map()
	}
}

#[derive(Debug, Clone, Default)]
pub struct IdentificationBuilder {
	user_id: Option<UserIdentifier>,
	device_id: Option<String>,
	user_properties: Properties,
	groups: Option<Properties>,
	formatters: Formatters,
}

impl IdentificationBuilder {
	/// Sets the user id. Passing `None` records the no-account sentinel.
	pub fn user_id(mut self, user_id: impl Into<UserIdentifier>) -> Self {
		self.user_id = Some(user_id.into());
		self
	}

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

	pub fn user_properties(mut self, properties: impl Into<Properties>) -> Self {
		self.user_properties = properties.into();
		self
	}

	pub fn groups(mut self, groups: impl Into<Properties>) -> Self {
		self.groups = Some(groups.into());
		self
	}

	pub fn formatters(mut self, formatters: Formatters) -> Self {
		self.formatters = formatters;
		self
	}

	/// # Errors
	///
	/// [`ValidationError::MissingIdentifier`] when neither user_id nor
	/// device_id is set.
	pub fn build(self) -> Result<Identification> {
		if self.user_id.is_none() && self.device_id.is_none() {
			return Err(ValidationError::MissingIdentifier);
		}

		Ok(Identification {
			user_id: self.user_id,
			device_id: self.device_id,
			user_properties: self.user_properties,
			groups: self.groups,
			formatters: self.formatters,
		})
	}
}
