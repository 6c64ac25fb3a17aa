// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Key/value maps for event properties, user properties and groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered JSON object used for event properties, user properties and
/// groups.
///
/// # Example
///
/// ```
/// use amplitude_core::Properties;
///
/// let props = Properties::new()
///     .insert("plan", "pro")
///     .insert("seats", 12)
///     .insert("trial", false);
/// assert_eq!(props.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
	inner: Map<String, Value>,
}

impl Properties {
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Inserts a key-value pair (builder pattern).
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Inserts a key-value pair in place.
	pub fn set<K, V>(&mut self, key: K, value: V)
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
	}

	/// Merges `other` into this map. Keys in `other` win.
	pub fn merge(mut self, other: Properties) -> Self {
		self.inner.extend(other.inner);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.inner
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.inner
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.inner)
	}
}

impl From<Properties> for Value {
	fn from(props: Properties) -> Self {
		props.into_value()
	}
}

/// Non-object values become an empty map.
impl From<Value> for Properties {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(inner) => Self { inner },
			_ => Self::new(),
		}
	}
}

impl From<Map<String, Value>> for Properties {
	fn from(inner: Map<String, Value>) -> Self {
		Self { inner }
	}
}

impl<K, V> FromIterator<(K, V)> for Properties
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			inner: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn new_is_empty() {
		let props = Properties::new();
		assert!(props.is_empty());
		assert_eq!(props.into_value(), serde_json::json!({}));
	}

	#[test]
	fn merge_prefers_other() {
		let merged = Properties::new()
			.insert("a", 1)
			.insert("b", 2)
			.merge(Properties::new().insert("b", 20).insert("c", 3));

		assert_eq!(merged.len(), 3);
		assert_eq!(merged.get("b"), Some(&Value::from(20)));
	}

	#[test]
	fn set_mutates_in_place() {
		let mut props = Properties::new();
		props.set("color", "red");
		props.set("color", "blue");
		assert_eq!(props.get("color"), Some(&Value::from("blue")));
	}

	#[test]
	fn non_object_value_becomes_empty() {
		assert!(Properties::from(Value::from("nope")).is_empty());
		assert!(Properties::from(Value::Null).is_empty());
	}

	#[test]
	fn serializes_as_plain_object() {
		let props = Properties::new().insert("k", "v");
		assert_eq!(serde_json::to_string(&props).unwrap(), r#"{"k":"v"}"#);
	}

	#[test]
	fn collects_from_pairs() {
		let props: Properties = vec![("a", 1), ("b", 2)].into_iter().collect();
		assert_eq!(props.len(), 2);
	}

	proptest! {
		#[test]
		fn len_matches_unique_keys(keys in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
			let unique: std::collections::HashSet<_> = keys.iter().cloned().collect();
			let props = keys.iter().fold(Properties::new(), |p, k| p.insert(k.clone(), true));
			prop_assert_eq!(props.len(), unique.len());
		}
	}
}
