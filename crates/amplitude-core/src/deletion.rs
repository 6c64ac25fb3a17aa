// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User deletion requests.

use crate::error::Result;

/// A request to delete users, by user id and/or provider-assigned id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionRequest {
	pub user_ids: Option<Vec<String>>,
	pub amplitude_ids: Option<Vec<i64>>,
	pub requester: Option<String>,
}

impl DeletionRequest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn user_ids<I, S>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.user_ids = Some(ids.into_iter().map(Into::into).collect());
		self
	}

	pub fn amplitude_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
		self.amplitude_ids = Some(ids.into_iter().collect());
		self
	}

	/// Email or name recorded as the person who asked for the deletion.
	pub fn requester(mut self, requester: impl Into<String>) -> Self {
		self.requester = Some(requester.into());
		self
	}

	pub fn is_empty(&self) -> bool {
		self.user_ids.is_none() && self.amplitude_ids.is_none() && self.requester.is_none()
	}

	/// Form fields for the set attributes only. Id lists are sent as JSON
	/// arrays.
	pub fn to_form_pairs(&self) -> Result<Vec<(&'static str, String)>> {
		let mut pairs = Vec::new();
		if let Some(amplitude_ids) = &self.amplitude_ids {
			pairs.push(("amplitude_ids", serde_json::to_string(amplitude_ids)?));
		}
		if let Some(user_ids) = &self.user_ids {
			pairs.push(("user_ids", serde_json::to_string(user_ids)?));
		}
		if let Some(requester) = &self.requester {
			pairs.push(("requester", requester.clone()));
		}
		Ok(pairs)
	}
}
