// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User identifier resolution.
//!
//! A user id is either a plain string or something that *has* an id, such as
//! an account record in the host application. Both resolve to a
//! [`UserIdentifier`] when the record is built.

use std::fmt;

/// Wire value sent when a user id was explicitly cleared.
pub const NO_ACCOUNT_USER_ID: &str = "user who doesn't have an account";

/// Anything that can provide an account id for the `user_id` field.
///
/// # Example
///
/// ```
/// use amplitude_core::{AccountIdentity, UserIdentifier};
///
/// struct Account { id: u64 }
///
/// impl AccountIdentity for Account {
///     fn account_id(&self) -> Option<String> {
///         Some(self.id.to_string())
///     }
/// }
///
/// let id = UserIdentifier::from_account(&Account { id: 42 });
/// assert_eq!(id.as_str(), "42");
/// ```
pub trait AccountIdentity {
	fn account_id(&self) -> Option<String>;
}

/// A resolved user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserIdentifier {
	Id(String),
	/// The user id was assigned, but resolved to nothing.
	NoAccount,
}

impl UserIdentifier {
	/// Resolves an account to its id, or [`UserIdentifier::NoAccount`] when it
	/// has none.
	pub fn from_account<A>(account: &A) -> Self
	where
		A: AccountIdentity + ?Sized,
	{
		account.account_id().into()
	}

	pub fn as_str(&self) -> &str {
		match self {
			UserIdentifier::Id(id) => id,
			UserIdentifier::NoAccount => NO_ACCOUNT_USER_ID,
		}
	}

	pub fn is_no_account(&self) -> bool {
		matches!(self, UserIdentifier::NoAccount)
	}
}

impl fmt::Display for UserIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<String> for UserIdentifier {
	fn from(id: String) -> Self {
		UserIdentifier::Id(id)
	}
}

impl From<&str> for UserIdentifier {
	fn from(id: &str) -> Self {
		UserIdentifier::Id(id.to_string())
	}
}

impl From<&String> for UserIdentifier {
	fn from(id: &String) -> Self {
		UserIdentifier::Id(id.clone())
	}
}

impl From<Option<String>> for UserIdentifier {
	fn from(id: Option<String>) -> Self {
		id.map_or(UserIdentifier::NoAccount, UserIdentifier::Id)
	}
}

impl From<Option<&str>> for UserIdentifier {
	fn from(id: Option<&str>) -> Self {
		id.map(str::to_string).into()
	}
}
