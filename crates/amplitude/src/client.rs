// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the track, identify, segmentation and deletion endpoints.

use std::time::Duration;

use amplitude_core::{
	DeletionRequest, Event, EventBuilder, EventDefinition, Identification, IdentificationBuilder,
	Properties, SegmentationOptions, SegmentationQuery,
};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::body::{identify_body, track_body};
use crate::config::Config;
use crate::error::{AmplitudeError, Result};
use crate::secret::SecretString;

/// Track endpoint.
pub const TRACK_URL: &str = "https://api.amplitude.com/httpapi";
/// Dedicated identify endpoint. Not used unless set on [`Endpoints`].
pub const IDENTIFY_URL: &str = "https://api.amplitude.com/identify";
/// Event segmentation endpoint.
pub const SEGMENTATION_URL: &str = "https://amplitude.com/api/2/events/segmentation";
/// User deletion endpoint.
pub const DELETION_URL: &str = "https://amplitude.com/api/2/deletions/users";

/// Target URLs for each operation.
///
/// Identify requests go to the track URL by default. Point `identify` at
/// [`IDENTIFY_URL`] to use the dedicated endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
	pub track: String,
	pub identify: String,
	pub segmentation: String,
	pub deletion: String,
}

impl Endpoints {
	/// The provider paths rooted at `base_url`, e.g. a proxy or a mock server.
	pub fn under(base_url: &str) -> Self {
		let base = base_url.trim_end_matches('/');
		Self {
			track: format!("{base}/httpapi"),
			identify: format!("{base}/httpapi"),
			segmentation: format!("{base}/api/2/events/segmentation"),
			deletion: format!("{base}/api/2/deletions/users"),
		}
	}

	pub fn with_identify(mut self, url: impl Into<String>) -> Self {
		self.identify = url.into();
		self
	}
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			track: TRACK_URL.to_string(),
			identify: TRACK_URL.to_string(),
			segmentation: SEGMENTATION_URL.to_string(),
			deletion: DELETION_URL.to_string(),
		}
	}
}

/// Transport settings for the client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
	/// Request timeout; `None` keeps the transport default.
	pub request_timeout: Option<Duration>,
	pub endpoints: Endpoints,
}

/// Builder for constructing an AmplitudeClient.
#[derive(Debug, Default)]
pub struct AmplitudeClientBuilder {
	config: Option<Config>,
	client_config: ClientConfig,
}

impl AmplitudeClientBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets credentials, logging choice and formatters.
	pub fn config(mut self, config: Config) -> Self {
		self.config = Some(config);
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.client_config.request_timeout = Some(timeout);
		self
	}

	pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
		self.client_config.endpoints = endpoints;
		self
	}

	/// Builds the client.
	///
	/// Installs the default console logger unless the config asks for the
	/// host's logger.
	pub fn build(self) -> Result<AmplitudeClient> {
		let config = self.config.ok_or(AmplitudeError::InvalidApiKey)?;
		if config.api_key().is_empty() {
			return Err(AmplitudeError::InvalidApiKey);
		}

		if !config.use_host_logger() {
			crate::logging::init_default();
		}

		let mut http = crate::http::builder();
		if let Some(timeout) = self.client_config.request_timeout {
			http = http.timeout(timeout);
		}
		let http_client = http.build()?;

		let endpoints = self.client_config.endpoints;
		info!(
			track_url = %endpoints.track,
			identify_url = %endpoints.identify,
			"Amplitude client initialized"
		);

		Ok(AmplitudeClient {
			config,
			endpoints,
			http_client,
		})
	}
}

/// Client for the Amplitude HTTP API.
///
/// Every operation sends exactly one request and returns the raw
/// [`Response`]. Status codes are not interpreted and nothing is retried.
///
/// # Example
///
/// ```ignore
/// use amplitude::{AmplitudeClient, Config, Properties};
///
/// let client = AmplitudeClient::builder()
///     .config(Config::from_env()?)
///     .build()?;
///
/// let event = client
///     .event_builder()
///     .user_id("u1")
///     .event_type("checkout")
///     .price(19.99)
///     .product_id("sku-1")
///     .build()?;
///
/// let response = client.track(&[event]).await?;
/// println!("status: {}", response.status());
/// ```
#[derive(Debug)]
pub struct AmplitudeClient {
	config: Config,
	endpoints: Endpoints,
	http_client: Client,
}

impl AmplitudeClient {
	pub fn builder() -> AmplitudeClientBuilder {
		AmplitudeClientBuilder::new()
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn endpoints(&self) -> &Endpoints {
		&self.endpoints
	}

	/// An event builder that uses this client's formatters.
	pub fn event_builder(&self) -> EventBuilder {
		Event::builder().formatters(self.config.formatters().clone())
	}

	/// An identification builder that uses this client's formatters.
	pub fn identification_builder(&self) -> IdentificationBuilder {
		Identification::builder().formatters(self.config.formatters().clone())
	}

	/// Sends events to the track endpoint.
	pub async fn track(&self, events: &[Event]) -> Result<Response> {
		let body = track_body(self.config.api_key().expose(), events)?;

		debug!(
			url = %self.endpoints.track,
			count = events.len(),
			"Sending events"
		);

		let response = self
			.http_client
			.post(&self.endpoints.track)
			.form(&body)
			.send()
			.await?;
		Ok(response)
	}

	/// Builds a single event and tracks it.
	///
	/// A `None` user is sent as the no-account sentinel.
	pub async fn send_event(
		&self,
		event_type: &str,
		user: Option<&str>,
		device: Option<&str>,
		properties: Option<Properties>,
	) -> Result<Response> {
		let mut builder = self
			.event_builder()
			.event_type(event_type)
			.user_id(user)
			.event_properties(properties.unwrap_or_default());
		if let Some(device) = device {
			builder = builder.device_id(device);
		}
		let event = builder.build()?;

		self.track(&[event]).await
	}

	/// Sends identifications to the identify URL (the track URL unless
	/// configured otherwise).
	pub async fn identify(&self, identifications: &[Identification]) -> Result<Response> {
		let body = identify_body(self.config.api_key().expose(), identifications)?;

		debug!(
			url = %self.endpoints.identify,
			count = identifications.len(),
			"Sending identifications"
		);

		let response = self
			.http_client
			.post(&self.endpoints.identify)
			.form(&body)
			.send()
			.await?;
		Ok(response)
	}

	/// Builds a single identification and sends it.
	///
	/// A `None` user is sent as the no-account sentinel.
	pub async fn send_identify(
		&self,
		user: Option<&str>,
		device: Option<&str>,
		properties: Option<Properties>,
	) -> Result<Response> {
		let mut builder = self
			.identification_builder()
			.user_id(user)
			.user_properties(properties.unwrap_or_default());
		if let Some(device) = device {
			builder = builder.device_id(device);
		}
		let identification = builder.build()?;

		self.identify(&[identification]).await
	}

	/// Runs an event segmentation query over `[start, end]`.
	pub async fn segmentation(
		&self,
		event: &EventDefinition,
		start: NaiveDate,
		end: NaiveDate,
		options: &SegmentationOptions,
	) -> Result<Response> {
		let query = SegmentationQuery::new(event, start, end, options).to_pairs()?;

		debug!(
			url = %self.endpoints.segmentation,
			event_type = %event.event_type,
			"Querying segmentation"
		);

		let response = self
			.http_client
			.get(&self.endpoints.segmentation)
			.basic_auth(self.config.api_key().expose(), self.secret_key())
			.query(&query)
			.send()
			.await?;
		Ok(response)
	}

	/// Requests deletion of the given users.
	pub async fn delete(&self, request: &DeletionRequest) -> Result<Response> {
		let form = request.to_form_pairs()?;

		debug!(
			url = %self.endpoints.deletion,
			user_ids = request.user_ids.as_ref().map_or(0, Vec::len),
			amplitude_ids = request.amplitude_ids.as_ref().map_or(0, Vec::len),
			"Requesting user deletion"
		);

		let response = self
			.http_client
			.post(&self.endpoints.deletion)
			.basic_auth(self.config.api_key().expose(), self.secret_key())
			.form(&form)
			.send()
			.await?;
		Ok(response)
	}

	fn secret_key(&self) -> Option<&str> {
		self.config.secret_key().map(SecretString::expose)
	}
}


#[cfg(test)]
mod http_tests {
	use super::*;
	use amplitude_core::{AggregateMetric, Interval, SegmentDefinition, NO_ACCOUNT_USER_ID};
	use serde_json::{json, Value};
	use wiremock::matchers::{
		basic_auth, body_string_contains, method, path, query_param, query_param_is_missing,
	};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> AmplitudeClient {
		AmplitudeClient::builder()
			.config(
				Config::new("test-key")
					.with_secret_key("test-secret")
					.with_host_logger(true),
			)
			.endpoints(Endpoints::under(&server.uri()))
			.build()
			.unwrap()
	}

	async fn form_fields(server: &MockServer) -> Vec<(String, String)> {
		let requests = server.received_requests().await.unwrap();
		assert_eq!(requests.len(), 1);
		serde_urlencoded::from_bytes(&requests[0].body).unwrap()
	}

	fn field<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
		fields
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	#[tokio::test]
	async fn track_posts_form_with_event_array() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/httpapi"))
			.and(body_string_contains("api_key=test-key"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client = client_for(&server);
		let events = vec![
			client
				.event_builder()
				.user_id("u1")
				.event_type("login")
				.build()
				.unwrap(),
			client
				.event_builder()
				.device_id("d1")
				.event_type("purchase")
				.price(9.99)
				.build()
				.unwrap(),
		];

		let response = client.track(&events).await.unwrap();
		assert_eq!(response.status(), 200);

		let fields = form_fields(&server).await;
		assert_eq!(field(&fields, "api_key"), Some("test-key"));
		let sent: Vec<Value> = serde_json::from_str(field(&fields, "event").unwrap()).unwrap();
		assert_eq!(sent.len(), 2);
		assert_eq!(sent[1]["quantity"], json!(1));
	}

	#[tokio::test]
	async fn error_statuses_are_returned_not_raised() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/httpapi"))
			.respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
			.mount(&server)
			.await;

		let client = client_for(&server);
		let response = client
			.send_event("login", Some("u1"), None, None)
			.await
			.unwrap();
		assert_eq!(response.status(), 429);
		assert_eq!(response.text().await.unwrap(), "slow down");
	}

	#[tokio::test]
	async fn send_event_without_user_uses_sentinel() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/httpapi"))
			.respond_with(ResponseTemplate::new(200))
			.mount(&server)
			.await;

		let client = client_for(&server);
		client
			.send_event(
				"signup",
				None,
				Some("d1"),
				Some(Properties::new().insert("source", "ad")),
			)
			.await
			.unwrap();

		let fields = form_fields(&server).await;
		let sent: Value = serde_json::from_str(field(&fields, "event").unwrap()).unwrap();
		assert_eq!(sent[0]["user_id"], json!(NO_ACCOUNT_USER_ID));
		assert_eq!(sent[0]["device_id"], json!("d1"));
		assert_eq!(sent[0]["event_properties"], json!({"source": "ad"}));
	}

	#[tokio::test]
	async fn send_event_rejects_reserved_type_before_sending() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let client = client_for(&server);
		let err = client
			.send_event("[Amplitude] Start Session", Some("u1"), None, None)
			.await
			.unwrap_err();
		assert!(matches!(err, AmplitudeError::Validation(_)));
	}

	#[tokio::test]
	async fn identify_posts_to_track_url_by_default() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/httpapi"))
			.and(body_string_contains("identification="))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client = client_for(&server);
		client
			.send_identify(
				Some("u1"),
				None,
				Some(Properties::new().insert("plan", "pro")),
			)
			.await
			.unwrap();

		let fields = form_fields(&server).await;
		let sent: Value =
			serde_json::from_str(field(&fields, "identification").unwrap()).unwrap();
		assert_eq!(
			sent,
			json!([{"user_properties": {"plan": "pro"}, "user_id": "u1"}])
		);
	}

	#[tokio::test]
	async fn identify_can_target_dedicated_endpoint() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/identify"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client = AmplitudeClient::builder()
			.config(Config::new("test-key").with_host_logger(true))
			.endpoints(
				Endpoints::under(&server.uri()).with_identify(format!("{}/identify", server.uri())),
			)
			.build()
			.unwrap();

		let identification = client
			.identification_builder()
			.device_id("d1")
			.build()
			.unwrap();
		let response = client.identify(&[identification]).await.unwrap();
		assert_eq!(response.status(), 200);
	}

	#[tokio::test]
	async fn segmentation_sends_query_with_basic_auth() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/api/2/events/segmentation"))
			.and(basic_auth("test-key", "test-secret"))
			.and(query_param("e", r#"{"event_type":"login"}"#))
			.and(query_param("m", "uniques"))
			.and(query_param("start", "20230115"))
			.and(query_param("end", "20230131"))
			.and(query_param("i", "1"))
			.and(query_param("s", r#"[{"prop":"country","op":"is","values":["NZ"]}]"#))
			.and(query_param("limit", "50"))
			.and(query_param_is_missing("g"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
			.expect(1)
			.mount(&server)
			.await;

		let client = client_for(&server);
		let options = SegmentationOptions::new()
			.metric(AggregateMetric::Uniques)
			.interval(Interval::Daily)
			.segment(SegmentDefinition::is("country", vec!["NZ".to_string()]))
			.limit(50);

		let response = client
			.segmentation(
				&EventDefinition::new("login"),
				NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
				NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
				&options,
			)
			.await
			.unwrap();
		assert_eq!(response.status(), 200);
	}

	#[tokio::test]
	async fn segmentation_omits_segments_when_none() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/api/2/events/segmentation"))
			.and(query_param_is_missing("s"))
			.and(query_param_is_missing("m"))
			.and(query_param_is_missing("limit"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client = client_for(&server);
		client
			.segmentation(
				&EventDefinition::new("login"),
				NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
				NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
				&SegmentationOptions::new(),
			)
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn segmentation_rejects_bad_limit_without_sending() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200))
			.expect(0)
			.mount(&server)
			.await;

		let client = client_for(&server);
		let err = client
			.segmentation(
				&EventDefinition::new("login"),
				NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
				NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
				&SegmentationOptions::new().limit(5000),
			)
			.await
			.unwrap_err();
		assert!(matches!(err, AmplitudeError::Validation(_)));
	}

	#[tokio::test]
	async fn delete_sends_only_set_fields() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/2/deletions/users"))
			.and(basic_auth("test-key", "test-secret"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let client = client_for(&server);
		client
			.delete(
				&DeletionRequest::new()
					.user_ids(["u1", "u2"])
					.requester("privacy@example.com"),
			)
			.await
			.unwrap();

		let fields = form_fields(&server).await;
		assert_eq!(field(&fields, "user_ids"), Some(r#"["u1","u2"]"#));
		assert_eq!(field(&fields, "requester"), Some("privacy@example.com"));
		assert_eq!(field(&fields, "amplitude_ids"), None);
	}

	#[tokio::test]
	async fn transport_errors_propagate() {
		// Reserve a port, then free it so nothing is listening there.
		let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);
		let endpoints = Endpoints::under(&format!("http://{addr}"));

		let client = AmplitudeClient::builder()
			.config(config_without_secret())
			.endpoints(endpoints)
			.build()
			.unwrap();

		let err = client
			.send_event("login", Some("u1"), None, None)
			.await
			.unwrap_err();
		assert!(matches!(err, AmplitudeError::RequestFailed(_)));
	}

	fn config_without_secret() -> Config {
		Config::new("test-key").with_host_logger(true)
	}
}
