#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::{Arc, Mutex};
// crates.io
use httpmock::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Duration;
// self
use common::scripted;
use feign::{
	cache::TokenCache,
	client::RestClient,
	error::{CodecError, Error, StatusError, TransportError},
	http::{AuthorizableRequest, RequestSender, ReqwestSender, SendFuture},
	reqwest::{Request, Response},
	transport::AuthTransport,
};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Widget {
	id: u32,
	name: String,
}

/// Records the `Authorization` header of every request before handing it to reqwest.
#[derive(Clone, Default)]
struct RecordingSender {
	inner: ReqwestSender,
	seen: Arc<Mutex<Vec<Option<String>>>>,
}
impl RecordingSender {
	fn seen(&self) -> Vec<Option<String>> {
		self.seen.lock().expect("Recorder mutex should not be poisoned.").clone()
	}
}
impl RequestSender for RecordingSender {
	type Error = feign::reqwest::Error;
	type Request = Request;
	type Response = Response;

	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		self.seen
			.lock()
			.expect("Recorder mutex should not be poisoned.")
			.push(request.authorization().map(str::to_owned));

		self.inner.send(request)
	}
}

fn token_cache(value: &'static str) -> Arc<TokenCache> {
	let (source, _) = scripted([Some((value, 3600))]);

	Arc::new(TokenCache::new(source))
}

#[tokio::test]
async fn crud_helpers_round_trip_json_with_bearer_token() {
	let server = MockServer::start_async().await;
	let get_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/widgets/7").header("authorization", "Bearer tok-A");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "id": 7, "name": "gear" }));
		})
		.await;
	let post_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/widgets")
				.header("authorization", "Bearer tok-A")
				.header("content-type", "application/json")
				.json_body(json!({ "id": 8, "name": "cog" }));
			then.status(201).json_body(json!({ "id": 8, "name": "cog" }));
		})
		.await;
	let put_mock = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/widgets/8")
				.header("authorization", "Bearer tok-A")
				.json_body(json!({ "id": 8, "name": "sprocket" }));
			then.status(200).json_body(json!({ "id": 8, "name": "sprocket" }));
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/widgets/8").header("authorization", "Bearer tok-A");
			then.status(204);
		})
		.await;
	let client = RestClient::with_token(server.url("/api"), token_cache("tok-A"))
		.expect("Authenticated client should build.");
	let fetched: Widget = client.get("/widgets/7").await.expect("GET should decode the widget.");

	assert_eq!(fetched, Widget { id: 7, name: "gear".into() });

	let created: Widget = client
		.post("/widgets", &Widget { id: 8, name: "cog".into() })
		.await
		.expect("POST should decode the created widget.");

	assert_eq!(created.name, "cog");

	let updated: Widget = client
		.put("widgets/8", &json!({ "id": 8, "name": "sprocket" }))
		.await
		.expect("PUT should decode the updated widget.");

	assert_eq!(updated.name, "sprocket");

	client.delete::<()>("/widgets/8").await.expect("DELETE with an empty body should succeed.");

	get_mock.assert_async().await;
	post_mock.assert_async().await;
	put_mock.assert_async().await;
	delete_mock.assert_async().await;
}

#[tokio::test]
async fn unauthenticated_client_sends_no_authorization() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/health");
			then.status(200).json_body(json!({ "ok": true }));
		})
		.await;
	let recorder = RecordingSender::default();
	let client = RestClient::builder(server.url(""))
		.build_with_sender(recorder.clone())
		.expect("Client with a custom sender should build.");
	let body: serde_json::Value = client.get("/health").await.expect("Health check should decode.");

	assert_eq!(body, json!({ "ok": true }));
	assert_eq!(recorder.seen(), vec![None]);

	mock.assert_async().await;
}

#[tokio::test]
async fn failed_token_fetch_still_sends_request_without_credentials() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/secure");
			then.status(401).body("missing credentials");
		})
		.await;
	let (source, calls) = scripted([None]);
	let recorder = RecordingSender::default();
	let transport = AuthTransport::with_sender(Arc::new(TokenCache::new(source)), recorder.clone());
	let client = RestClient::builder(server.url(""))
		.build_with_sender(transport)
		.expect("Client with an authenticating sender should build.");
	let err = client
		.get::<serde_json::Value>("/secure")
		.await
		.expect_err("Server rejection should surface as a status error.");

	match err {
		Error::Status(StatusError { status, body }) => {
			assert_eq!(status, 401);
			assert_eq!(body, "missing credentials");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(recorder.seen(), vec![None]);
	assert_eq!(calls.get(), 1);

	mock.assert_async().await;
}

#[tokio::test]
async fn malformed_json_reports_decode_path() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/widgets/1");
			then.status(200).body(r#"{"id":"one","name":"gear"}"#);
		})
		.await;

	let client = RestClient::new(server.url("")).expect("Plain client should build.");
	let err =
		client.get::<Widget>("/widgets/1").await.expect_err("Mistyped id should fail to decode.");

	match err {
		Error::Codec(CodecError::Decode { source, status }) => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "id");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn timeouts_surface_as_transport_errors() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200).delay(std::time::Duration::from_millis(500)).body("{}");
		})
		.await;

	let client = RestClient::builder(server.url(""))
		.timeout(Duration::milliseconds(50))
		.build()
		.expect("Client with a short timeout should build.");
	let err = client
		.get::<serde_json::Value>("/slow")
		.await
		.expect_err("Slow responses should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
}
