//
//  cdek-client
//  tests/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

use std::sync::Arc;
use std::time::Duration;

use cdek_client::api::{ApiError, CdekClient, QueueSink};
use cdek_client::auth::{AccessToken, Credentials};
use cdek_client::cache::{CacheStore, FileCache, MemoryCache};
use mockito::{Matcher, Server, ServerGuard};
use reqwest::Method;
use serde_json::{json, Value};

const TOKEN_BODY: &str = r#"{"access_token":"t","token_type":"bearer","expires_in":3600}"#;

fn client_for(server: &ServerGuard) -> CdekClient {
    CdekClient::new(Credentials::new("account", "secret", true))
        .unwrap()
        .with_base_url(&server.url())
        .unwrap()
}

async fn token_mock(server: &mut ServerGuard, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/oauth/token")
        .match_body(Matcher::Regex("grant_type=client_credentials".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn token_is_requested_once_for_many_calls() {
    let mut server = Server::new_async().await;
    let token = token_mock(&mut server, 1).await;
    let regions = server
        .mock("GET", "/location/regions")
        .match_query(Matcher::UrlEncoded("size".into(), "1".into()))
        .match_header("authorization", "Bearer t")
        .with_status(200)
        .with_body(r#"[{"region_code": 1, "region": "Moscow"}]"#)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    for _ in 0..2 {
        let body = client
            .send("/location/regions", Some(&json!({"size": 1})), Method::GET)
            .await
            .unwrap();
        assert_eq!(body[0]["region"], "Moscow");
    }

    token.assert_async().await;
    regions.assert_async().await;
}

#[tokio::test]
async fn empty_params_are_not_sent() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server, 1).await;
    let cities = server
        .mock("GET", "/location/cities")
        .match_query(Matcher::Exact("country_codes=RU&size=0".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    let params = json!({"country_codes": ["RU"], "size": 0, "city": "", "region_code": null});
    let body = client
        .send("/location/cities", Some(&params), Method::GET)
        .await
        .unwrap();

    assert_eq!(body, json!([]));
    cities.assert_async().await;
}

#[tokio::test]
async fn client_error_message_is_extracted() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server, 1).await;
    let _orders = server
        .mock("POST", "/orders")
        .with_status(400)
        .with_body(r#"{"requests":[{"errors":[{"code":"v2_field_is_empty","message":"Field tariff_code is empty"}]}]}"#)
        .create_async()
        .await;

    let sink = Arc::new(QueueSink::new());
    let client = client_for(&server).with_error_sink(sink.clone());

    let err = client
        .send("/orders", Some(&json!({"number": "A-1"})), Method::POST)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "400");
    assert_eq!(err.error_message(), "v2_field_is_empty: Field tariff_code is empty");

    let reported = sink.drain();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].contains("Field tariff_code is empty"));
}

#[tokio::test]
async fn server_error_hides_body() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server, 1).await;
    let _failing = server
        .mock("GET", "/deliverypoints")
        .with_status(502)
        .with_body("<html>upstream exploded</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .send("/deliverypoints", None, Method::GET)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 502 }));
    assert!(!err.error_message().contains("upstream"));
}

#[tokio::test]
async fn failed_authorization_is_reported_once() {
    let mut server = Server::new_async().await;
    let _token = server
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_client","error_description":"Bad credentials"}"#)
        .create_async()
        .await;
    let regions = server
        .mock("GET", "/location/regions")
        .expect(0)
        .create_async()
        .await;

    let sink = Arc::new(QueueSink::new());
    let client = client_for(&server).with_error_sink(sink.clone());
    let err = client
        .send("/location/regions", None, Method::GET)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "401");
    assert_eq!(err.error_message(), "invalid_client: Bad credentials");
    assert_eq!(sink.drain().len(), 1);
    regions.assert_async().await;
}

#[tokio::test]
async fn validation_errors_are_not_reported() {
    let sink = Arc::new(QueueSink::new());
    let client = CdekClient::new(Credentials::new("", "", true))
        .unwrap()
        .with_error_sink(sink.clone());

    let err = client.authorize().await.unwrap_err();
    assert_eq!(err.error_code(), "500");
    assert!(sink.drain().is_empty());
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server, 1).await;
    let _delete = server
        .mock("DELETE", "/webhooks/abc")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = client_for(&server);
    let body = client
        .send("/webhooks/abc", None, Method::DELETE)
        .await
        .unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn file_cache_shares_token_between_clients() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = Server::new_async().await;
    let token = token_mock(&mut server, 1).await;
    let _payment = server
        .mock("GET", "/payment")
        .match_query(Matcher::UrlEncoded("date".into(), "2026-10-01".into()))
        .with_status(200)
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;

    for _ in 0..2 {
        let client = client_for(&server).with_cache(Arc::new(FileCache::new(dir.path())));
        client
            .send("/payment", Some(&json!({"date": "2026-10-01"})), Method::GET)
            .await
            .unwrap();
    }

    token.assert_async().await;
}

#[tokio::test]
async fn expired_cached_token_is_replaced_once() {
    let mut server = Server::new_async().await;
    let token = token_mock(&mut server, 1).await;
    let regions = server
        .mock("GET", "/location/regions")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer t")
        .with_status(200)
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;

    let credentials = Credentials::new("account", "secret", true);
    let key = credentials.token_cache_key();
    let stale = AccessToken {
        access_token: "old".to_string(),
        token_type: "bearer".to_string(),
        expires_at: chrono::Utc::now() - chrono::Duration::minutes(1),
    };
    let cache = Arc::new(MemoryCache::new());
    cache
        .set(&key, &serde_json::to_string(&stale).unwrap(), Some(Duration::from_secs(3600)))
        .unwrap();

    let client = CdekClient::new(credentials)
        .unwrap()
        .with_base_url(&server.url())
        .unwrap()
        .with_cache(cache.clone());
    for _ in 0..2 {
        client
            .send("/location/regions", None, Method::GET)
            .await
            .unwrap();
    }

    token.assert_async().await;
    regions.assert_async().await;
    let cached: AccessToken = serde_json::from_str(&cache.get(&key).unwrap()).unwrap();
    assert_eq!(cached.access_token, "t");
}

#[tokio::test]
async fn forget_token_forces_new_authorization() {
    let mut server = Server::new_async().await;
    let token = token_mock(&mut server, 2).await;

    let client = client_for(&server);
    client.access_token().await.unwrap();
    client.forget_token();
    client.access_token().await.unwrap();

    token.assert_async().await;
}
