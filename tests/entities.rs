//
//  cdek-client
//  tests/entities.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

use cdek_client::actions::run_action;
use cdek_client::api::CdekClient;
use cdek_client::auth::Credentials;
use cdek_client::Cdek;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const TOKEN_BODY: &str = r#"{"access_token":"t","token_type":"bearer","expires_in":3600}"#;

fn cdek_for(server: &ServerGuard) -> Cdek {
    let client = CdekClient::new(Credentials::new("account", "secret", true))
        .unwrap()
        .with_base_url(&server.url())
        .unwrap();
    Cdek::new(client)
}

async fn token_mock(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .create_async()
        .await
}

#[test]
fn invalid_order_sends_nothing() {
    tokio_test::block_on(async {
        let mut server = Server::new_async().await;
        let token = server
            .mock("POST", "/oauth/token")
            .expect(0)
            .create_async()
            .await;
        let orders = server.mock("POST", "/orders").expect(0).create_async().await;

        let cdek = cdek_for(&server);
        let order = json!({
            "tariff_code": 136,
            "recipient": {"name": "Ivan", "phones": [{"number": "+79000000000"}]},
            "packages": [{"number": "1"}],
        });
        let err = cdek.orders().create(&order).await.unwrap_err();

        assert_eq!(err.error_code(), "500");
        assert!(err.error_message().contains("weight"));
        token.assert_async().await;
        orders.assert_async().await;
    });
}

#[test]
fn blank_ids_are_rejected() {
    tokio_test::block_on(async {
        let cdek = Cdek::new(CdekClient::new(Credentials::sandbox()).unwrap());
        assert!(cdek.orders().get("  ").await.is_err());
        assert!(cdek.webhooks().delete("").await.is_err());
        assert!(cdek.print().get_receipt("").await.is_err());
        assert!(cdek.payments().by_date("").await.is_err());
    });
}

#[tokio::test]
async fn delivery_points_are_served_from_cache() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let points = server
        .mock("GET", "/deliverypoints")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("city_code".into(), "44".into()),
            Matcher::UrlEncoded("type".into(), "ALL".into()),
            Matcher::UrlEncoded("lang".into(), "rus".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"code": "MSK1", "type": "PVZ"}]"#)
        .expect(1)
        .create_async()
        .await;

    let cdek = cdek_for(&server);
    let first = cdek
        .delivery_points()
        .list(&json!({"city_code": 44}))
        .await
        .unwrap();
    // Same options spelled with explicit defaults and an empty filter
    let second = cdek
        .delivery_points()
        .list(&json!({"lang": "rus", "city_code": 44, "type": "ALL", "postal_code": ""}))
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0]["code"], "MSK1");
    points.assert_async().await;
}

#[tokio::test]
async fn calculate_action_picks_single_tariff() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let tariff = server
        .mock("POST", "/calculator/tariff")
        .match_body(Matcher::PartialJson(json!({"tariff_code": 136})))
        .with_status(200)
        .with_body(r#"{"delivery_sum": 350.0, "period_min": 2, "period_max": 3, "currency": "RUB"}"#)
        .create_async()
        .await;
    let list = server
        .mock("POST", "/calculator/tarifflist")
        .expect(0)
        .create_async()
        .await;

    let cdek = cdek_for(&server);
    let payload = json!({
        "tariff_code": 136,
        "from_location": {"code": 44},
        "to_location": {"code": 270},
        "packages": [{"weight": 500}],
    });
    let response = run_action(&cdek, "calculate", &payload).await;

    assert_eq!(response["success"], json!(true));
    assert_eq!(response["data"]["currency"], "RUB");
    tariff.assert_async().await;
    list.assert_async().await;
}

#[tokio::test]
async fn unknown_action_is_an_error_envelope() {
    let server = Server::new_async().await;
    let cdek = cdek_for(&server);

    let response = run_action(&cdek, "teleport", &json!({})).await;
    assert_eq!(response["success"], json!(false));
    assert_eq!(response["error_code"], json!("500"));
}

#[tokio::test]
async fn offices_action_wraps_provider_errors() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _points = server
        .mock("GET", "/deliverypoints")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":[{"code":"v2_entity_not_found","message":"City not found"}]}"#)
        .create_async()
        .await;

    let cdek = cdek_for(&server);
    let response = run_action(&cdek, "offices", &json!({"city_code": 999999})).await;

    assert_eq!(response["success"], json!(false));
    assert_eq!(response["error_code"], json!("404"));
    assert_eq!(response["error_message"], json!("v2_entity_not_found: City not found"));
}

#[tokio::test]
async fn postal_codes_query_city() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let codes = server
        .mock("GET", "/location/postalcodes")
        .match_query(Matcher::UrlEncoded("code".into(), "44".into()))
        .with_status(200)
        .with_body(r#"{"code": 44, "postal_codes": ["101000"]}"#)
        .create_async()
        .await;

    let cdek = cdek_for(&server);
    let body = cdek.locations().postal_codes("44").await.unwrap();
    assert_eq!(body["postal_codes"][0], "101000");
    codes.assert_async().await;
}
