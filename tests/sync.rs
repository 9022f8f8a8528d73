//
//  cdek-client
//  tests/sync.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cdek_client::api::CdekClient;
use cdek_client::auth::Credentials;
use async_trait::async_trait;
use cdek_client::store::{Dataset, ReferenceStore, RowPage, SqliteStore, StoreError};
use cdek_client::sync::{SyncJob, SyncOptions};
use cdek_client::Cdek;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};

const TOKEN_BODY: &str = r#"{"access_token":"t","token_type":"bearer","expires_in":3600}"#;

struct Fixture {
    server: ServerGuard,
    // Mocks are removed from the server when dropped
    _token: mockito::Mock,
    cdek: Cdek,
    store: Arc<SqliteStore>,
}

async fn setup() -> Fixture {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(TOKEN_BODY)
        .create_async()
        .await;

    let client = CdekClient::new(Credentials::new("account", "secret", true))
        .unwrap()
        .with_base_url(&server.url())
        .unwrap();
    Fixture {
        server,
        _token: token,
        cdek: Cdek::new(client),
        store: Arc::new(SqliteStore::open_in_memory().unwrap()),
    }
}

fn regions(codes: &[i64]) -> String {
    let records: Vec<Value> = codes
        .iter()
        .map(|code| json!({"region_code": code, "region": format!("Region {code}"), "country_code": "RU"}))
        .collect();
    Value::Array(records).to_string()
}

fn cities(codes: &[i64]) -> String {
    let records: Vec<Value> = codes
        .iter()
        .map(|code| json!({"code": code, "city": format!("City {code}"), "country_code": "RU"}))
        .collect();
    Value::Array(records).to_string()
}

async fn page_mock(server: &mut ServerGuard, path: &str, page: u32, body: String) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn pages_until_short_page_and_replaces_old_rows() {
    let Fixture { mut server, _token, cdek, store } = setup().await;
    let stale = RowPage::from_records(Dataset::Regions, &[json!({"region_code": 99, "region": "Old"})]);
    store.insert_page(stale).await.unwrap();

    let pages = vec![
        page_mock(&mut server, "/location/regions", 0, regions(&[1, 2])).await,
        page_mock(&mut server, "/location/regions", 1, regions(&[3, 4])).await,
        page_mock(&mut server, "/location/regions", 2, regions(&[5])).await,
    ];

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let job = SyncJob::new(cdek, store.clone()).with_progress(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let options = SyncOptions {
        update_cities: false,
        update_delivery_points: false,
        page_size: Some(2),
        ..SyncOptions::default()
    };
    let report = job.run(&options).await;

    for mock in pages {
        mock.assert_async().await;
    }
    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 1);

    let outcome = report.outcome(Dataset::Regions).unwrap();
    assert_eq!(outcome.pages, 3);
    assert_eq!(outcome.rows, 5);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
    assert_eq!(store.count(Dataset::Regions).await.unwrap(), 5);
}

#[tokio::test]
async fn city_failure_skips_delivery_points() {
    let Fixture { mut server, _token, cdek, store } = setup().await;
    let _regions = page_mock(&mut server, "/location/regions", 0, regions(&[1])).await;
    let _cities = page_mock(&mut server, "/location/cities", 0, cities(&[44, 270])).await;
    let _broken = server
        .mock("GET", "/location/cities")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;
    let points = server
        .mock("GET", "/deliverypoints")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let options = SyncOptions {
        page_size: Some(2),
        ..SyncOptions::default()
    };
    let report = SyncJob::new(cdek, store.clone()).run(&options).await;

    assert!(!report.is_success());

    let regions = report.outcome(Dataset::Regions).unwrap();
    assert!(!regions.is_failed());

    let cities = report.outcome(Dataset::Cities).unwrap();
    assert!(cities.is_failed());
    assert!(cities.errors[0].starts_with("page 1"));

    let skipped = report.outcome(Dataset::DeliveryPoints).unwrap();
    assert!(skipped.skipped);

    // Rows stored before the failure stay
    assert_eq!(store.count(Dataset::Regions).await.unwrap(), 1);
    assert_eq!(store.count(Dataset::Cities).await.unwrap(), 2);
    points.assert_async().await;
}

/// Delegates to SQLite but rejects the second page of cities.
struct FullDisk {
    inner: Arc<SqliteStore>,
    city_pages: AtomicUsize,
}

#[async_trait]
impl ReferenceStore for FullDisk {
    async fn truncate(&self, dataset: Dataset) -> Result<(), StoreError> {
        self.inner.truncate(dataset).await
    }

    async fn insert_page(&self, page: RowPage) -> Result<usize, StoreError> {
        if page.dataset() == Dataset::Cities && self.city_pages.fetch_add(1, Ordering::SeqCst) == 1 {
            return Err(StoreError::Task("disk full".to_string()));
        }
        self.inner.insert_page(page).await
    }

    async fn count(&self, dataset: Dataset) -> Result<u64, StoreError> {
        self.inner.count(dataset).await
    }
}

#[tokio::test]
async fn city_insert_failure_skips_delivery_points() {
    let Fixture { mut server, _token, cdek, store } = setup().await;
    let _regions = page_mock(&mut server, "/location/regions", 0, regions(&[1])).await;
    let _first = page_mock(&mut server, "/location/cities", 0, cities(&[44, 270])).await;
    let _second = page_mock(&mut server, "/location/cities", 1, cities(&[101])).await;
    let points = server
        .mock("GET", "/deliverypoints")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let failing = Arc::new(FullDisk {
        inner: store.clone(),
        city_pages: AtomicUsize::new(0),
    });
    let options = SyncOptions {
        page_size: Some(2),
        ..SyncOptions::default()
    };
    let report = SyncJob::new(cdek, failing).run(&options).await;

    assert!(!report.is_success());
    assert_eq!(report.outcome(Dataset::Regions).unwrap().rows, 1);

    let cities = report.outcome(Dataset::Cities).unwrap();
    assert!(cities.is_failed());
    assert_eq!(cities.errors, vec!["page 1: Database task failed: disk full".to_string()]);
    assert_eq!(cities.rows, 2);

    assert!(report.outcome(Dataset::DeliveryPoints).unwrap().skipped);
    assert_eq!(store.count(Dataset::Cities).await.unwrap(), 2);
    points.assert_async().await;
}

#[tokio::test]
async fn delivery_points_continue_with_next_country() {
    let Fixture { mut server, _token, cdek, store } = setup().await;
    let _russia = server
        .mock("GET", "/deliverypoints")
        .match_query(Matcher::UrlEncoded("country_code".into(), "RU".into()))
        .with_status(503)
        .create_async()
        .await;
    let kazakhstan = server
        .mock("GET", "/deliverypoints")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("country_code".into(), "KZ".into()),
            Matcher::UrlEncoded("page".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([{
                "code": "ALA1",
                "name": "Almaty",
                "type": "PVZ",
                "location": {"city_code": 4756, "city": "Almaty", "address": "Abaya 1"}
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let options = SyncOptions {
        update_regions: false,
        update_cities: false,
        countries: vec!["ru".into(), "kz".into()],
        ..SyncOptions::default()
    };
    let report = SyncJob::new(cdek, store.clone()).run(&options).await;

    let outcome = report.outcome(Dataset::DeliveryPoints).unwrap();
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("RU: "));
    assert_eq!(outcome.rows, 1);
    assert!(!report.is_success());

    assert_eq!(store.count(Dataset::DeliveryPoints).await.unwrap(), 1);
    kazakhstan.assert_async().await;
}

#[tokio::test]
async fn disabled_datasets_are_left_out() {
    let Fixture { server, _token, cdek, store } = setup().await;
    let options = SyncOptions {
        update_regions: false,
        update_cities: false,
        update_delivery_points: false,
        ..SyncOptions::default()
    };

    let report = SyncJob::new(cdek, store).run(&options).await;
    assert!(report.outcomes.is_empty());
    assert!(report.is_success());
    drop(server);
}
