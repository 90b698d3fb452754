//! Integration tests using mock HTTP servers
//!
//! Tests the full end-to-end flow: YAML definition → JWT token exchange →
//! paged report requests → table output.

use adobe_reports::loader::load_definition_from_str;
use adobe_reports::output::{write_parquet, ParquetWriterConfig};
use adobe_reports::{AnalyticsClient, ClientConfig, Error};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_PRIVATE_KEY: &str = include_str!("fixtures/test_key.pem");

const SINGLE_DIMENSION_YAML: &str = r"
report_suite_id: fake_rsid
date_range:
  start: 2017-12-31
  end: 2018-01-06
metrics:
  - metrics/pageviews
dimensions:
  - variables/daterangeday
";

const BREAKDOWN_YAML: &str = r"
report_suite_id: fake_rsid
date_range:
  start: 2019-12-01
  end: 2020-03-31
metrics:
  - metrics/visits
dimensions:
  - variables/mobiledevicetype
  - variables/lasttouchchannel
";

fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new(
        "fake_company",
        "fake_org_id",
        "fake_subject_account",
        "fake_client_id",
        "fake_client_secret",
    )
    .with_private_key_pem(TEST_PRIVATE_KEY);
    config.auth_host = server.uri();
    config.analytics_host = server.uri();
    config
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/ims/exchange/jwt"))
        .and(wiremock::matchers::body_string_contains(
            "client_id=fake_client_id",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "test-token-abc",
            "expires_in": 86_399_995_i64
        })))
        .mount(server)
        .await;
}

fn report_page(
    dimension: &str,
    page: u32,
    total_pages: u32,
    last_page: bool,
    rows: &[(&str, &str, f64)],
) -> serde_json::Value {
    json!({
        "totalPages": total_pages,
        "firstPage": page == 0,
        "lastPage": last_page,
        "numberOfElements": rows.len(),
        "number": page,
        "totalElements": rows.len(),
        "columns": {
            "dimension": { "id": dimension, "type": "string" },
            "columnIds": ["0"]
        },
        "rows": rows
            .iter()
            .map(|(id, value, metric)| json!({
                "itemId": id, "value": value, "data": [metric]
            }))
            .collect::<Vec<_>>(),
        "summaryData": { "totals": [0.0] }
    })
}

// ============================================================================
// Single-dimension report flow
// ============================================================================

#[tokio::test]
async fn test_full_report_flow() {
    let mock_server = MockServer::start().await;
    mount_token_endpoint(&mock_server).await;

    // Reports endpoint checks the auth headers and pages twice
    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .and(header("X-Api-Key", "fake_client_id"))
        .and(header("x-proxy-global-company-id", "fake_company"))
        .and(header("Authorization", "Bearer test-token-abc"))
        .and(body_partial_json(json!({"settings": {"page": 0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/daterangeday",
            0,
            2,
            false,
            &[
                ("1171131", "Dec 31, 2017", 794.0),
                ("1180001", "Jan 1, 2018", 16558.0),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .and(body_partial_json(json!({"settings": {"page": 1}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/daterangeday",
            1,
            2,
            true,
            &[("1180002", "Jan 2, 2018", 17381.0)],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::new(test_config(&mock_server)).unwrap();
    let definition = load_definition_from_str(SINGLE_DIMENSION_YAML).unwrap();

    let table = client.run_definition(&definition).await.unwrap();

    assert_eq!(table.dimensions, vec!["variables/daterangeday".to_string()]);
    assert_eq!(table.metrics, vec!["metrics/pageviews".to_string()]);
    assert_eq!(table.len(), 3);

    let records = table.to_records();
    assert_eq!(
        records[0],
        json!({
            "itemId": "1171131",
            "variables/daterangeday": "Dec 31, 2017",
            "metrics/pageviews": 794.0
        })
    );
    assert_eq!(records[2]["metrics/pageviews"], json!(17381.0));
}

#[tokio::test]
async fn test_empty_report_produces_placeholder_row() {
    let mock_server = MockServer::start().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/daterangeday",
            0,
            0,
            false,
            &[],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::new(test_config(&mock_server)).unwrap();
    let definition = load_definition_from_str(SINGLE_DIMENSION_YAML).unwrap();

    let table = client.run_definition(&definition).await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(
        table.to_records()[0],
        json!({
            "itemId": "0",
            "variables/daterangeday": "Unspecified",
            "metrics/pageviews": 0.0
        })
    );
}

// ============================================================================
// Breakdown flow
// ============================================================================

#[tokio::test]
async fn test_breakdown_definition_flow() {
    let mock_server = MockServer::start().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .and(body_partial_json(json!({
            "dimension": "variables/mobiledevicetype"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/mobiledevicetype",
            0,
            1,
            true,
            &[("A", "Mobile Phone", 300.0), ("B", "Tablet", 120.0)],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .and(body_partial_json(json!({
            "dimension": "variables/lasttouchchannel",
            "metricContainer": { "metricFilters": [{ "itemId": "A" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/lasttouchchannel",
            0,
            1,
            true,
            &[("c1", "Email", 180.0), ("c2", "Search", 120.0)],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .and(body_partial_json(json!({
            "dimension": "variables/lasttouchchannel",
            "metricContainer": { "metricFilters": [{ "itemId": "B" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/lasttouchchannel",
            0,
            1,
            true,
            &[("c3", "Social", 120.0)],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::new(test_config(&mock_server)).unwrap();
    let definition = load_definition_from_str(BREAKDOWN_YAML).unwrap();

    let table = client.run_definition(&definition).await.unwrap();

    assert_eq!(
        table.dimensions,
        vec![
            "variables/mobiledevicetype".to_string(),
            "variables/lasttouchchannel".to_string()
        ]
    );
    assert_eq!(table.len(), 3);

    let records = table.to_records();
    assert_eq!(
        records[0],
        json!({
            "itemId": "c1",
            "variables/mobiledevicetype": "Mobile Phone",
            "variables/lasttouchchannel": "Email",
            "metrics/visits": 180.0
        })
    );
    assert_eq!(records[2]["variables/mobiledevicetype"], json!("Tablet"));
}

// ============================================================================
// Retry behavior
// ============================================================================

#[tokio::test]
async fn test_report_retries_through_rate_limit() {
    let mock_server = MockServer::start().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("{\"error_code\":\"429050\",\"message\":\"Too many requests\"}"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/daterangeday",
            0,
            1,
            true,
            &[("1171131", "Dec 31, 2017", 794.0)],
        )))
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::new(test_config(&mock_server)).unwrap();
    let definition = load_definition_from_str(SINGLE_DIMENSION_YAML).unwrap();

    let table = client.run_definition(&definition).await.unwrap();
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_token_failure_surfaces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ims/exchange/jwt"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::new(test_config(&mock_server)).unwrap();
    let definition = load_definition_from_str(SINGLE_DIMENSION_YAML).unwrap();

    let err = client.run_definition(&definition).await.unwrap_err();
    assert!(matches!(err, Error::TokenExchange { status: 400, .. }));
}

// ============================================================================
// Output formats
// ============================================================================

#[tokio::test]
async fn test_report_to_parquet() {
    let mock_server = MockServer::start().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/fake_company/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_page(
            "variables/daterangeday",
            0,
            1,
            true,
            &[
                ("1171131", "Dec 31, 2017", 794.0),
                ("1180001", "Jan 1, 2018", 16558.0),
            ],
        )))
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::new(test_config(&mock_server)).unwrap();
    let definition = load_definition_from_str(SINGLE_DIMENSION_YAML).unwrap();
    let table = client.run_definition(&definition).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.parquet");
    let rows = write_parquet(&table, &path, &ParquetWriterConfig::default()).unwrap();

    assert_eq!(rows, 2);
    assert!(path.exists());
}
