//! Tests for the report definition loader

use super::*;
use crate::types::SortOrder;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

const VALID_YAML: &str = r"
report_suite_id: fake_rsid
date_range:
  start: 2019-12-01
  end: 2020-03-31
metrics:
  - metrics/visits
  - metrics/orders
dimensions:
  - variables/mobiledevicetype
  - variables/lasttouchchannel
limit: 400
";

#[test]
fn test_load_valid_definition() {
    let def = load_definition_from_str(VALID_YAML).unwrap();

    assert_eq!(def.report_suite_id, "fake_rsid");
    assert_eq!(
        def.date_range.start,
        NaiveDate::from_ymd_opt(2019, 12, 1).unwrap()
    );
    assert_eq!(
        def.date_range.end,
        NaiveDate::from_ymd_opt(2020, 3, 31).unwrap()
    );
    assert_eq!(
        def.metrics,
        vec!["metrics/visits".to_string(), "metrics/orders".to_string()]
    );
    assert_eq!(def.dimensions.len(), 2);
    assert_eq!(def.limit, Some(400));
    assert_eq!(def.sort, None);
    assert!(def.has_breakdowns());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.yaml");
    std::fs::write(&path, VALID_YAML).unwrap();

    let def = load_definition(&path).unwrap();
    assert_eq!(def.report_suite_id, "fake_rsid");
}

#[test]
fn test_load_missing_file() {
    let err = load_definition("/nonexistent/report.yaml").unwrap_err();
    assert!(matches!(err, crate::error::Error::FileNotFound { .. }));
}

#[test]
fn test_to_request() {
    let def = load_definition_from_str(VALID_YAML).unwrap();
    let request = def.to_request();

    assert_eq!(request.rsid, "fake_rsid");
    assert_eq!(request.dimension, "variables/mobiledevicetype");
    assert_eq!(
        request.metric_ids(),
        vec!["metrics/visits".to_string(), "metrics/orders".to_string()]
    );
    assert_eq!(
        request.global_filters[0].date_range,
        "2019-12-01T00:00:00/2020-04-01T00:00:00"
    );

    let settings = request.settings.unwrap();
    assert_eq!(settings.limit, Some(400));
    assert_eq!(settings.dimension_sort, Some(SortOrder::Asc));

    request.validate().unwrap();
}

#[test]
fn test_sort_override() {
    let yaml = format!("{VALID_YAML}sort: desc\n");
    let def = load_definition_from_str(&yaml).unwrap();

    assert_eq!(def.sort, Some(SortOrder::Desc));
    let request = def.to_request();
    assert_eq!(
        request.settings.unwrap().dimension_sort,
        Some(SortOrder::Desc)
    );
}

#[test]
fn test_rejects_empty_metrics() {
    let yaml = r"
report_suite_id: fake_rsid
date_range:
  start: 2020-01-01
  end: 2020-01-31
metrics: []
dimensions:
  - variables/daterangeday
";
    assert!(load_definition_from_str(yaml).is_err());
}

#[test]
fn test_rejects_empty_dimensions() {
    let yaml = r"
report_suite_id: fake_rsid
date_range:
  start: 2020-01-01
  end: 2020-01-31
metrics:
  - metrics/visits
dimensions: []
";
    assert!(load_definition_from_str(yaml).is_err());
}

#[test]
fn test_rejects_duplicate_dimensions() {
    let yaml = r"
report_suite_id: fake_rsid
date_range:
  start: 2020-01-01
  end: 2020-01-31
metrics:
  - metrics/visits
dimensions:
  - variables/daterangeday
  - variables/daterangeday
";
    assert!(load_definition_from_str(yaml).is_err());
}

#[test]
fn test_rejects_inverted_date_range() {
    let yaml = r"
report_suite_id: fake_rsid
date_range:
  start: 2020-03-31
  end: 2020-01-01
metrics:
  - metrics/visits
dimensions:
  - variables/daterangeday
";
    let err = load_definition_from_str(yaml).unwrap_err();
    assert!(matches!(
        err,
        crate::error::Error::InvalidConfigValue { .. }
    ));
}

#[test]
fn test_rejects_out_of_range_limit() {
    let yaml = r"
report_suite_id: fake_rsid
date_range:
  start: 2020-01-01
  end: 2020-01-31
metrics:
  - metrics/visits
dimensions:
  - variables/daterangeday
limit: 100000
";
    assert!(load_definition_from_str(yaml).is_err());

    let yaml = yaml.replace("limit: 100000", "limit: 0");
    assert!(load_definition_from_str(&yaml).is_err());
}
