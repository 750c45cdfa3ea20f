use super::*;

const RECORD_JSON: &str = r#"{"id":42,"first_name":"Ada","last_name":"Lovelace","username":"ada","auth_date":1700000000,"hash":"00"}"#;

#[test]
fn parse_record_accepts_bare_payload() {
    let record = parse_record(RECORD_JSON).expect("record");
    assert_eq!(record.id, 42);
}

#[test]
fn parse_record_accepts_local_storage_export() {
    let wrapped = json!({ "telegram_user": RECORD_JSON }).to_string();
    let record = parse_record(&wrapped).expect("record");
    assert_eq!(record.first_name, "Ada");
}

#[test]
fn parse_record_rejects_garbage() {
    assert!(matches!(parse_record("nope"), Err(CliError::InvalidJson(_))));
    assert!(matches!(parse_record(r#"{"id":1}"#), Err(CliError::Record(_))));
}

#[test]
fn summarize_reports_freshness() {
    let record = parse_record(RECORD_JSON).expect("record");
    let fresh = summarize(&record, 1_700_000_000 + 3_600);
    assert_eq!(fresh["fresh"], true);
    assert_eq!(fresh["age_secs"], 3_600);
    assert_eq!(fresh["name"], "Ada Lovelace");
    assert_eq!(fresh["handle"], "@ada");

    let stale = summarize(&record, 1_700_000_000 + 90_000);
    assert_eq!(stale["fresh"], false);
}

#[test]
fn read_input_reports_missing_file() {
    let err = read_input("/definitely/not/here.json").expect_err("missing file");
    assert!(matches!(err, CliError::Input { .. }));
}
