use super::*;

const TOKEN: &str = "123456:TEST-token";

fn unsigned_record() -> IdentityRecord {
    IdentityRecord {
        id: 42,
        first_name: "Ada".to_owned(),
        last_name: None,
        username: Some("ada".to_owned()),
        photo_url: None,
        auth_date: 1_700_000_000,
        hash: String::new(),
    }
}

fn signed_record() -> IdentityRecord {
    let mut record = unsigned_record();
    record.hash = expected_hash(&record, TOKEN).expect("hash");
    record
}

#[test]
fn data_check_string_sorts_present_fields_and_skips_hash() {
    let mut record = unsigned_record();
    record.hash = "ignored".to_owned();
    assert_eq!(
        data_check_string(&record),
        "auth_date=1700000000\nfirst_name=Ada\nid=42\nusername=ada"
    );
}

#[test]
fn data_check_string_includes_all_optional_fields_when_present() {
    let mut record = unsigned_record();
    record.last_name = Some("Lovelace".to_owned());
    record.photo_url = Some("https://example.test/p.jpg".to_owned());
    assert_eq!(
        data_check_string(&record),
        "auth_date=1700000000\nfirst_name=Ada\nid=42\nlast_name=Lovelace\nphoto_url=https://example.test/p.jpg\nusername=ada"
    );
}

#[test]
fn expected_hash_is_lowercase_hex_sha256_length() {
    let hash = expected_hash(&unsigned_record(), TOKEN).expect("hash");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn correctly_signed_record_verifies() {
    assert_eq!(check_signature(&signed_record(), TOKEN), Ok(()));
}

#[test]
fn uppercase_hex_signature_still_verifies() {
    let mut record = signed_record();
    record.hash = record.hash.to_ascii_uppercase();
    assert_eq!(check_signature(&record, TOKEN), Ok(()));
}

#[test]
fn tampered_field_fails_verification() {
    let mut record = signed_record();
    record.first_name = "Eve".to_owned();
    assert_eq!(check_signature(&record, TOKEN), Err(VerifyError::Mismatch));
}

#[test]
fn wrong_token_fails_verification() {
    assert_eq!(check_signature(&signed_record(), "other:token"), Err(VerifyError::Mismatch));
}

#[test]
fn truncated_signature_is_a_mismatch() {
    let mut record = signed_record();
    record.hash.truncate(32);
    assert_eq!(check_signature(&record, TOKEN), Err(VerifyError::Mismatch));
}

#[test]
fn non_hex_signature_is_an_encoding_error() {
    let mut record = signed_record();
    record.hash = "zz".to_owned();
    assert!(matches!(check_signature(&record, TOKEN), Err(VerifyError::Encoding(_))));
}

#[test]
fn empty_token_is_rejected() {
    assert_eq!(expected_hash(&unsigned_record(), ""), Err(VerifyError::EmptyToken));
    assert_eq!(check_signature(&signed_record(), ""), Err(VerifyError::EmptyToken));
}
