use chrono::{FixedOffset, TimeZone, Utc};
use reql_terms::{expr, table, Binary, Error, Value};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use uuid::Uuid;

#[test]
fn test_time_literal_is_pseudo_type() {
  let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
  let wire = expr(at).to_wire().unwrap();
  assert_eq!(
    wire,
    json!({"$reql_type$": "TIME", "epoch_time": 1700000000.0, "timezone": "+00:00"})
  );
}

#[test]
fn test_time_literal_keeps_offset_and_millis() {
  let offset = FixedOffset::east_opt(2 * 3600).unwrap();
  let at = offset.timestamp_millis_opt(1_700_000_000_250).unwrap();
  let wire = expr(at).to_wire().unwrap();
  assert_eq!(wire["epoch_time"], json!(1700000000.25));
  assert_eq!(wire["timezone"], json!("+02:00"));
}

#[test]
fn test_binary_literal_is_base64() {
  let wire = expr(Binary(b"hello".to_vec())).to_wire().unwrap();
  assert_eq!(wire, json!({"$reql_type$": "BINARY", "data": "aGVsbG8="}));
}

#[test]
fn test_binary_inside_insert() {
  let wire = table("files")
    .insert(BTreeMap::from([("blob", Binary(vec![0, 1, 2]))]))
    .to_wire()
    .unwrap();
  assert_eq!(
    wire,
    json!([56, [[15, ["files"]], {"blob": {"$reql_type$": "BINARY", "data": "AAEC"}}]])
  );
}

#[test]
fn test_uuid_is_sent_as_string() {
  let id = Uuid::parse_str("6f1c0b52-5a4b-4f63-9d0a-1a2b3c4d5e6f").unwrap();
  let wire = table("users").get(id).to_wire().unwrap();
  assert_eq!(
    wire,
    json!([16, [[15, ["users"]], "6f1c0b52-5a4b-4f63-9d0a-1a2b3c4d5e6f"]])
  );
}

#[test]
fn test_from_serialize_struct() {
  #[derive(Serialize)]
  struct Event {
    kind: String,
    tags: Vec<String>,
    score: Option<f64>,
  }

  let event = Value::from_serialize(&Event {
    kind: "click".into(),
    tags: vec!["a".into(), "b".into()],
    score: None,
  })
  .unwrap();
  let wire = table("events").insert(event).to_wire().unwrap();
  assert_eq!(
    wire,
    json!([56, [[15, ["events"]], {"kind": "click", "tags": [2, ["a", "b"]], "score": null}]])
  );
}

#[test]
fn test_from_serialize_rejects_non_string_keys() {
  let mut map = std::collections::HashMap::new();
  map.insert(vec![1u8], 1);
  let err = Value::from_serialize(&map).unwrap_err();
  assert!(matches!(err, Error::UnserializableValue(_)));
}

#[test]
fn test_infinite_float_is_unserializable() {
  let err = expr(f64::INFINITY).to_wire().unwrap_err();
  assert!(matches!(err, Error::UnserializableValue(_)));
}

#[test]
fn test_null_and_option_values() {
  assert!(Value::from(None::<String>).is_null());
  assert_eq!(expr(None::<i32>).to_wire().unwrap(), json!(null));
  assert_eq!(expr(Some("x")).to_wire().unwrap(), json!("x"));
}

#[test]
fn test_large_unsigned_becomes_float() {
  let wire = expr(u64::MAX).to_wire().unwrap();
  assert!(wire.is_f64());
  assert_eq!(expr(7u64).to_wire().unwrap(), json!(7));
}
