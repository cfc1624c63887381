//! Query envelope and encoding tests.

use reql_terms::protocol::{Query, QueryType};
use reql_terms::{db, table, Catalog, Serializer, TermType};
use serde_json::json;

#[test]
fn test_query_type_conversion() {
  assert_eq!(QueryType::try_from(1), Ok(QueryType::Start));
  assert_eq!(QueryType::try_from(2), Ok(QueryType::Continue));
  assert_eq!(QueryType::try_from(3), Ok(QueryType::Stop));
  assert_eq!(QueryType::try_from(4), Ok(QueryType::NoreplyWait));
  assert_eq!(QueryType::try_from(5), Ok(QueryType::ServerInfo));
  assert!(QueryType::try_from(0).is_err());
  assert!(QueryType::try_from(0xFF).is_err());
}

#[test]
fn test_start_query_wire() {
  let query = Query::start(table("users").sync());
  let wire = query.to_wire(&Serializer::new()).unwrap();
  assert_eq!(wire, json!([1, [138, [[15, ["users"]]]], {}]));
}

#[test]
fn test_start_query_with_global_optargs() {
  let query = Query::start(table("users").count())
    .with_db("blog")
    .with_global_optarg("read_mode", "outdated");
  let wire = query.to_wire(&Serializer::new()).unwrap();
  assert_eq!(
    wire,
    json!([1, [43, [[15, ["users"]]]], {"db": [14, ["blog"]], "read_mode": "outdated"}])
  );
  assert_eq!(query.query_type(), QueryType::Start);
  assert_eq!(query.term().unwrap().term_type(), TermType::Count);
}

#[test]
fn test_bare_queries_have_no_term() {
  let serializer = Serializer::new();
  assert_eq!(Query::continue_().to_wire(&serializer).unwrap(), json!([2]));
  assert_eq!(Query::stop().to_wire(&serializer).unwrap(), json!([3]));
  assert_eq!(Query::noreply_wait().to_wire(&serializer).unwrap(), json!([4]));
  assert_eq!(Query::server_info().to_wire(&serializer).unwrap(), json!([5]));
  assert!(Query::stop().term().is_none());
}

#[test]
fn test_start_query_propagates_term_errors() {
  let query = Query::start(table("users").sync().opt("bogus", 1));
  assert!(query.encode().is_err());
}

#[test]
fn test_json_encoding() {
  let bytes = Query::start(db("test").table("users"))
    .encode()
    .unwrap();
  assert_eq!(
    String::from_utf8(bytes).unwrap(),
    r#"[1,[15,[[14,["test"]],"users"]],{}]"#
  );
}

#[test]
fn test_encoded_payload_is_the_wire_json() {
  let query = Query::start(table("users").sync()).with_db("test");
  let bytes = query.encode().unwrap();
  let decoded: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(decoded, query.to_wire(&Serializer::new()).unwrap());
}

#[test]
fn test_custom_catalog_in_envelope() {
  let catalog = Catalog::standard().clone();
  let query = Query::start(table("users"));
  let wire = query.to_wire(&Serializer::with_catalog(&catalog)).unwrap();
  assert_eq!(wire, json!([1, [15, ["users"]], {}]));
}
