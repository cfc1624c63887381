use reql_terms::*;
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_get_by_primary_key() {
  let query = table("users").get("user-1");
  assert_eq!(
    query.to_wire().unwrap(),
    json!([16, [[15, ["users"]], "user-1"]])
  );
}

#[test]
fn test_get_all_with_index() {
  let query = table("users")
    .get_all(vec!["alice@example.com", "bob@example.com"])
    .opt("index", "email");
  assert_eq!(
    query.to_wire().unwrap(),
    json!([78, [[15, ["users"]], "alice@example.com", "bob@example.com"], {"index": "email"}])
  );
}

#[test]
fn test_between_with_bounds() {
  let query = table("scores")
    .between(10, 20)
    .opt("index", "points")
    .opt("right_bound", "closed");
  assert_eq!(
    query.to_wire().unwrap(),
    json!([182, [[15, ["scores"]], 10, 20], {"index": "points", "right_bound": "closed"}])
  );
}

#[test]
fn test_filter_with_function() {
  let query = table("users").filter(func([1], var(1).get_field("age").gt(18)));
  assert_eq!(
    query.to_wire().unwrap(),
    json!([39, [[15, ["users"]],
      [69, [[2, [1]], [21, [[31, [[10, [1]], "age"]], 18]]]]]])
  );
}

#[test]
fn test_update_with_durability() {
  let query = table("users")
    .get("user-1")
    .update(json!({"active": false}))
    .opt("durability", "soft");
  assert_eq!(
    query.to_wire().unwrap(),
    json!([53, [[16, [[15, ["users"]], "user-1"]], {"active": false}], {"durability": "soft"}])
  );
}

#[test]
fn test_pagination() {
  let query = table("posts")
    .order_by(desc("created_at"))
    .skip(20)
    .limit(10);
  assert_eq!(
    query.to_wire().unwrap(),
    json!([71, [[70, [[41, [[15, ["posts"]], [74, ["created_at"]]]], 20]], 10]])
  );
}

#[test]
fn test_group_and_count() {
  let query = table("orders").group("status").count().ungroup();
  assert_eq!(
    query.to_wire().unwrap(),
    json!([150, [[43, [[144, [[15, ["orders"]], "status"]]]]]])
  );
}

#[test]
fn test_eq_join_and_zip() {
  let query = table("posts")
    .eq_join("author_id", table("users"))
    .opt("index", "id")
    .zip();
  assert_eq!(
    query.to_wire().unwrap(),
    json!([72, [[50, [[15, ["posts"]], "author_id", [15, ["users"]]], {"index": "id"}]]])
  );
}

#[test]
fn test_admin_queries() {
  assert_eq!(db_list().to_wire().unwrap(), json!([59, []]));
  assert_eq!(db_create("blog").to_wire().unwrap(), json!([57, ["blog"]]));
  assert_eq!(
    db("blog")
      .table_create("posts")
      .opt("primary_key", "slug")
      .to_wire()
      .unwrap(),
    json!([60, [[14, ["blog"]], "posts"], {"primary_key": "slug"}])
  );
  assert_eq!(
    table("posts").index_create("tags").opt("multi", true).to_wire().unwrap(),
    json!([75, [[15, ["posts"]], "tags"], {"multi": true}])
  );
}

#[test]
fn test_branch_and_literals() {
  let query = branch(args![row().get_field("vip"), "gold", "standard"]);
  assert_eq!(
    query.to_wire().unwrap(),
    json!([65, [[31, [[13, []], "vip"]], "gold", "standard"]])
  );
  let prefs = BTreeMap::from([("prefs", literal(json!({"theme": "dark"})))]);
  assert_eq!(
    table("users").get("u").update(prefs).to_wire().unwrap(),
    json!([53, [[16, [[15, ["users"]], "u"]], {"prefs": [137, [{"theme": "dark"}]]}]])
  );
}

#[test]
fn test_display_shows_chain() {
  let query = db("app").table("users").get("u1");
  assert_eq!(query.to_string(), r#"DB("app").TABLE("users").GET("u1")"#);
}

#[test]
fn test_chain_does_not_modify_receiver() {
  let users = table("users");
  let count = users.count();
  let synced = users.sync();
  assert!(count.prev().unwrap().same_node(&users));
  assert!(synced.prev().unwrap().same_node(&users));
  assert_eq!(users.to_wire().unwrap(), json!([15, ["users"]]));
}
