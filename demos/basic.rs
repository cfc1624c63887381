//! Basic example: build a few queries and print what goes on the wire.

use reql_terms::{db, desc, func, table, var, Query, Serializer};
use serde_json::json;

fn main() -> reql_terms::Result<()> {
  // Flush a table to disk
  let sync = db("blog").table("posts").sync();
  println!("{}", sync);
  println!("  -> {}", sync.to_wire()?);

  // Latest published posts
  let latest = table("posts")
    .filter(func([1], var(1).get_field("published").eq(true)))
    .order_by(desc("created_at"))
    .limit(5);
  println!("{}", latest);
  println!("  -> {}", serde_json::to_string_pretty(&latest.to_wire()?)?);

  // Insert with options
  let insert = table("posts")
    .insert(json!({"title": "Hello", "tags": ["intro"]}))
    .opt("conflict", "replace")
    .opt("return_changes", true);
  println!("{}", insert);
  println!("  -> {}", insert.to_wire()?);

  // Wrap in a START query and encode it
  let query = Query::start(latest).with_db("blog");
  let wire = query.to_wire(&Serializer::new())?;
  let payload = query.encode()?;
  println!("Query: {}", wire);
  println!("Payload: {} bytes", payload.len());

  // Invalid options are reported when serializing
  match table("posts").sync().opt("hard", true).to_wire() {
    Ok(_) => println!("Unexpectedly accepted"),
    Err(e) => println!("Rejected: {}", e),
  }

  Ok(())
}
