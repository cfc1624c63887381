//! ReQL term builder and wire serializer
//!
//! The query-construction core of a ReQL client driver. Queries are built by
//! chaining operations into an immutable [`Term`] tree, then collapsed into
//! the nested-array wire form the server expects. Transport is left to the
//! caller.
//!
//! # Example
//!
//! ```
//! use reql_terms::{table, Query};
//! use serde_json::json;
//!
//! // Build a query
//! let sync = table("users").sync();
//!
//! // Serialize the term tree
//! assert_eq!(sync.to_wire()?, json!([138, [[15, ["users"]]]]));
//!
//! // Wrap it in a START query against the `test` database and encode it
//! let query = Query::start(sync).with_db("test");
//! let bytes = query.encode()?;
//! assert_eq!(
//!     String::from_utf8(bytes).unwrap(),
//!     r#"[1,[138,[[15,["users"]]]],{"db":[14,["test"]]}]"#
//! );
//! # Ok::<(), reql_terms::Error>(())
//! ```

mod args;
pub mod catalog;
mod error;
pub mod protocol;
pub mod query;
pub mod serialize;
mod term;
mod value;

pub use args::{Args, OptArgs};
pub use catalog::{Arity, Catalog, OpSpec, OptArgSpec, TermType};
pub use error::{Error, Result};
pub use protocol::{Query, QueryType};
pub use query::{
  asc, branch, db, db_create, db_drop, db_list, desc, expr, func, literal, now, row, table,
  table_create, table_drop, table_list, uuid, var,
};
pub use serialize::{SerializeOptions, Serializer, DEFAULT_MAX_DEPTH};
pub use term::{Operand, Term};
pub use value::{Binary, Value};
