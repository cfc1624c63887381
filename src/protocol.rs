//! Query envelope.
//!
//! A serialized term is sent inside a query envelope:
//! `[QueryType, term, {global optargs}]` for `START`, `[QueryType]` for the
//! others. The payload is sent as JSON; framing (tokens, length prefixes,
//! handshake) belongs to the transport and is not handled here.

use crate::args::OptArgs;
use crate::error::Result;
use crate::query::db;
use crate::serialize::Serializer;
use crate::term::Term;
use crate::value::Value;
use serde_json::{Map, Value as Json};

/// Query types
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
  Start = 1,
  Continue = 2,
  Stop = 3,
  NoreplyWait = 4,
  ServerInfo = 5,
}

impl TryFrom<u8> for QueryType {
  type Error = ();
  fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
    match v {
      1 => Ok(Self::Start),
      2 => Ok(Self::Continue),
      3 => Ok(Self::Stop),
      4 => Ok(Self::NoreplyWait),
      5 => Ok(Self::ServerInfo),
      _ => Err(()),
    }
  }
}

/// One query sent to the server.
#[derive(Debug, Clone)]
pub struct Query {
  query_type: QueryType,
  term: Option<Term>,
  global_optargs: OptArgs,
}

impl Query {
  /// Run `term`.
  pub fn start(term: Term) -> Self {
    Self {
      query_type: QueryType::Start,
      term: Some(term),
      global_optargs: OptArgs::new(),
    }
  }

  pub fn continue_() -> Self {
    Self::bare(QueryType::Continue)
  }

  pub fn stop() -> Self {
    Self::bare(QueryType::Stop)
  }

  pub fn noreply_wait() -> Self {
    Self::bare(QueryType::NoreplyWait)
  }

  pub fn server_info() -> Self {
    Self::bare(QueryType::ServerInfo)
  }

  fn bare(query_type: QueryType) -> Self {
    Self {
      query_type,
      term: None,
      global_optargs: OptArgs::new(),
    }
  }

  /// Set a run option such as `durability` or `read_mode`.
  ///
  /// Run options are passed through unchecked; the server rejects unknown
  /// ones.
  pub fn with_global_optarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.global_optargs.insert(name, value);
    self
  }

  /// Default database for tables referenced without one.
  pub fn with_db(self, name: impl Into<String>) -> Self {
    self.with_global_optarg("db", db(name.into()))
  }

  pub fn query_type(&self) -> QueryType {
    self.query_type
  }

  pub fn term(&self) -> Option<&Term> {
    self.term.as_ref()
  }

  pub fn to_wire(&self, serializer: &Serializer<'_>) -> Result<Json> {
    let mut wire = vec![Json::from(self.query_type as u8)];
    if let Some(term) = &self.term {
      wire.push(serializer.serialize(term)?);

      let mut optargs = Map::new();
      for (name, value) in &self.global_optargs {
        optargs.insert(name.clone(), serializer.serialize_value(value)?);
      }
      wire.push(Json::Object(optargs));
    }
    Ok(Json::Array(wire))
  }

  /// Serialize with the standard catalog and encode as JSON bytes.
  pub fn encode(&self) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&self.to_wire(&Serializer::new())?)?)
  }
}
