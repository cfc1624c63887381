//! Term tree to wire encoding.
//!
//! Each term becomes `[code, [operands...]]`, or
//! `[code, [operands...], {options}]` when it carries at least one option.
//! Operands are the term's canonical operands (chain receiver first).
//! Literal values map as follows:
//!
//! | Value | Wire |
//! |---|---|
//! | null, bool, number, string | verbatim |
//! | array | `[2, [elements...]]` (`MAKE_ARRAY`) |
//! | object | `{key: value...}` |
//! | time | `{"$reql_type$": "TIME", "epoch_time": .., "timezone": ..}` |
//! | binary | `{"$reql_type$": "BINARY", "data": <base64>}` |
//!
//! A `DATUM` term is replaced by its single operand and a `MAKE_OBJ` term by
//! the object of its options.
//!
//! Operand counts and option names are checked against the [`Catalog`] while
//! walking, for every term including `DATUM` and `MAKE_OBJ`. The first violation aborts the walk; no partial output is
//! returned.

use crate::catalog::{Catalog, TermType};
use crate::error::{Error, Result};
use crate::term::{Operand, Term};
use crate::value::Value;
use base64::Engine;
use serde_json::{json, Map, Number, Value as Json};

/// Default nesting limit for [`SerializeOptions`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Serializer settings.
#[derive(Debug, Clone, Copy)]
pub struct SerializeOptions {
  /// Deepest allowed nesting of terms and literal containers.
  pub max_depth: usize,
}

impl Default for SerializeOptions {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl SerializeOptions {
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }
}

/// Walks a term tree and emits its wire form.
///
/// ```
/// use reql_terms::{table, Serializer};
/// use serde_json::json;
///
/// let wire = Serializer::new().serialize(&table("users").sync()).unwrap();
/// assert_eq!(wire, json!([138, [[15, ["users"]]]]));
/// ```
#[derive(Debug, Clone)]
pub struct Serializer<'c> {
  catalog: &'c Catalog,
  options: SerializeOptions,
}

impl Serializer<'static> {
  /// Serializer over [`Catalog::standard`].
  pub fn new() -> Self {
    Self::with_catalog(Catalog::standard())
  }
}

impl Default for Serializer<'static> {
  fn default() -> Self {
    Self::new()
  }
}

impl<'c> Serializer<'c> {
  pub fn with_catalog(catalog: &'c Catalog) -> Self {
    Self {
      catalog,
      options: SerializeOptions::default(),
    }
  }

  pub fn with_options(mut self, options: SerializeOptions) -> Self {
    self.options = options;
    self
  }

  pub fn catalog(&self) -> &'c Catalog {
    self.catalog
  }

  pub fn serialize(&self, term: &Term) -> Result<Json> {
    tracing::debug!(term_type = %term.term_type(), "Serializing term");
    let result = self.walk().term(term, 0);
    if let Err(ref e) = result {
      tracing::debug!(error = %e, "Term serialization failed");
    }
    result
  }

  /// Serialize a bare value, e.g. a global option of a query.
  pub fn serialize_value(&self, value: &Value) -> Result<Json> {
    self.walk().value(value, 0)
  }

  fn walk(&self) -> Walk<'c> {
    Walk {
      catalog: self.catalog,
      max_depth: self.options.max_depth,
      path: Vec::new(),
    }
  }
}

/// State of one serialization call.
struct Walk<'c> {
  catalog: &'c Catalog,
  max_depth: usize,
  /// Terms currently being serialized, outermost first.
  path: Vec<*const ()>,
}

impl Walk<'_> {
  fn enter(&self, depth: usize) -> Result<()> {
    if depth > self.max_depth {
      return Err(Error::NestingTooDeep {
        limit: self.max_depth,
      });
    }
    Ok(())
  }

  fn term(&mut self, term: &Term, depth: usize) -> Result<Json> {
    self.enter(depth)?;

    // Only ancestors matter; a term shared between siblings is fine.
    let id = term.node_id();
    if self.path.contains(&id) {
      return Err(Error::CyclicStructure {
        term_type: term.term_type(),
      });
    }

    self.path.push(id);
    let result = self.term_body(term, depth);
    self.path.pop();
    result
  }

  fn term_body(&mut self, term: &Term, depth: usize) -> Result<Json> {
    let term_type = term.term_type();
    tracing::trace!(term_type = %term_type, depth, "Serializing node");

    let spec = self.catalog.get(term_type)?;
    spec.check_arity(term.operand_count())?;
    for name in term.optargs().keys() {
      spec.check_optarg(name)?;
    }

    match term_type {
      // A datum is its single operand, unwrapped.
      TermType::Datum => {
        if let Some(operand) = term.operands().next() {
          return match operand {
            Operand::Receiver(prev) => self.term(prev, depth),
            Operand::Arg(value) => self.value(value, depth),
          };
        }
      }
      TermType::MakeObj => return self.object(term.optargs().iter(), depth),
      _ => {}
    }

    let mut operands = Vec::with_capacity(term.operand_count());
    for operand in term.operands() {
      operands.push(match operand {
        Operand::Receiver(prev) => self.term(prev, depth + 1)?,
        Operand::Arg(value) => self.value(value, depth + 1)?,
      });
    }

    let mut wire = vec![Json::from(spec.code), Json::Array(operands)];
    if !term.optargs().is_empty() {
      wire.push(self.object(term.optargs().iter(), depth)?);
    }
    Ok(Json::Array(wire))
  }

  fn value(&mut self, value: &Value, depth: usize) -> Result<Json> {
    self.enter(depth)?;
    match value {
      Value::Null => Ok(Json::Null),
      Value::Bool(b) => Ok(Json::Bool(*b)),
      Value::Int(n) => Ok(Json::from(*n)),
      Value::Float(n) => Ok(Json::Number(finite(*n)?)),
      Value::String(s) => Ok(Json::String(s.clone())),
      Value::Array(items) => {
        let code = self.catalog.get(TermType::MakeArray)?.code;
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
          elements.push(self.value(item, depth + 1)?);
        }
        Ok(json!([code, elements]))
      }
      Value::Object(obj) => self.object(obj.iter(), depth),
      Value::Term(term) => self.term(term, depth),
      Value::Time(dt) => {
        let epoch_time =
          dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_millis()) / 1000.0;
        Ok(json!({
          "$reql_type$": "TIME",
          "epoch_time": Json::Number(finite(epoch_time)?),
          "timezone": dt.format("%:z").to_string(),
        }))
      }
      Value::Binary(bytes) => Ok(json!({
        "$reql_type$": "BINARY",
        "data": base64::engine::general_purpose::STANDARD.encode(bytes),
      })),
    }
  }

  fn object<'v>(
    &mut self,
    entries: impl Iterator<Item = (&'v String, &'v Value)>,
    depth: usize,
  ) -> Result<Json> {
    let mut map = Map::new();
    for (key, value) in entries {
      map.insert(key.clone(), self.value(value, depth + 1)?);
    }
    Ok(Json::Object(map))
  }
}

fn finite(n: f64) -> Result<Number> {
  Number::from_f64(n)
    .ok_or_else(|| Error::UnserializableValue(format!("non-finite number {}", n)))
}
