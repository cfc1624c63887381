//! Operand and option values.
//!
//! A [`Value`] is whatever may sit in a positional or named argument slot:
//! a JSON-like literal, a nested [`Term`], or a typed literal (time, binary)
//! that the server receives as a pseudo-type object.

use crate::error::{Error, Result};
use crate::term::Term;
use chrono::{DateTime, FixedOffset, TimeZone};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  Array(Vec<Value>),
  /// Keys keep insertion order on the wire.
  Object(IndexMap<String, Value>),
  Term(Term),
  Time(DateTime<FixedOffset>),
  Binary(Vec<u8>),
}

/// Raw bytes, sent as a `BINARY` pseudo-type rather than an array of numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary(pub Vec<u8>);

impl Value {
  /// Convert any `serde::Serialize` type through its JSON form.
  ///
  /// Map keys keep the order the type serializes them in.
  pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
    serde_json::to_value(value)
      .map(Value::from)
      .map_err(|e| Error::UnserializableValue(e.to_string()))
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_term(&self) -> Option<&Term> {
    match self {
      Value::Term(t) => Some(t),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }
}

macro_rules! impl_from_integers_for_value {
  ($($t:ty),* $(,)?) => {$(
    impl From<$t> for Value {
      #[inline]
      fn from(v: $t) -> Self { Value::Int(v as i64) }
    }
  )*};
}
impl_from_integers_for_value!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_unsigned_for_value {
  ($($t:ty),* $(,)?) => {$(
    impl From<$t> for Value {
      fn from(v: $t) -> Self {
        i64::try_from(v).map(Value::Int).unwrap_or(Value::Float(v as f64))
      }
    }
  )*};
}
impl_from_wide_unsigned_for_value!(u64, usize);

impl From<f32> for Value {
  fn from(v: f32) -> Self {
    Value::Float(v as f64)
  }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self {
    Value::Float(v)
  }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self {
    Value::Bool(v)
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

impl From<&String> for Value {
  fn from(s: &String) -> Self {
    Value::String(s.clone())
  }
}

impl From<Uuid> for Value {
  fn from(id: Uuid) -> Self {
    Value::String(id.to_string())
  }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
  fn from(dt: DateTime<Tz>) -> Self {
    Value::Time(dt.fixed_offset())
  }
}

impl From<Binary> for Value {
  fn from(b: Binary) -> Self {
    Value::Binary(b.0)
  }
}

impl From<Term> for Value {
  fn from(t: Term) -> Self {
    Value::Term(t)
  }
}

impl From<&Term> for Value {
  fn from(t: &Term) -> Self {
    Value::Term(t.clone())
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self {
    v.map_or(Value::Null, Into::into)
  }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(v: Vec<T>) -> Self {
    Value::Array(v.into_iter().map(Into::into).collect())
  }
}

impl<K: Into<String>, V: Into<Value>> From<IndexMap<K, V>> for Value {
  fn from(map: IndexMap<K, V>) -> Self {
    Value::Object(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
  fn from(map: BTreeMap<K, V>) -> Self {
    Value::Object(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// Keys are sorted so the wire form does not depend on hash order.
impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
  fn from(map: HashMap<K, V>) -> Self {
    let mut entries: Vec<(String, Value)> =
      map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Value::Object(entries.into_iter().collect())
  }
}

impl From<serde_json::Value> for Value {
  fn from(value: serde_json::Value) -> Self {
    match value {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(b),
      serde_json::Value::Number(n) => match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
      },
      serde_json::Value::String(s) => Value::String(s),
      serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
      serde_json::Value::Object(obj) => {
        Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
      }
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => write!(f, "null"),
      Value::Bool(b) => write!(f, "{}", b),
      Value::Int(n) => write!(f, "{}", n),
      Value::Float(n) => write!(f, "{}", n),
      Value::String(s) => write!(f, "{:?}", s),
      Value::Array(arr) => {
        write!(f, "[")?;
        for (i, item) in arr.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{}", item)?;
        }
        write!(f, "]")
      }
      Value::Object(obj) => {
        write!(f, "{{")?;
        for (i, (key, value)) in obj.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{:?}: {}", key, value)?;
        }
        write!(f, "}}")
      }
      Value::Term(t) => write!(f, "{}", t),
      Value::Time(dt) => write!(f, "TIME({})", dt.to_rfc3339()),
      Value::Binary(bytes) => write!(f, "BINARY(<{} bytes>)", bytes.len()),
    }
  }
}
