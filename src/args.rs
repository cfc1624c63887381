//! Positional and named argument containers.
//!
//! Both are filled before a term is built and are never touched afterwards;
//! a [`Term`](crate::Term) owns its `Args` and `OptArgs` by value.

use crate::term::Term;
use crate::value::Value;
use indexmap::IndexMap;

/// Ordered positional operands of one term.
///
/// Converting a single array-like input (a `Vec`, or a [`Value::Array`]) into
/// `Args` spreads its elements into successive operands, one level deep.
/// `vec![a, b]` and `args![a, b]` therefore give the same operand list, while
/// `args![vec![a, b]]` gives one operand holding an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
  pub fn new() -> Self {
    Self(Vec::new())
  }

  /// Wrap one input value, flattening it if it is an array.
  pub fn single(value: impl Into<Value>) -> Self {
    match value.into() {
      Value::Array(items) => Self(items),
      other => Self(vec![other]),
    }
  }

  /// Append one operand as-is.
  pub fn with(mut self, value: impl Into<Value>) -> Self {
    self.0.push(value.into());
    self
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Value> {
    self.0.iter()
  }

  pub fn as_slice(&self) -> &[Value] {
    &self.0
  }
}

impl<T: Into<Value>> FromIterator<T> for Args {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

impl<'a> IntoIterator for &'a Args {
  type Item = &'a Value;
  type IntoIter = std::slice::Iter<'a, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl From<()> for Args {
  fn from(_: ()) -> Self {
    Args::new()
  }
}

impl<T: Into<Value>> From<Vec<T>> for Args {
  fn from(values: Vec<T>) -> Self {
    values.into_iter().collect()
  }
}

impl From<Value> for Args {
  fn from(value: Value) -> Self {
    Args::single(value)
  }
}

impl From<Term> for Args {
  fn from(term: Term) -> Self {
    Args(vec![Value::Term(term)])
  }
}

impl From<&Term> for Args {
  fn from(term: &Term) -> Self {
    Args(vec![Value::Term(term.clone())])
  }
}

macro_rules! impl_from_scalars_for_args {
  ($($t:ty),* $(,)?) => {$(
    impl From<$t> for Args {
      #[inline]
      fn from(v: $t) -> Self { Args(vec![Value::from(v)]) }
    }
  )*};
}
impl_from_scalars_for_args!(bool, i32, i64, u32, u64, usize, f64, &str, String);

/// Named optional arguments of one term, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptArgs(IndexMap<String, Value>);

impl OptArgs {
  pub fn new() -> Self {
    Self(IndexMap::new())
  }

  /// Add or replace a binding. A replaced key keeps its original position.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.insert(name.into(), value.into())
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.0.get(name)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
    self.0.iter()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(|k| k.as_str())
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OptArgs {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut optargs = OptArgs::new();
    for (k, v) in iter {
      optargs.insert(k, v);
    }
    optargs
  }
}

impl<'a> IntoIterator for &'a OptArgs {
  type Item = (&'a String, &'a Value);
  type IntoIter = indexmap::map::Iter<'a, String, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl From<IndexMap<String, Value>> for OptArgs {
  fn from(map: IndexMap<String, Value>) -> Self {
    Self(map)
  }
}

impl From<()> for OptArgs {
  fn from(_: ()) -> Self {
    OptArgs::new()
  }
}

/// Build [`Args`] from a heterogeneous list; each element is one operand.
///
/// ```
/// use reql_terms::{args, table};
///
/// let a = args![table("users"), "id-1", 3];
/// assert_eq!(a.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
  () => {
    $crate::Args::new()
  };
  ($($arg:expr),+ $(,)?) => {
    $crate::Args::new()$(.with($arg))+
  };
}

/// Build [`OptArgs`] from `name => value` pairs.
///
/// ```
/// use reql_terms::optargs;
///
/// let o = optargs! { "conflict" => "replace", "durability" => "soft" };
/// assert_eq!(o.keys().collect::<Vec<_>>(), vec!["conflict", "durability"]);
/// ```
#[macro_export]
macro_rules! optargs {
  () => {
    $crate::OptArgs::new()
  };
  ($($name:expr => $value:expr),+ $(,)?) => {
    $crate::OptArgs::new()$(.with($name, $value))+
  };
}
