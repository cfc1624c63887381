//! The [`Term`] node and its construction forms.
//!
//! A term is an operation ([`TermType`]), its positional [`Args`], its named
//! [`OptArgs`] and, for chained calls, the term it was called on. Nodes are
//! reference counted and never modified once built, so a `Term` is cheap to
//! clone, may appear under several parents, and can be handed to another
//! thread as-is.
//!
//! Every operation can be built in four equivalent ways:
//!
//! ```
//! use reql_terms::{args, OptArgs, Term, TermType};
//!
//! let users = Term::new(TermType::Table, "users");
//!
//! let a = Term::new(TermType::Sync, args![users.clone()]);
//! let b = Term::with_optargs(TermType::Sync, vec![users.clone()], OptArgs::new());
//! let c = Term::chained(users.clone(), TermType::Sync, (), OptArgs::new());
//! let d = Term::from_args(TermType::Sync, [users]);
//!
//! let wire = a.to_wire().unwrap();
//! assert_eq!(wire, b.to_wire().unwrap());
//! assert_eq!(wire, c.to_wire().unwrap());
//! assert_eq!(wire, d.to_wire().unwrap());
//! ```

use crate::args::{Args, OptArgs};
use crate::catalog::TermType;
use crate::error::Result;
use crate::serialize::Serializer;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Term(Arc<Node>);

#[derive(Debug, PartialEq)]
pub(crate) struct Node {
  prev: Option<Term>,
  term_type: TermType,
  args: Args,
  optargs: OptArgs,
}

// Unlink long `prev` chains one node at a time instead of recursing.
impl Drop for Node {
  fn drop(&mut self) {
    let mut next = self.prev.take();
    while let Some(Term(node)) = next {
      match Arc::try_unwrap(node) {
        Ok(mut node) => next = node.prev.take(),
        Err(_) => break,
      }
    }
  }
}

/// One entry of a term's canonical operand sequence.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
  /// The term this one was chained from.
  Receiver(&'a Term),
  Arg(&'a Value),
}

impl Term {
  fn from_node(node: Node) -> Self {
    Term(Arc::new(node))
  }

  /// Fresh operation with explicit operands.
  pub fn new(term_type: TermType, args: impl Into<Args>) -> Self {
    Self::with_optargs(term_type, args, OptArgs::new())
  }

  /// Fresh operation with operands and options.
  pub fn with_optargs(term_type: TermType, args: impl Into<Args>, optargs: OptArgs) -> Self {
    Self::from_node(Node {
      prev: None,
      term_type,
      args: args.into(),
      optargs,
    })
  }

  /// Operation called on `prev`, which becomes operand zero.
  pub fn chained(prev: Term, term_type: TermType, args: impl Into<Args>, optargs: OptArgs) -> Self {
    Self::from_node(Node {
      prev: Some(prev),
      term_type,
      args: args.into(),
      optargs,
    })
  }

  /// Variadic form: each value is one operand.
  pub fn from_args<I>(term_type: TermType, values: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<Value>,
  {
    Self::new(term_type, values.into_iter().collect::<Args>())
  }

  /// Method form of [`Term::chained`].
  pub fn chain(&self, term_type: TermType, args: impl Into<Args>, optargs: OptArgs) -> Self {
    Self::chained(self.clone(), term_type, args, optargs)
  }

  /// A `DATUM` term wrapping one literal. Arrays stay a single operand.
  pub(crate) fn datum(value: impl Into<Value>) -> Self {
    Self::new(TermType::Datum, Args::new().with(value))
  }

  /// A copy of this term with one more option set. `self` is unchanged.
  pub fn opt(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    let node = &self.0;
    Self::from_node(Node {
      prev: node.prev.clone(),
      term_type: node.term_type,
      args: node.args.clone(),
      optargs: node.optargs.clone().with(name, value),
    })
  }

  pub fn term_type(&self) -> TermType {
    self.0.term_type
  }

  pub fn prev(&self) -> Option<&Term> {
    self.0.prev.as_ref()
  }

  pub fn args(&self) -> &Args {
    &self.0.args
  }

  pub fn optargs(&self) -> &OptArgs {
    &self.0.optargs
  }

  /// The literal of a well-formed `DATUM` term: one explicit operand, no
  /// receiver.
  pub fn datum_value(&self) -> Option<&Value> {
    match self.0.args.as_slice() {
      [value] if self.0.term_type == TermType::Datum && self.0.prev.is_none() => Some(value),
      _ => None,
    }
  }

  /// Canonical operands: the chain receiver, if any, followed by the
  /// explicit arguments.
  pub fn operands(&self) -> impl Iterator<Item = Operand<'_>> {
    self
      .0
      .prev
      .iter()
      .map(Operand::Receiver)
      .chain(self.0.args.iter().map(Operand::Arg))
  }

  pub fn operand_count(&self) -> usize {
    usize::from(self.0.prev.is_some()) + self.0.args.len()
  }

  /// True when both handles point at the same node.
  pub fn same_node(&self, other: &Term) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }

  pub(crate) fn node_id(&self) -> *const () {
    Arc::as_ptr(&self.0) as *const ()
  }

  /// Serialize with the standard catalog and default options.
  pub fn to_wire(&self) -> Result<serde_json::Value> {
    Serializer::new().serialize(self)
  }
}

impl Term {
  fn fmt_call(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.optargs.is_empty() {
      if let Some(datum) = self.datum_value() {
        return write!(f, "{}", datum);
      }
    }

    write!(f, "{}(", self.0.term_type)?;
    let mut first = true;
    for arg in &self.0.args {
      if !first {
        write!(f, ", ")?;
      }
      write!(f, "{}", arg)?;
      first = false;
    }
    for (name, value) in &self.0.optargs {
      if !first {
        write!(f, ", ")?;
      }
      write!(f, "{}={}", name, value)?;
      first = false;
    }
    write!(f, ")")
  }
}

impl fmt::Display for Term {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Walk the receiver chain iteratively, root first.
    let mut chain = vec![self];
    let mut current = self;
    while let Some(prev) = current.prev() {
      chain.push(prev);
      current = prev;
    }
    for (i, term) in chain.iter().rev().enumerate() {
      if i > 0 {
        write!(f, ".")?;
      }
      term.fmt_call(f)?;
    }
    Ok(())
  }
}
