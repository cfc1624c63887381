//! Error types for building and serializing ReQL terms.

use crate::catalog::{Arity, TermType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("{term_type} expects {arity} argument(s), found {found}")]
  Arity {
    term_type: TermType,
    arity: Arity,
    found: usize,
  },

  #[error("Unrecognized optional argument `{name}` for {term_type}")]
  InvalidOption { term_type: TermType, name: String },

  #[error("Cyclic term structure detected at {term_type}")]
  CyclicStructure { term_type: TermType },

  #[error("Term nesting exceeds depth limit of {limit}")]
  NestingTooDeep { limit: usize },

  #[error("Unserializable value: {0}")]
  UnserializableValue(String),

  #[error("Unknown operation: {0}")]
  UnknownOperation(String),

  #[error("Invalid catalog: {0}")]
  InvalidCatalog(String),

  #[error("Serialization error: {0}")]
  Serialization(String),
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}

pub type Result<T> = std::result::Result<T, Error>;
