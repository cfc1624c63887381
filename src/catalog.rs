//! The operation catalog.
//!
//! Every ReQL operation is a [`TermType`] whose discriminant is the tag code
//! sent on the wire. What the server accepts for each operation (how many
//! positional arguments, which optional arguments) is data, kept in an
//! [`OpSpec`] table. A [`Catalog`] is that table; [`Catalog::standard`]
//! carries the built-in one, and callers may inject their own through
//! [`Catalog::from_specs`] or [`Catalog::from_json`].
//!
//! # Example
//!
//! ```
//! use reql_terms::{Catalog, TermType};
//!
//! let sync = Catalog::standard().get(TermType::Sync).unwrap();
//! assert_eq!(sync.code, 138);
//! assert!(sync.arity.contains(1));
//! assert_eq!(TermType::from_code(138), Some(TermType::Sync));
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

macro_rules! term_types {
  ($($variant:ident = $code:literal => $name:literal,)*) => {
    /// A ReQL operation. The discriminant is the protocol tag code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    #[repr(u32)]
    pub enum TermType {
      $($variant = $code,)*
    }

    impl TermType {
      /// Every known term type, in declaration order.
      pub const ALL: &'static [TermType] = &[$(TermType::$variant,)*];

      pub fn from_code(code: u32) -> Option<Self> {
        match code {
          $($code => Some(TermType::$variant),)*
          _ => None,
        }
      }

      /// Upper-case protocol name, e.g. `"GET_ALL"`.
      pub fn name(&self) -> &'static str {
        match self {
          $(TermType::$variant => $name,)*
        }
      }
    }
  };
}

term_types! {
  Datum = 1 => "DATUM",
  MakeArray = 2 => "MAKE_ARRAY",
  MakeObj = 3 => "MAKE_OBJ",
  Var = 10 => "VAR",
  Javascript = 11 => "JAVASCRIPT",
  Error = 12 => "ERROR",
  ImplicitVar = 13 => "IMPLICIT_VAR",
  Db = 14 => "DB",
  Table = 15 => "TABLE",
  Get = 16 => "GET",
  Eq = 17 => "EQ",
  Ne = 18 => "NE",
  Lt = 19 => "LT",
  Le = 20 => "LE",
  Gt = 21 => "GT",
  Ge = 22 => "GE",
  Not = 23 => "NOT",
  Add = 24 => "ADD",
  Sub = 25 => "SUB",
  Mul = 26 => "MUL",
  Div = 27 => "DIV",
  Mod = 28 => "MOD",
  Append = 29 => "APPEND",
  Slice = 30 => "SLICE",
  GetField = 31 => "GET_FIELD",
  HasFields = 32 => "HAS_FIELDS",
  Pluck = 33 => "PLUCK",
  Without = 34 => "WITHOUT",
  Merge = 35 => "MERGE",
  Reduce = 37 => "REDUCE",
  Map = 38 => "MAP",
  Filter = 39 => "FILTER",
  ConcatMap = 40 => "CONCAT_MAP",
  OrderBy = 41 => "ORDER_BY",
  Distinct = 42 => "DISTINCT",
  Count = 43 => "COUNT",
  Union = 44 => "UNION",
  Nth = 45 => "NTH",
  InnerJoin = 48 => "INNER_JOIN",
  OuterJoin = 49 => "OUTER_JOIN",
  EqJoin = 50 => "EQ_JOIN",
  CoerceTo = 51 => "COERCE_TO",
  TypeOf = 52 => "TYPE_OF",
  Update = 53 => "UPDATE",
  Delete = 54 => "DELETE",
  Replace = 55 => "REPLACE",
  Insert = 56 => "INSERT",
  DbCreate = 57 => "DB_CREATE",
  DbDrop = 58 => "DB_DROP",
  DbList = 59 => "DB_LIST",
  TableCreate = 60 => "TABLE_CREATE",
  TableDrop = 61 => "TABLE_DROP",
  TableList = 62 => "TABLE_LIST",
  Funcall = 64 => "FUNCALL",
  Branch = 65 => "BRANCH",
  Or = 66 => "OR",
  And = 67 => "AND",
  ForEach = 68 => "FOR_EACH",
  Func = 69 => "FUNC",
  Skip = 70 => "SKIP",
  Limit = 71 => "LIMIT",
  Zip = 72 => "ZIP",
  Asc = 73 => "ASC",
  Desc = 74 => "DESC",
  IndexCreate = 75 => "INDEX_CREATE",
  IndexDrop = 76 => "INDEX_DROP",
  IndexList = 77 => "INDEX_LIST",
  GetAll = 78 => "GET_ALL",
  Info = 79 => "INFO",
  Prepend = 80 => "PREPEND",
  Sample = 81 => "SAMPLE",
  InsertAt = 82 => "INSERT_AT",
  DeleteAt = 83 => "DELETE_AT",
  ChangeAt = 84 => "CHANGE_AT",
  SpliceAt = 85 => "SPLICE_AT",
  IsEmpty = 86 => "IS_EMPTY",
  OffsetsOf = 87 => "OFFSETS_OF",
  SetInsert = 88 => "SET_INSERT",
  SetIntersection = 89 => "SET_INTERSECTION",
  SetUnion = 90 => "SET_UNION",
  SetDifference = 91 => "SET_DIFFERENCE",
  Default = 92 => "DEFAULT",
  Contains = 93 => "CONTAINS",
  Keys = 94 => "KEYS",
  Difference = 95 => "DIFFERENCE",
  WithFields = 96 => "WITH_FIELDS",
  Match = 97 => "MATCH",
  Json = 98 => "JSON",
  Iso8601 = 99 => "ISO8601",
  ToIso8601 = 100 => "TO_ISO8601",
  EpochTime = 101 => "EPOCH_TIME",
  ToEpochTime = 102 => "TO_EPOCH_TIME",
  Now = 103 => "NOW",
  InTimezone = 104 => "IN_TIMEZONE",
  During = 105 => "DURING",
  Time = 136 => "TIME",
  Literal = 137 => "LITERAL",
  Sync = 138 => "SYNC",
  IndexStatus = 139 => "INDEX_STATUS",
  IndexWait = 140 => "INDEX_WAIT",
  Upcase = 141 => "UPCASE",
  Downcase = 142 => "DOWNCASE",
  Object = 143 => "OBJECT",
  Group = 144 => "GROUP",
  Sum = 145 => "SUM",
  Avg = 146 => "AVG",
  Min = 147 => "MIN",
  Max = 148 => "MAX",
  Split = 149 => "SPLIT",
  Ungroup = 150 => "UNGROUP",
  Random = 151 => "RANDOM",
  Changes = 152 => "CHANGES",
  Http = 153 => "HTTP",
  Args = 154 => "ARGS",
  Binary = 155 => "BINARY",
  IndexRename = 156 => "INDEX_RENAME",
  Uuid = 169 => "UUID",
  Bracket = 170 => "BRACKET",
  ToJsonString = 172 => "TO_JSON_STRING",
  Range = 173 => "RANGE",
  Config = 174 => "CONFIG",
  Status = 175 => "STATUS",
  Reconfigure = 176 => "RECONFIGURE",
  Wait = 177 => "WAIT",
  Rebalance = 179 => "REBALANCE",
  Minval = 180 => "MINVAL",
  Maxval = 181 => "MAXVAL",
  Between = 182 => "BETWEEN",
  Floor = 183 => "FLOOR",
  Ceil = 184 => "CEIL",
  Round = 185 => "ROUND",
  Values = 186 => "VALUES",
  Fold = 187 => "FOLD",
  Grant = 188 => "GRANT",
}

impl TermType {
  /// Protocol tag code of this operation.
  pub fn code(self) -> u32 {
    self as u32
  }
}

impl fmt::Display for TermType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Bounds on the number of positional arguments, chain receiver included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arity {
  pub min: usize,
  /// `None` means unbounded.
  pub max: Option<usize>,
}

impl Arity {
  pub const fn exactly(n: usize) -> Self {
    Self { min: n, max: Some(n) }
  }

  pub const fn between(min: usize, max: usize) -> Self {
    Self { min, max: Some(max) }
  }

  pub const fn at_least(min: usize) -> Self {
    Self { min, max: None }
  }

  pub fn contains(&self, n: usize) -> bool {
    n >= self.min && self.max.map_or(true, |max| n <= max)
  }
}

impl fmt::Display for Arity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.max {
      Some(max) if max == self.min => write!(f, "{}", max),
      Some(max) => write!(f, "{} to {}", self.min, max),
      None => write!(f, "at least {}", self.min),
    }
  }
}

/// Which optional argument names an operation accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptArgSpec {
  /// Any name, including the empty one. Used where names are object keys.
  Any,
  Only(Vec<String>),
}

impl OptArgSpec {
  pub fn none() -> Self {
    OptArgSpec::Only(Vec::new())
  }

  pub fn accepts(&self, name: &str) -> bool {
    match self {
      OptArgSpec::Any => true,
      OptArgSpec::Only(names) => names.iter().any(|n| n == name),
    }
  }
}

/// Catalog entry for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpSpec {
  pub term_type: TermType,
  /// Tag code emitted on the wire.
  pub code: u32,
  pub arity: Arity,
  pub optargs: OptArgSpec,
}

impl OpSpec {
  pub fn new(term_type: TermType, arity: Arity, optargs: &[&str]) -> Self {
    Self {
      term_type,
      code: term_type.code(),
      arity,
      optargs: OptArgSpec::Only(optargs.iter().map(|s| s.to_string()).collect()),
    }
  }

  pub fn with_any_optargs(mut self) -> Self {
    self.optargs = OptArgSpec::Any;
    self
  }

  pub fn check_arity(&self, found: usize) -> Result<()> {
    if self.arity.contains(found) {
      Ok(())
    } else {
      Err(Error::Arity {
        term_type: self.term_type,
        arity: self.arity,
        found,
      })
    }
  }

  pub fn check_optarg(&self, name: &str) -> Result<()> {
    if self.optargs.accepts(name) {
      Ok(())
    } else {
      Err(Error::InvalidOption {
        term_type: self.term_type,
        name: name.to_string(),
      })
    }
  }
}

/// Table of operation specs keyed by term type.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  specs: HashMap<TermType, OpSpec>,
}

impl Catalog {
  /// The built-in catalog, built on first use.
  pub fn standard() -> &'static Catalog {
    static STANDARD: OnceLock<Catalog> = OnceLock::new();
    STANDARD.get_or_init(|| Catalog::from_specs(standard_specs()))
  }

  /// Later specs for the same term type replace earlier ones.
  pub fn from_specs(specs: impl IntoIterator<Item = OpSpec>) -> Self {
    Self {
      specs: specs.into_iter().map(|s| (s.term_type, s)).collect(),
    }
  }

  /// Load a catalog from a JSON array of [`OpSpec`] objects.
  ///
  /// ```
  /// use reql_terms::{Catalog, TermType};
  ///
  /// let catalog = Catalog::from_json(r#"[
  ///   {"term_type": "SYNC", "code": 138,
  ///    "arity": {"min": 1, "max": 1}, "optargs": {"only": []}}
  /// ]"#).unwrap();
  /// assert!(catalog.get(TermType::Sync).is_ok());
  /// assert!(catalog.get(TermType::Table).is_err());
  /// ```
  pub fn from_json(json: &str) -> Result<Self> {
    let specs: Vec<OpSpec> =
      serde_json::from_str(json).map_err(|e| Error::InvalidCatalog(e.to_string()))?;
    for spec in &specs {
      if let Some(max) = spec.arity.max {
        if max < spec.arity.min {
          return Err(Error::InvalidCatalog(format!(
            "{}: max arity {} is below min arity {}",
            spec.term_type, max, spec.arity.min
          )));
        }
      }
    }
    tracing::debug!(operations = specs.len(), "Loaded operation catalog");
    Ok(Self::from_specs(specs))
  }

  pub fn get(&self, term_type: TermType) -> Result<&OpSpec> {
    self
      .specs
      .get(&term_type)
      .ok_or_else(|| Error::UnknownOperation(term_type.name().to_string()))
  }

  pub fn len(&self) -> usize {
    self.specs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.specs.is_empty()
  }

  pub fn specs(&self) -> impl Iterator<Item = &OpSpec> {
    self.specs.values()
  }
}

const WRITE_OPTS: &[&str] = &["durability", "return_changes", "ignore_write_hook"];
const UPDATE_OPTS: &[&str] = &["non_atomic", "durability", "return_changes", "ignore_write_hook"];
const BOUND_OPTS: &[&str] = &["left_bound", "right_bound"];

fn standard_specs() -> Vec<OpSpec> {
  use TermType::*;

  let one = Arity::exactly(1);
  let two = Arity::exactly(2);
  let three = Arity::exactly(3);
  let variadic = Arity::at_least(1);

  let mut specs = vec![
    OpSpec::new(Datum, one, &[]),
    OpSpec::new(MakeArray, Arity::at_least(0), &[]),
    OpSpec::new(MakeObj, Arity::exactly(0), &[]).with_any_optargs(),
    OpSpec::new(Var, one, &[]),
    OpSpec::new(Javascript, one, &["timeout"]),
    OpSpec::new(Error, Arity::between(0, 1), &[]),
    OpSpec::new(ImplicitVar, Arity::exactly(0), &[]),
    OpSpec::new(Db, one, &[]),
    OpSpec::new(Table, Arity::between(1, 2), &["read_mode", "identifier_format"]),
    OpSpec::new(Get, two, &[]),
    OpSpec::new(GetAll, Arity::at_least(2), &["index"]),
    OpSpec::new(Mod, two, &[]),
    OpSpec::new(Slice, Arity::between(2, 3), BOUND_OPTS),
    OpSpec::new(GetField, two, &[]),
    OpSpec::new(Reduce, two, &[]),
    OpSpec::new(Map, Arity::at_least(2), &[]),
    OpSpec::new(Fold, three, &["emit", "final_emit"]),
    OpSpec::new(Filter, two, &["default"]),
    OpSpec::new(ConcatMap, two, &[]),
    OpSpec::new(OrderBy, variadic, &["index"]),
    OpSpec::new(Distinct, one, &["index"]),
    OpSpec::new(Count, Arity::between(1, 2), &[]),
    OpSpec::new(Union, Arity::at_least(0), &["interleave"]),
    OpSpec::new(Nth, two, &[]),
    OpSpec::new(Bracket, two, &[]),
    OpSpec::new(InnerJoin, three, &[]),
    OpSpec::new(OuterJoin, three, &[]),
    OpSpec::new(EqJoin, three, &["index", "ordered"]),
    OpSpec::new(Range, Arity::between(0, 2), &[]),
    OpSpec::new(InsertAt, three, &[]),
    OpSpec::new(DeleteAt, Arity::between(2, 3), &[]),
    OpSpec::new(ChangeAt, three, &[]),
    OpSpec::new(SpliceAt, three, &[]),
    OpSpec::new(CoerceTo, two, &[]),
    OpSpec::new(Update, two, UPDATE_OPTS),
    OpSpec::new(Delete, one, WRITE_OPTS),
    OpSpec::new(Replace, two, UPDATE_OPTS),
    OpSpec::new(Insert, two, &["conflict", "durability", "return_changes", "ignore_write_hook"]),
    OpSpec::new(DbList, Arity::exactly(0), &[]),
    OpSpec::new(
      TableCreate,
      Arity::between(1, 2),
      &[
        "primary_key",
        "shards",
        "replicas",
        "primary_replica_tag",
        "nonvoting_replica_tags",
        "durability",
      ],
    ),
    OpSpec::new(TableDrop, Arity::between(1, 2), &[]),
    OpSpec::new(TableList, Arity::between(0, 1), &[]),
    OpSpec::new(Wait, Arity::between(0, 1), &["wait_for", "timeout"]),
    OpSpec::new(
      Reconfigure,
      Arity::between(0, 1),
      &[
        "shards",
        "replicas",
        "primary_replica_tag",
        "nonvoting_replica_tags",
        "dry_run",
        "emergency_repair",
      ],
    ),
    OpSpec::new(Rebalance, Arity::between(0, 1), &[]),
    OpSpec::new(Grant, Arity::between(2, 3), &[]),
    OpSpec::new(IndexCreate, Arity::between(2, 3), &["multi", "geo"]),
    OpSpec::new(IndexDrop, two, &[]),
    OpSpec::new(IndexStatus, variadic, &[]),
    OpSpec::new(IndexWait, variadic, &[]),
    OpSpec::new(IndexRename, three, &["overwrite"]),
    OpSpec::new(Funcall, variadic, &[]),
    OpSpec::new(Branch, Arity::at_least(3), &[]),
    OpSpec::new(Or, Arity::at_least(0), &[]),
    OpSpec::new(And, Arity::at_least(0), &[]),
    OpSpec::new(ForEach, two, &[]),
    OpSpec::new(Func, two, &[]),
    OpSpec::new(Skip, two, &[]),
    OpSpec::new(Limit, two, &[]),
    OpSpec::new(Sample, two, &[]),
    OpSpec::new(Default, two, &[]),
    OpSpec::new(Match, two, &[]),
    OpSpec::new(Iso8601, one, &["default_timezone"]),
    OpSpec::new(Now, Arity::exactly(0), &[]),
    OpSpec::new(InTimezone, two, &[]),
    OpSpec::new(During, three, BOUND_OPTS),
    OpSpec::new(Time, Arity::between(4, 7), &[]),
    OpSpec::new(Literal, Arity::between(0, 1), &[]),
    OpSpec::new(Object, Arity::at_least(0), &[]),
    OpSpec::new(Group, variadic, &["index", "multi"]),
    OpSpec::new(Sum, Arity::between(1, 2), &[]),
    OpSpec::new(Avg, Arity::between(1, 2), &[]),
    OpSpec::new(Min, Arity::between(1, 2), &["index"]),
    OpSpec::new(Max, Arity::between(1, 2), &["index"]),
    OpSpec::new(Split, Arity::between(1, 3), &[]),
    OpSpec::new(Random, Arity::between(0, 2), &["float"]),
    OpSpec::new(
      Changes,
      one,
      &[
        "squash",
        "changefeed_queue_size",
        "include_initial",
        "include_states",
        "include_offsets",
        "include_types",
      ],
    ),
    OpSpec::new(
      Http,
      one,
      &[
        "data",
        "timeout",
        "method",
        "params",
        "header",
        "attempts",
        "redirects",
        "verify",
        "page",
        "page_limit",
        "auth",
        "result_format",
      ],
    ),
    OpSpec::new(Uuid, Arity::between(0, 1), &[]),
    OpSpec::new(Minval, Arity::exactly(0), &[]),
    OpSpec::new(Maxval, Arity::exactly(0), &[]),
    OpSpec::new(Between, three, &["index", "left_bound", "right_bound"]),
  ];

  // Comparison, arithmetic and field-list operations take one or more operands.
  for term_type in [
    Eq, Ne, Lt, Le, Gt, Ge, Add, Sub, Mul, Div, Contains, HasFields, WithFields, Pluck, Without,
    Merge,
  ] {
    specs.push(OpSpec::new(term_type, variadic, &[]));
  }

  for term_type in [
    Append,
    Prepend,
    Difference,
    SetInsert,
    SetIntersection,
    SetUnion,
    SetDifference,
    OffsetsOf,
  ] {
    specs.push(OpSpec::new(term_type, two, &[]));
  }

  for term_type in [
    Not, Floor, Ceil, Round, Keys, Values, IsEmpty, Zip, TypeOf, DbCreate, DbDrop, Config, Status,
    Sync, IndexList, Asc, Desc, Info, Upcase, Downcase, Json, ToJsonString, ToIso8601, EpochTime,
    ToEpochTime, Ungroup, Args, Binary,
  ] {
    specs.push(OpSpec::new(term_type, one, &[]));
  }

  specs
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_code_conversion() {
    assert_eq!(TermType::from_code(1), Some(TermType::Datum));
    assert_eq!(TermType::from_code(15), Some(TermType::Table));
    assert_eq!(TermType::from_code(138), Some(TermType::Sync));
    assert_eq!(TermType::from_code(999), None);
    assert_eq!(TermType::GetAll.code(), 78);
  }

  #[test]
  fn test_names() {
    assert_eq!(TermType::Sync.name(), "SYNC");
    assert_eq!(TermType::GetAll.to_string(), "GET_ALL");
    assert_eq!(
      serde_json::to_string(&TermType::ToJsonString).unwrap(),
      "\"TO_JSON_STRING\""
    );
  }

  #[test]
  fn test_every_term_type_has_a_standard_spec() {
    let catalog = Catalog::standard();
    for term_type in TermType::ALL {
      let spec = catalog.get(*term_type).unwrap();
      assert_eq!(spec.code, term_type.code());
    }
    assert_eq!(catalog.len(), TermType::ALL.len());
  }

  #[test]
  fn test_arity_bounds() {
    let arity = Arity::between(1, 2);
    assert!(!arity.contains(0));
    assert!(arity.contains(1));
    assert!(arity.contains(2));
    assert!(!arity.contains(3));
    assert!(Arity::at_least(1).contains(100));
    assert_eq!(Arity::exactly(2).to_string(), "2");
    assert_eq!(Arity::at_least(1).to_string(), "at least 1");
    assert_eq!(Arity::between(0, 1).to_string(), "0 to 1");
  }

  #[test]
  fn test_optarg_acceptance() {
    let catalog = Catalog::standard();
    let insert = catalog.get(TermType::Insert).unwrap();
    assert!(insert.check_optarg("conflict").is_ok());
    assert!(matches!(
      insert.check_optarg("bogus"),
      Err(Error::InvalidOption { .. })
    ));
    assert!(insert.check_optarg("").is_err());

    let make_obj = catalog.get(TermType::MakeObj).unwrap();
    assert!(make_obj.check_optarg("anything").is_ok());
    assert!(make_obj.check_optarg("").is_ok());

    let datum = catalog.get(TermType::Datum).unwrap();
    assert_eq!(datum.arity, Arity::exactly(1));
    assert!(datum.check_optarg("default").is_err());
  }

  #[test]
  fn test_from_json_rejects_inverted_bounds() {
    let json = r#"[{"term_type": "SYNC", "code": 138,
      "arity": {"min": 2, "max": 1}, "optargs": "any"}]"#;
    assert!(matches!(
      Catalog::from_json(json),
      Err(Error::InvalidCatalog(_))
    ));
    assert!(matches!(
      Catalog::from_json("not json"),
      Err(Error::InvalidCatalog(_))
    ));
  }
}
