//! Fluent query construction.
//!
//! Entry points (`db`, `table`, `expr`, ...) start a term tree; methods on
//! [`Term`] chain further operations onto it. Every method here is a thin
//! call to [`Term::chain`] with the matching [`TermType`]; options are added
//! afterwards with [`Term::opt`].
//!
//! # Example
//! ```
//! use reql_terms::{func, table, var};
//! use serde_json::json;
//!
//! let query = table("users")
//!     .filter(func([1], var(1).get_field("age").gt(21)))
//!     .order_by("name")
//!     .limit(10);
//!
//! assert_eq!(
//!     query.to_wire().unwrap(),
//!     json!([71, [[41, [[39, [[15, ["users"]],
//!         [69, [[2, [1]], [21, [[31, [[10, [1]], "age"]], 21]]]]]], "name"]], 10]])
//! );
//! ```

use crate::args::{Args, OptArgs};
use crate::catalog::TermType;
use crate::term::Term;
use crate::value::Value;

/// Chained operations that take no arguments besides the receiver.
macro_rules! nullary {
    ($($(#[$doc:meta])* $method:ident => $term_type:ident,)*) => {$(
        $(#[$doc])*
        pub fn $method(&self) -> Term {
            self.chain(TermType::$term_type, Args::new(), OptArgs::new())
        }
    )*};
}

/// Chained operations that take exactly one argument.
macro_rules! unary {
    ($($(#[$doc:meta])* $method:ident => $term_type:ident,)*) => {$(
        $(#[$doc])*
        pub fn $method(&self, arg: impl Into<Value>) -> Term {
            self.chain(TermType::$term_type, Args::new().with(arg), OptArgs::new())
        }
    )*};
}

/// Chained operations that take a list of arguments. A `Vec` is spread into
/// separate arguments.
macro_rules! variadic {
    ($($(#[$doc:meta])* $method:ident => $term_type:ident,)*) => {$(
        $(#[$doc])*
        pub fn $method(&self, args: impl Into<Args>) -> Term {
            self.chain(TermType::$term_type, args, OptArgs::new())
        }
    )*};
}

// Method names follow the query language (`eq`, `add`, `not`, ...); use `==`
// for structural comparison of terms.
#[allow(clippy::should_implement_trait)]
impl Term {
    nullary! {
        /// Flush the table's soft-durability writes to disk.
        sync => Sync,
        count => Count,
        /// Delete the selected documents. Options: `durability`,
        /// `return_changes`, `ignore_write_hook`.
        delete => Delete,
        /// Subscribe to a changefeed. Options include `squash` and
        /// `include_initial`.
        changes => Changes,
        distinct => Distinct,
        keys => Keys,
        values => Values,
        is_empty => IsEmpty,
        not => Not,
        type_of => TypeOf,
        info => Info,
        upcase => Upcase,
        downcase => Downcase,
        to_json_string => ToJsonString,
        to_iso8601 => ToIso8601,
        to_epoch_time => ToEpochTime,
        ungroup => Ungroup,
        zip => Zip,
        floor => Floor,
        ceil => Ceil,
        round => Round,
        config => Config,
        status => Status,
        wait => Wait,
        rebalance => Rebalance,
        reconfigure => Reconfigure,
        index_list => IndexList,
        table_list => TableList,
    }

    unary! {
        table => Table,
        table_create => TableCreate,
        table_drop => TableDrop,
        get => Get,
        /// Options: `default`.
        filter => Filter,
        /// Options: `conflict`, `durability`, `return_changes`,
        /// `ignore_write_hook`.
        insert => Insert,
        update => Update,
        replace => Replace,
        limit => Limit,
        skip => Skip,
        nth => Nth,
        get_field => GetField,
        bracket => Bracket,
        default => Default,
        coerce_to => CoerceTo,
        append => Append,
        prepend => Prepend,
        difference => Difference,
        set_insert => SetInsert,
        set_union => SetUnion,
        set_intersection => SetIntersection,
        set_difference => SetDifference,
        concat_map => ConcatMap,
        reduce => Reduce,
        for_each => ForEach,
        sample => Sample,
        delete_at => DeleteAt,
        in_timezone => InTimezone,
        index_drop => IndexDrop,
        eq => Eq,
        ne => Ne,
        lt => Lt,
        le => Le,
        gt => Gt,
        ge => Ge,
        add => Add,
        sub => Sub,
        mul => Mul,
        div => Div,
        rem => Mod,
    }

    variadic! {
        /// Options: `index`.
        get_all => GetAll,
        pluck => Pluck,
        without => Without,
        merge => Merge,
        has_fields => HasFields,
        with_fields => WithFields,
        contains => Contains,
        /// Options: `index`.
        order_by => OrderBy,
        map => Map,
        union => Union,
        /// Options: `index`, `multi`.
        group => Group,
        sum => Sum,
        avg => Avg,
        min => Min,
        max => Max,
        and => And,
        or => Or,
        /// Options: `multi`, `geo`.
        index_create => IndexCreate,
        index_status => IndexStatus,
        index_wait => IndexWait,
        funcall => Funcall,
    }

    /// Options: `index`, `left_bound`, `right_bound`.
    pub fn between(&self, lower: impl Into<Value>, upper: impl Into<Value>) -> Term {
        self.chain(
            TermType::Between,
            Args::new().with(lower).with(upper),
            OptArgs::new(),
        )
    }

    pub fn slice(&self, start: impl Into<Value>, end: impl Into<Value>) -> Term {
        self.chain(
            TermType::Slice,
            Args::new().with(start).with(end),
            OptArgs::new(),
        )
    }

    /// Options: `index`, `ordered`.
    pub fn eq_join(&self, field: impl Into<Value>, right: impl Into<Value>) -> Term {
        self.chain(
            TermType::EqJoin,
            Args::new().with(field).with(right),
            OptArgs::new(),
        )
    }

    pub fn insert_at(&self, index: impl Into<Value>, value: impl Into<Value>) -> Term {
        self.chain(
            TermType::InsertAt,
            Args::new().with(index).with(value),
            OptArgs::new(),
        )
    }

    pub fn change_at(&self, index: impl Into<Value>, value: impl Into<Value>) -> Term {
        self.chain(
            TermType::ChangeAt,
            Args::new().with(index).with(value),
            OptArgs::new(),
        )
    }

    /// Options: `overwrite`.
    pub fn index_rename(&self, old_name: impl Into<Value>, new_name: impl Into<Value>) -> Term {
        self.chain(
            TermType::IndexRename,
            Args::new().with(old_name).with(new_name),
            OptArgs::new(),
        )
    }
}

/// Reference a database by name.
pub fn db(name: impl Into<Value>) -> Term {
    Term::new(TermType::Db, Args::new().with(name))
}

/// Reference a table in the connection's default database.
///
/// # Example
/// ```
/// use reql_terms::{db, table};
///
/// let in_default = table("users");
/// let in_test = db("test").table("users");
/// assert_eq!(in_default.to_wire().unwrap(), serde_json::json!([15, ["users"]]));
/// assert_eq!(in_test.to_wire().unwrap(), serde_json::json!([15, [[14, ["test"]], "users"]]));
/// ```
pub fn table(name: impl Into<Value>) -> Term {
    Term::new(TermType::Table, Args::new().with(name))
}

/// Lift a literal into a term.
///
/// Arrays become `MAKE_ARRAY`, other literals (objects included) `DATUM`;
/// a term is returned unchanged.
pub fn expr(value: impl Into<Value>) -> Term {
    match value.into() {
        Value::Term(term) => term,
        Value::Array(items) => Term::new(TermType::MakeArray, items.into_iter().collect::<Args>()),
        other => Term::datum(other),
    }
}

pub fn db_list() -> Term {
    Term::new(TermType::DbList, ())
}

pub fn db_create(name: impl Into<Value>) -> Term {
    Term::new(TermType::DbCreate, Args::new().with(name))
}

pub fn db_drop(name: impl Into<Value>) -> Term {
    Term::new(TermType::DbDrop, Args::new().with(name))
}

pub fn table_create(name: impl Into<Value>) -> Term {
    Term::new(TermType::TableCreate, Args::new().with(name))
}

pub fn table_drop(name: impl Into<Value>) -> Term {
    Term::new(TermType::TableDrop, Args::new().with(name))
}

pub fn table_list() -> Term {
    Term::new(TermType::TableList, ())
}

pub fn now() -> Term {
    Term::new(TermType::Now, ())
}

pub fn uuid() -> Term {
    Term::new(TermType::Uuid, ())
}

pub fn asc(field: impl Into<Value>) -> Term {
    Term::new(TermType::Asc, Args::new().with(field))
}

pub fn desc(field: impl Into<Value>) -> Term {
    Term::new(TermType::Desc, Args::new().with(field))
}

/// The implicit document variable of single-argument functions.
pub fn row() -> Term {
    Term::new(TermType::ImplicitVar, ())
}

pub fn literal(value: impl Into<Value>) -> Term {
    Term::new(TermType::Literal, Args::new().with(value))
}

pub fn branch(args: impl Into<Args>) -> Term {
    Term::new(TermType::Branch, args)
}

/// A function parameter. `id` must match one of the enclosing [`func`]'s
/// parameter ids.
pub fn var(id: i64) -> Term {
    Term::new(TermType::Var, id)
}

/// A function term. Parameter ids are chosen by the caller and referenced in
/// `body` through [`var`].
pub fn func(params: impl IntoIterator<Item = i64>, body: impl Into<Value>) -> Term {
    let params = Term::from_args(TermType::MakeArray, params);
    Term::new(TermType::Func, Args::new().with(params).with(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_query() {
        let query = table("users");
        assert_eq!(query.to_wire().unwrap(), json!([15, ["users"]]));
    }

    #[test]
    fn test_sync_query() {
        let query = table("users").sync();
        assert_eq!(query.to_wire().unwrap(), json!([138, [[15, ["users"]]]]));
    }

    #[test]
    fn test_insert_with_options() {
        let query = table("users")
            .insert(json!({"name": "Alice"}))
            .opt("conflict", "replace")
            .opt("return_changes", true);
        assert_eq!(
            query.to_wire().unwrap(),
            json!([56, [[15, ["users"]], {"name": "Alice"}],
                {"conflict": "replace", "return_changes": true}])
        );
    }

    #[test]
    fn test_variadic_methods_spread_vectors() {
        let query = table("users").pluck(vec!["name", "email"]);
        assert_eq!(
            query.to_wire().unwrap(),
            json!([33, [[15, ["users"]], "name", "email"]])
        );
    }

    #[test]
    fn test_expr() {
        assert_eq!(expr(5).to_wire().unwrap(), json!(5));
        assert_eq!(expr(vec![1, 2]).to_wire().unwrap(), json!([2, [1, 2]]));
        assert_eq!(
            expr(json!({"a": [1]})).to_wire().unwrap(),
            json!({"a": [2, [1]]})
        );
        let users = table("users");
        assert!(expr(&users).same_node(&users));
    }

    #[test]
    fn test_expr_object_keeps_document_keys() {
        let term = expr(json!({"": 1, "a b": 2}));
        assert_eq!(term.term_type(), TermType::Datum);
        assert_eq!(term.to_wire().unwrap(), json!({"": 1, "a b": 2}));
    }

    #[test]
    fn test_eq_method_builds_term_and_operator_compares() {
        let age = row().get_field("age");
        let cmp = age.eq(30);
        assert_eq!(cmp.term_type(), TermType::Eq);
        assert!(age == row().get_field("age"));
        assert!(age != cmp);
    }

    #[test]
    fn test_order_by_desc_with_index() {
        let query = table("posts").order_by(desc("created_at")).opt("index", "date");
        assert_eq!(
            query.to_wire().unwrap(),
            json!([41, [[15, ["posts"]], [74, ["created_at"]]], {"index": "date"}])
        );
    }

    #[test]
    fn test_comparison_chain() {
        let query = row().get_field("age").ge(18).and(vec![row().get_field("active")]);
        assert_eq!(
            query.to_wire().unwrap(),
            json!([67, [[22, [[31, [[13, []], "age"]], 18]], [31, [[13, []], "active"]]]])
        );
    }
}
