//! probsql – gates and row conditions for probabilistic columns.
//!
//! A *gate* is a value of the probabilistic column type. It is either a random
//! variable or a condition over random variables:
//! * A base variable names a distribution (`gaussian(mean, stddev)`,
//!   `poisson(lambda)`); a plain number is a gaussian without variance.
//! * A composite variable combines two variables arithmetically (or by an
//!   aggregate such as max or sum).
//! * A condition compares two variables, or joins two conditions with and/or.
//! * `TRUE` is the condition every probabilistic row starts out with.
//!
//! Every table holding gates carries one reserved *condition column* with the
//! gate that must hold for the row to exist. Filtering and joining change what
//! must hold, so each SELECT regenerates the column from the conditions of the
//! tables it reads and the part of its filter that involves gates.
//!
//! ## Modules
//! * [`gate`] – The [`gate::Gate`] tree and its combinators.
//! * [`circuit`] – Printed form, literal parsing (grammar in `circuit.pest`)
//!   and JSON encoding of gates.
//! * [`operator`] – Operator tokens and gate function identifiers.
//! * [`expr`] – The host's typed expression trees, queries and catalog.
//! * [`classify`], [`translate`], [`synthesize`] – The three stages of the
//!   SELECT rewrite.
//! * [`ddl`] – Condition column injection for CREATE TABLE (AS).
//! * [`rewrite`] – The per-statement entry point.
//! * [`evaluate`] – Turns a condition expression into the gate of one row.
//! * [`settings`] – Configuration and logging setup.
//!
//! ## Quick Start
//! ```
//! use probsql::expr::{BinaryOperator, CreateTable, ColumnDef, Expr, MemoryCatalog,
//!     Query, RangeTableEntry, SqlType};
//! use probsql::rewrite::Rewriter;
//! use probsql::settings::Settings;
//! use probsql::ddl::inject_condition_column;
//!
//! let settings = Settings::default();
//! let mut catalog = MemoryCatalog::new(&settings.condition_column);
//! let table = CreateTable {
//!     name: "readings".into(),
//!     columns: vec![ColumnDef::new("x1", SqlType::Gate), ColumnDef::new("x2", SqlType::Gate)],
//! };
//! let readings = catalog.define(inject_condition_column(&table, &settings.condition_column).unwrap());
//!
//! let mut query = Query::default();
//! query.range_table.push(RangeTableEntry::relation("r", readings));
//! query.filter = Some(Expr::binary(
//!     BinaryOperator::Lt,
//!     Expr::column(1, "x1", SqlType::Gate),
//!     Expr::column(1, "x2", SqlType::Gate),
//! ));
//!
//! let rewritten = Rewriter::new(&catalog, &settings).rewrite_select(&query).unwrap();
//! let condition = rewritten.target(&settings.condition_column).unwrap();
//! assert_eq!(condition.expr.to_string(), "and_gate(r.__condition, less_than(x1, x2))");
//! ```

use std::hash::BuildHasherDefault;
use seahash::SeaHasher;

pub mod circuit;
pub mod classify;
pub mod ddl;
pub mod error;
pub mod evaluate;
pub mod expr;
pub mod gate;
pub mod operator;
pub mod rewrite;
pub mod settings;
pub mod synthesize;
pub mod translate;

pub use error::{ProbsqlError, Result};
pub use gate::Gate;

// we will use a fast hashing algo for hashmaps and hashsets
pub type OtherHasher = BuildHasherDefault<SeaHasher>;
