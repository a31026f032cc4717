//! Materializes a condition expression into the gate of one row.

use std::collections::HashMap;

use crate::circuit;
use crate::error::{ProbsqlError, Result};
use crate::expr::{ColumnRef, Expr, Literal, SqlType};
use crate::gate::Gate;
use crate::operator::Registry;
use crate::OtherHasher;

/// The gate values of one row, keyed by range table position, then column.
#[derive(Debug, Default, Clone)]
pub struct Row {
    values: HashMap<usize, HashMap<String, Gate, OtherHasher>, OtherHasher>,
}
impl Row {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn bind(&mut self, range_index: usize, name: &str, gate: Gate) -> &mut Self {
        self.values
            .entry(range_index)
            .or_default()
            .insert(name.to_string(), gate);
        self
    }
    pub fn get(&self, column: &ColumnRef) -> Option<&Gate> {
        self.values
            .get(&column.range_index)
            .and_then(|columns| columns.get(column.name.as_str()))
    }
}

pub fn evaluate(expr: &Expr, row: &Row, registry: &Registry) -> Result<Gate> {
    match expr {
        Expr::Column(column) => row
            .get(column)
            .cloned()
            .ok_or_else(|| ProbsqlError::Lookup(format!("no value bound for column {}", column))),
        Expr::Literal(literal) => literal_gate(literal),
        Expr::Coerce { expr, target: SqlType::Gate } => match expr.as_ref() {
            Expr::Literal(Literal::Text(text)) => circuit::parse(text),
            inner => evaluate(inner, row, registry),
        },
        Expr::BinaryOp { op, left, right } => match registry.composition_for(*op) {
            Some(composition) => Gate::combine(
                evaluate(left, row, registry)?,
                evaluate(right, row, registry)?,
                composition,
            ),
            None => Err(ProbsqlError::UnsupportedConstruct(format!(
                "untranslated comparison {}",
                expr
            ))),
        },
        Expr::Function { name, args, .. } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, row, registry))
                .collect::<Result<Vec<_>>>()?;
            registry.apply(name, args)
        }
        other => Err(ProbsqlError::UnsupportedConstruct(format!(
            "cannot evaluate {} to a gate: {}",
            other.kind(),
            other
        ))),
    }
}

fn literal_gate(literal: &Literal) -> Result<Gate> {
    match literal {
        Literal::Gate(gate) => Ok(gate.clone()),
        Literal::Integer(i) => Ok(Gate::constant(*i as f64)),
        Literal::Float(x) => Ok(Gate::constant(*x)),
        other => Err(ProbsqlError::TypeMismatch(format!("{} is not a gate", other))),
    }
}
