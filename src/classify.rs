//! Finds the part of a filter that says something about gate columns.
//!
//! The host filter is enforced row by row before the condition column is
//! computed, so any deterministic part of it has already done its job. What
//! remains is the part that touches gates, and that is what gets carried
//! along symbolically. Arithmetic, comparisons and NOT cannot be split
//! without changing their meaning and are kept whole once relevant. AND and
//! OR are split: irrelevant arguments are dropped and a connective left with
//! a single argument collapses into it.

use tracing::trace;

use crate::error::{ProbsqlError, Result};
use crate::expr::{Expr, SqlType};

/// Returns the gate-relevant part of `expr`, or None if nothing in it
/// touches a gate. The input is left untouched.
pub fn classify(expr: &Expr) -> Result<Option<Expr>> {
    let pruned = match expr {
        Expr::Column(_) | Expr::Literal(_) => (expr.data_type() == SqlType::Gate).then(|| expr.clone()),
        // relevance follows the target type, but opaque calls inside still fail
        Expr::Coerce { expr: inner, target } => {
            classify(inner)?;
            (*target == SqlType::Gate).then(|| expr.clone())
        }
        Expr::BinaryOp { left, right, .. } => {
            let left = classify(left)?;
            let right = classify(right)?;
            (left.is_some() || right.is_some()).then(|| expr.clone())
        }
        Expr::Not(inner) => classify(inner)?.map(|_| expr.clone()),
        Expr::Bool { op, args } => {
            let mut relevant = Vec::new();
            for arg in args {
                if let Some(pruned) = classify(arg)? {
                    relevant.push(pruned);
                }
            }
            match relevant.len() {
                0 => None,
                1 => relevant.pop(),
                _ => Some(Expr::Bool { op: *op, args: relevant }),
            }
        }
        Expr::Function { name, .. } => {
            return Err(ProbsqlError::UnsupportedConstruct(format!(
                "cannot tell whether function {}() involves a gate",
                name
            )));
        }
        Expr::IsNull(_) | Expr::InList { .. } => {
            return Err(ProbsqlError::UnsupportedConstruct(format!(
                "{} in filter: {}",
                expr.kind(),
                expr
            )));
        }
    };
    trace!(%expr, relevant = pruned.is_some(), "classified");
    Ok(pruned)
}

/// Classifies an optional filter; a query without one has nothing to prune.
pub fn classify_filter(filter: Option<&Expr>) -> Result<Option<Expr>> {
    match filter {
        Some(expr) => classify(expr),
        None => Ok(None),
    }
}
