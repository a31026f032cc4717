// Table definitions that hold gates get the reserved condition column.

use tracing::debug;

use crate::error::{ProbsqlError, Result};
use crate::expr::{Catalog, ColumnDef, CreateTable, CreateTableAs, Expr, Literal, SqlType};
use crate::gate::Gate;
use crate::synthesize::Synthesizer;

fn placeholder_true() -> Expr {
    Expr::Literal(Literal::Gate(Gate::placeholder_true()))
}

/// Adds the condition column, defaulted to TRUE, to a table that has a gate
/// column and lacks it. Applying this twice changes nothing.
pub fn inject_condition_column(table: &CreateTable, condition_column: &str) -> Result<CreateTable> {
    if let Some(existing) = table.column(condition_column) {
        if existing.data_type != SqlType::Gate {
            return Err(ProbsqlError::TypeMismatch(format!(
                "column {} of {} is reserved for gate conditions, not {}",
                condition_column, table.name, existing.data_type
            )));
        }
        return Ok(table.clone());
    }
    if !table.columns.iter().any(|c| c.data_type == SqlType::Gate) {
        return Ok(table.clone());
    }
    let mut rewritten = table.clone();
    rewritten.columns.push(ColumnDef {
        name: condition_column.to_string(),
        data_type: SqlType::Gate,
        default: Some(placeholder_true()),
    });
    debug!(table = %table.name, column = condition_column, "condition column added");
    Ok(rewritten)
}

/// CREATE TABLE AS keeps the conditions of the rows it copies. Gate columns
/// made up of bare literals or casts have no condition to copy and are
/// rejected.
pub fn inject_condition_target<C: Catalog>(
    statement: &CreateTableAs,
    synthesizer: &Synthesizer<'_, C>,
    condition_column: &str,
) -> Result<CreateTableAs> {
    let gate_targets: Vec<_> = statement
        .query
        .target_list
        .iter()
        .filter(|t| !t.junk && t.name.as_deref() != Some(condition_column))
        .filter(|t| t.expr.data_type() == SqlType::Gate)
        .collect();
    if gate_targets.is_empty() {
        return Ok(statement.clone());
    }
    if let Some(target) = gate_targets
        .iter()
        .find(|t| matches!(t.expr, Expr::Literal(_) | Expr::Coerce { .. }))
    {
        return Err(ProbsqlError::UnsupportedConstruct(format!(
            "gate {} {} in CREATE TABLE AS {}",
            target.expr.kind(),
            target.expr,
            statement.name
        )));
    }

    let mut query = synthesizer.rewrite(&statement.query)?;
    if query.target(condition_column).is_none() {
        query.push_target(placeholder_true(), condition_column);
    }
    Ok(CreateTableAs { name: statement.name.clone(), query })
}
