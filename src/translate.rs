//! Rewrites a classified predicate into calls of gate functions.
//!
//! `x1 < x2 AND NOT x3 = x4` becomes
//! `and_gate(less_than(x1, x2), negate(equal_to(x3, x4)))`. Arithmetic over
//! gates is already gate valued and is left alone, as are columns, literals
//! and coercions.

use tracing::trace;

use crate::error::{ProbsqlError, Result};
use crate::expr::{BoolOp, Expr, SqlType};
use crate::gate::Connective;
use crate::operator::{GateFunction, Registry};

pub struct Translator<'r> {
    registry: &'r Registry,
}

impl<'r> Translator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Translating nothing yields nothing.
    pub fn translate_opt(&self, expr: Option<Expr>) -> Result<Option<Expr>> {
        expr.map(|e| self.translate(e)).transpose()
    }

    pub fn translate(&self, expr: Expr) -> Result<Expr> {
        match expr {
            Expr::Column(_) | Expr::Literal(_) | Expr::Coerce { .. } => Ok(expr),
            Expr::BinaryOp { op, left, right } => match self.registry.comparator_for(op) {
                Some(comparator) => {
                    let name = self.registry.function_name(GateFunction::Compare(comparator))?;
                    let left = self.translate(*left)?;
                    let right = self.translate(*right)?;
                    Ok(gate_call(name, vec![left, right]))
                }
                None => Ok(Expr::BinaryOp { op, left, right }),
            },
            Expr::Not(inner) => {
                let name = self.registry.function_name(GateFunction::Negate)?;
                Ok(gate_call(name, vec![self.translate(*inner)?]))
            }
            Expr::Bool { op, args } => self.fold(op, args),
            // our own output passes through, so translating twice is harmless
            Expr::Function { ref name, return_type: SqlType::Gate, .. }
                if self.registry.is_gate_function(name) =>
            {
                Ok(expr)
            }
            other => Err(ProbsqlError::UnsupportedConstruct(format!(
                "cannot translate {} into a gate: {}",
                other.kind(),
                other
            ))),
        }
    }

    // left fold: f(f(f(a, b), c), d)
    fn fold(&self, op: BoolOp, args: Vec<Expr>) -> Result<Expr> {
        let connective = match op {
            BoolOp::And => Connective::And,
            BoolOp::Or => Connective::Or,
        };
        let name = self.registry.function_name(GateFunction::Conjoin(connective))?;
        let mut args = args.into_iter();
        let mut folded = match args.next() {
            Some(first) => self.translate(first)?,
            None => {
                return Err(ProbsqlError::UnsupportedConstruct(format!(
                    "{} without arguments",
                    op
                )));
            }
        };
        for arg in args {
            folded = gate_call(name, vec![folded, self.translate(arg)?]);
        }
        trace!(%folded, "folded connective");
        Ok(folded)
    }
}

fn gate_call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::function(name, args, SqlType::Gate)
}
