//! Operator tokens and gate function identifiers.
//!
//! The host refers to operators by name (`"PLUS"`, `"LESS_THAN"`, `"AND"`)
//! and the translator refers to gate functions by identifier
//! (`less_than`, `and_gate`, `negate`). Both tables live in one read-only
//! [`Registry`] that is built the first time it is asked for.

// used to keep the one-to-one mapping between names and operators
use bimap::BiMap;
use lazy_static::lazy_static;
use tracing::debug;

use crate::error::{ProbsqlError, Result};
use crate::expr::BinaryOperator;
use crate::gate::{Comparator, Composition, ConditionKind, Connective, Gate};

pub const NEGATE: &str = "negate";

/// What an operator token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Composition(Composition),
    Condition(ConditionKind),
}

/// What a gate function identifier stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateFunction {
    Compare(Comparator),
    Conjoin(Connective),
    Negate,
}

pub struct Registry {
    tokens: BiMap<&'static str, Operator>,
    functions: BiMap<&'static str, GateFunction>,
}

lazy_static! {
    static ref REGISTRY: Registry = Registry::new();
}

/// The shared registry. Building it more than once is never observable.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

impl Registry {
    pub fn new() -> Self {
        let mut tokens = BiMap::new();
        tokens.insert("PLUS", Operator::Composition(Composition::Plus));
        tokens.insert("MINUS", Operator::Composition(Composition::Minus));
        tokens.insert("TIMES", Operator::Composition(Composition::Times));
        tokens.insert("DIVIDE", Operator::Composition(Composition::Divide));
        for (token, comparator) in [
            ("LESS_THAN_OR_EQUAL", Comparator::LessThanOrEqual),
            ("LESS_THAN", Comparator::LessThan),
            ("MORE_THAN_OR_EQUAL", Comparator::MoreThanOrEqual),
            ("MORE_THAN", Comparator::MoreThan),
            ("EQUAL_TO", Comparator::EqualTo),
            ("NOT_EQUAL_TO", Comparator::NotEqualTo),
        ] {
            tokens.insert(token, Operator::Condition(ConditionKind::Comparator(comparator)));
        }
        tokens.insert("AND", Operator::Condition(ConditionKind::Boolean(Connective::And)));
        tokens.insert("OR", Operator::Condition(ConditionKind::Boolean(Connective::Or)));

        let mut functions = BiMap::new();
        for (name, comparator) in [
            ("less_than_or_equal", Comparator::LessThanOrEqual),
            ("less_than", Comparator::LessThan),
            ("more_than_or_equal", Comparator::MoreThanOrEqual),
            ("more_than", Comparator::MoreThan),
            ("equal_to", Comparator::EqualTo),
            ("not_equal_to", Comparator::NotEqualTo),
        ] {
            functions.insert(name, GateFunction::Compare(comparator));
        }
        functions.insert("and_gate", GateFunction::Conjoin(Connective::And));
        functions.insert("or_gate", GateFunction::Conjoin(Connective::Or));
        functions.insert(NEGATE, GateFunction::Negate);

        debug!(tokens = tokens.len(), functions = functions.len(), "operator registry built");
        Self { tokens, functions }
    }

    // ---------- tokens ----------
    pub fn operator(&self, token: &str) -> Result<Operator> {
        self.tokens
            .get_by_left(token)
            .copied()
            .ok_or_else(|| ProbsqlError::Lookup(format!("unrecognised operator '{}'", token)))
    }
    pub fn token(&self, operator: Operator) -> Option<&'static str> {
        self.tokens.get_by_right(&operator).copied()
    }

    // ---------- functions ----------
    pub fn function(&self, name: &str) -> Option<GateFunction> {
        self.functions.get_by_left(name).copied()
    }
    pub fn is_gate_function(&self, name: &str) -> bool {
        self.functions.contains_left(name)
    }
    pub fn function_name(&self, function: GateFunction) -> Result<&'static str> {
        self.functions
            .get_by_right(&function)
            .copied()
            .ok_or_else(|| ProbsqlError::Lookup(format!("no gate function for {:?}", function)))
    }

    /// The gate comparator a host comparison operator turns into, or None for
    /// arithmetic operators.
    pub fn comparator_for(&self, op: BinaryOperator) -> Option<Comparator> {
        match op {
            BinaryOperator::LtEq => Some(Comparator::LessThanOrEqual),
            BinaryOperator::Lt => Some(Comparator::LessThan),
            BinaryOperator::GtEq => Some(Comparator::MoreThanOrEqual),
            BinaryOperator::Gt => Some(Comparator::MoreThan),
            BinaryOperator::Eq => Some(Comparator::EqualTo),
            BinaryOperator::NotEq => Some(Comparator::NotEqualTo),
            _ => None,
        }
    }
    pub fn composition_for(&self, op: BinaryOperator) -> Option<Composition> {
        match op {
            BinaryOperator::Plus => Some(Composition::Plus),
            BinaryOperator::Minus => Some(Composition::Minus),
            BinaryOperator::Multiply => Some(Composition::Times),
            BinaryOperator::Divide => Some(Composition::Divide),
            _ => None,
        }
    }

    // ---------- host-facing entry points ----------
    pub fn combine_by_token(&self, left: Gate, right: Gate, token: &str) -> Result<Gate> {
        match self.operator(token)? {
            Operator::Composition(op) => Gate::combine(left, right, op),
            Operator::Condition(_) => Err(ProbsqlError::TypeMismatch(format!(
                "'{}' does not compose probability variables",
                token
            ))),
        }
    }
    pub fn compare_by_token(&self, left: Gate, right: Gate, token: &str) -> Result<Gate> {
        match self.operator(token)? {
            Operator::Condition(kind) => Gate::compare(left, right, kind),
            Operator::Composition(_) => Err(ProbsqlError::TypeMismatch(format!(
                "'{}' is not a comparator",
                token
            ))),
        }
    }
    pub fn conjoin_by_token(&self, left: Gate, right: Gate, token: &str) -> Result<Gate> {
        match self.operator(token)? {
            Operator::Condition(kind) => Gate::conjoin(left, right, kind),
            Operator::Composition(_) => Err(ProbsqlError::TypeMismatch(format!(
                "'{}' is not a boolean connective",
                token
            ))),
        }
    }

    /// Calls a gate function by identifier.
    pub fn apply(&self, name: &str, args: Vec<Gate>) -> Result<Gate> {
        let function = self
            .function(name)
            .ok_or_else(|| ProbsqlError::Lookup(format!("unrecognised gate function '{}'", name)))?;
        let expected = match function {
            GateFunction::Negate => 1,
            _ => 2,
        };
        if args.len() != expected {
            return Err(ProbsqlError::TypeMismatch(format!(
                "{} expects {} arguments, got {}",
                name,
                expected,
                args.len()
            )));
        }
        let mut args = args.into_iter();
        match (function, args.next(), args.next()) {
            (GateFunction::Negate, Some(condition), None) => condition.negate(),
            (GateFunction::Compare(comparator), Some(left), Some(right)) => {
                Gate::compare(left, right, ConditionKind::Comparator(comparator))
            }
            (GateFunction::Conjoin(connective), Some(left), Some(right)) => {
                Gate::conjoin(left, right, ConditionKind::Boolean(connective))
            }
            _ => Err(ProbsqlError::TypeMismatch(format!("bad arguments to {}", name))),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
