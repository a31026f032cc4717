//! Text forms of a gate.
//!
//! The printed form is fully parenthesized infix meant for display, e.g.
//! `(gaussian(1.00, 2.00))+(poisson(3.00))`. The literal reader only accepts
//! leaves (`gaussian(a, b)`, `poisson(a)` or a bare number), so printing and
//! parsing round-trip for leaves alone. Whole trees are persisted with the
//! JSON encoding instead.

// used to print out readable forms of a gate
use std::fmt;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::trace;

use crate::error::{ProbsqlError, Result};
use crate::gate::{Distribution, Gate};

#[derive(Parser)]
#[grammar = "circuit.pest"]
struct CircuitParser;

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Gate::BaseVariable(Distribution::Gaussian { mean, stddev }) => {
                write!(f, "gaussian({:.2}, {:.2})", mean, stddev)
            }
            Gate::BaseVariable(Distribution::Poisson { lambda }) => {
                write!(f, "poisson({:.2})", lambda)
            }
            Gate::CompositeVariable(composite) => write!(
                f,
                "({}){}({})",
                composite.left(),
                composite.op().symbol(),
                composite.right()
            ),
            Gate::Condition(condition) => write!(
                f,
                "({}){}({})",
                condition.left(),
                condition.kind().symbol(),
                condition.right()
            ),
            Gate::PlaceholderTrue => write!(f, "TRUE"),
        }
    }
}

pub fn print(gate: &Gate) -> String {
    gate.to_string()
}

pub fn parse(text: &str) -> Result<Gate> {
    let unrecognised = || ProbsqlError::Lookup(format!("unrecognised gate literal '{}'", text));
    let literal = CircuitParser::parse(Rule::literal, text)
        .map_err(|_| unrecognised())?
        .next()
        .ok_or_else(unrecognised)?;
    let leaf = literal
        .into_inner()
        .find(|pair| pair.as_rule() != Rule::EOI)
        .ok_or_else(unrecognised)?;
    let gate = match leaf.as_rule() {
        Rule::gaussian => {
            let mut parameters = leaf.into_inner();
            let mean = number(parameters.next(), text)?;
            let stddev = number(parameters.next(), text)?;
            Gate::gaussian(mean, stddev)
        }
        Rule::poisson => Gate::poisson(number(leaf.into_inner().next(), text)?),
        Rule::number => Gate::constant(number(Some(leaf), text)?),
        _ => return Err(unrecognised()),
    };
    trace!(%text, %gate, "parsed gate literal");
    Ok(gate)
}

// overflowing numbers would print as inf, which cannot be read back
fn number(pair: Option<Pair<Rule>>, text: &str) -> Result<f64> {
    pair.and_then(|p| p.as_str().parse::<f64>().ok())
        .filter(|x| x.is_finite())
        .ok_or_else(|| ProbsqlError::Lookup(format!("unrecognised gate literal '{}'", text)))
}

/// Structured encoding of a whole gate tree.
pub fn encode(gate: &Gate) -> Result<String> {
    Ok(serde_json::to_string(gate)?)
}

/// Reads back an encoded gate and re-checks the tree invariants, since the
/// text may not have come from `encode`.
pub fn decode(text: &str) -> Result<Gate> {
    let gate: Gate = serde_json::from_str(text)?;
    gate.validate()?;
    Ok(gate)
}
