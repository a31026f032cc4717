// used to derive the structured persistence encoding
use serde::{Deserialize, Serialize};

// our own stuff that we need
use crate::error::{ProbsqlError, Result};

// ------------- Distribution -------------
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    Gaussian { mean: f64, stddev: f64 },
    Poisson { lambda: f64 },
}

// ------------- Operators -------------
/// How two probability variables are composed. The last four are aggregate
/// compositions, kept apart so aggregation can treat them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Composition {
    Plus,
    Minus,
    Times,
    Divide,
    Max,
    Min,
    Count,
    Sum,
}
impl Composition {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Max | Self::Min | Self::Count | Self::Sum)
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Max => "max",
            Self::Min => "min",
            Self::Count => "count",
            Self::Sum => "sum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    LessThanOrEqual,
    LessThan,
    MoreThanOrEqual,
    MoreThan,
    EqualTo,
    NotEqualTo,
}
impl Comparator {
    /// The comparator that holds exactly when this one does not.
    pub fn complement(&self) -> Self {
        match self {
            Self::LessThanOrEqual => Self::MoreThan,
            Self::MoreThan => Self::LessThanOrEqual,
            Self::LessThan => Self::MoreThanOrEqual,
            Self::MoreThanOrEqual => Self::LessThan,
            Self::EqualTo => Self::NotEqualTo,
            Self::NotEqualTo => Self::EqualTo,
        }
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::LessThanOrEqual => "<=",
            Self::LessThan => "<",
            Self::MoreThanOrEqual => ">=",
            Self::MoreThan => ">",
            Self::EqualTo => "==",
            Self::NotEqualTo => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
}
impl Connective {
    pub fn dual(&self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    Comparator(Comparator),
    Boolean(Connective),
}
impl ConditionKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Comparator(comparator) => comparator.symbol(),
            Self::Boolean(connective) => connective.symbol(),
        }
    }
}

// ------------- Composite variable -------------
// The fields are private so that a composite can only come out of
// Gate::combine, which checks the operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeVariable {
    op: Composition,
    left: Box<Gate>,
    right: Box<Gate>,
}
impl CompositeVariable {
    pub fn op(&self) -> Composition {
        self.op
    }
    pub fn left(&self) -> &Gate {
        &self.left
    }
    pub fn right(&self) -> &Gate {
        &self.right
    }
}

// ------------- Condition -------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    kind: ConditionKind,
    left: Box<Gate>,
    right: Box<Gate>,
}
impl Condition {
    pub fn kind(&self) -> ConditionKind {
        self.kind
    }
    pub fn left(&self) -> &Gate {
        &self.left
    }
    pub fn right(&self) -> &Gate {
        &self.right
    }
    fn negate(self) -> Result<Condition> {
        let Condition { kind, left, right } = self;
        match kind {
            ConditionKind::Comparator(comparator) => Ok(Condition {
                kind: ConditionKind::Comparator(comparator.complement()),
                left,
                right,
            }),
            // De Morgan
            ConditionKind::Boolean(connective) => Ok(Condition {
                kind: ConditionKind::Boolean(connective.dual()),
                left: Box::new(left.negate()?),
                right: Box::new(right.negate()?),
            }),
        }
    }
}

// ------------- Gate -------------
/// A node in a probabilistic expression tree: either a random variable
/// (base or composite) or a condition over random variables.
///
/// Every non-leaf gate owns its two children, so a gate is always a strict
/// tree. Conditions and composites are only built through the combinators
/// below, which reject operands of the wrong kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    BaseVariable(Distribution),
    CompositeVariable(CompositeVariable),
    Condition(Condition),
    PlaceholderTrue,
}

impl Gate {
    pub fn gaussian(mean: f64, stddev: f64) -> Self {
        Gate::BaseVariable(Distribution::Gaussian { mean, stddev })
    }
    pub fn poisson(lambda: f64) -> Self {
        Gate::BaseVariable(Distribution::Poisson { lambda })
    }
    /// A literal is a gaussian without variance.
    pub fn constant(value: f64) -> Self {
        Self::gaussian(value, 0.0)
    }
    pub fn placeholder_true() -> Self {
        Gate::PlaceholderTrue
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Gate::BaseVariable(_) | Gate::CompositeVariable(_))
    }
    pub fn is_condition(&self) -> bool {
        matches!(self, Gate::Condition(_) | Gate::PlaceholderTrue)
    }

    pub fn combine(left: Gate, right: Gate, op: Composition) -> Result<Gate> {
        require_variable(&left)?;
        require_variable(&right)?;
        Ok(Gate::CompositeVariable(CompositeVariable {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    pub fn compare(left: Gate, right: Gate, kind: ConditionKind) -> Result<Gate> {
        if let ConditionKind::Boolean(connective) = kind {
            return Err(ProbsqlError::TypeMismatch(format!(
                "'{}' is not a comparator",
                connective.symbol()
            )));
        }
        require_variable(&left)?;
        require_variable(&right)?;
        Ok(Gate::Condition(Condition {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// Joins two conditions with a boolean connective. TRUE is the identity
    /// of And and absorbs Or.
    pub fn conjoin(left: Gate, right: Gate, kind: ConditionKind) -> Result<Gate> {
        let connective = match kind {
            ConditionKind::Boolean(connective) => connective,
            ConditionKind::Comparator(comparator) => {
                return Err(ProbsqlError::TypeMismatch(format!(
                    "'{}' is not a boolean connective",
                    comparator.symbol()
                )));
            }
        };
        require_condition(&left)?;
        require_condition(&right)?;
        match (connective, left, right) {
            (Connective::And, Gate::PlaceholderTrue, other)
            | (Connective::And, other, Gate::PlaceholderTrue) => Ok(other),
            (Connective::Or, Gate::PlaceholderTrue, _) | (Connective::Or, _, Gate::PlaceholderTrue) => {
                Ok(Gate::PlaceholderTrue)
            }
            (connective, left, right) => Ok(Gate::Condition(Condition {
                kind: ConditionKind::Boolean(connective),
                left: Box::new(left),
                right: Box::new(right),
            })),
        }
    }

    /// Logical complement of a condition. Consumes the gate, so nothing can
    /// hold on to a half negated tree.
    pub fn negate(self) -> Result<Gate> {
        match self {
            Gate::Condition(condition) => Ok(Gate::Condition(condition.negate()?)),
            Gate::PlaceholderTrue => Err(ProbsqlError::TypeMismatch(
                "cannot negate TRUE, there is no false placeholder".to_string(),
            )),
            other => Err(ProbsqlError::TypeMismatch(format!(
                "cannot negate {}, it is not a condition",
                other
            ))),
        }
    }

    /// Checks the invariants the combinators enforce, for trees that did not
    /// come out of them (decoded ones).
    pub fn validate(&self) -> Result<()> {
        match self {
            Gate::BaseVariable(_) | Gate::PlaceholderTrue => Ok(()),
            Gate::CompositeVariable(composite) => {
                require_variable(composite.left())?;
                require_variable(composite.right())?;
                composite.left().validate()?;
                composite.right().validate()
            }
            Gate::Condition(condition) => {
                match condition.kind() {
                    ConditionKind::Comparator(_) => {
                        require_variable(condition.left())?;
                        require_variable(condition.right())?;
                    }
                    // conjoin folds TRUE away, so it never sits under a connective
                    ConditionKind::Boolean(_) => {
                        for child in [condition.left(), condition.right()] {
                            require_condition(child)?;
                            if *child == Gate::PlaceholderTrue {
                                return Err(ProbsqlError::TypeMismatch(format!(
                                    "TRUE cannot be an operand of {}",
                                    condition.kind().symbol()
                                )));
                            }
                        }
                    }
                }
                condition.left().validate()?;
                condition.right().validate()
            }
        }
    }
}

fn require_variable(gate: &Gate) -> Result<()> {
    if gate.is_variable() {
        Ok(())
    } else {
        Err(ProbsqlError::TypeMismatch(format!(
            "{} is not a probability variable",
            gate
        )))
    }
}

fn require_condition(gate: &Gate) -> Result<()> {
    if gate.is_condition() {
        Ok(())
    } else {
        Err(ProbsqlError::TypeMismatch(format!("{} is not a condition", gate)))
    }
}
