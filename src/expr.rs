//! The host engine's view of a statement, as far as the rewrite needs it.
//!
//! A filter or target list arrives as a typed [`Expr`] tree. Tables arrive
//! as [`RangeTableEntry`] values carrying the stable [`RelationId`] of the
//! relation they scan, and the [`Catalog`] answers whether a relation carries
//! the reserved condition column.

use std::collections::HashMap;
use std::fmt;

use crate::gate::Gate;
use crate::OtherHasher;

// ------------- Types -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Gate,
    Integer,
    Float,
    Text,
    Boolean,
}
impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SqlType::Gate => "gate",
            SqlType::Integer => "integer",
            SqlType::Float => "float",
            SqlType::Text => "text",
            SqlType::Boolean => "boolean",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null(SqlType),
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Gate(Gate),
}
impl Literal {
    pub fn data_type(&self) -> SqlType {
        match self {
            Literal::Null(data_type) => *data_type,
            Literal::Integer(_) => SqlType::Integer,
            Literal::Float(_) => SqlType::Float,
            Literal::Text(_) => SqlType::Text,
            Literal::Boolean(_) => SqlType::Boolean,
            Literal::Gate(_) => SqlType::Gate,
        }
    }
}
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Null(_) => write!(f, "NULL"),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Gate(gate) => write!(f, "'{}'", gate),
        }
    }
}

// ------------- Column reference -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// 1-based position of the scanned table in the query's range table.
    pub range_index: usize,
    /// Alias the column was qualified with, only used for display.
    pub qualifier: Option<String>,
    pub name: String,
    pub data_type: SqlType,
}
impl ColumnRef {
    pub fn new(range_index: usize, name: &str, data_type: SqlType) -> Self {
        Self {
            range_index,
            qualifier: None,
            name: name.to_string(),
            data_type,
        }
    }
    pub fn qualified(mut self, qualifier: &str) -> Self {
        self.qualifier = Some(qualifier.to_string());
        self
    }
}
impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}.{}", qualifier, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// ------------- Operators -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
}
impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::Eq | Self::NotEq
        )
    }
}
impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "=",
            Self::NotEq => "<>",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}
impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "AND"),
            BoolOp::Or => write!(f, "OR"),
        }
    }
}

// ------------- Expression -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    /// Explicit cast, e.g. `'poisson(3)'::gate`.
    Coerce { expr: Box<Expr>, target: SqlType },
    BinaryOp { op: BinaryOperator, left: Box<Expr>, right: Box<Expr> },
    Not(Box<Expr>),
    Bool { op: BoolOp, args: Vec<Expr> },
    Function { name: String, args: Vec<Expr>, return_type: SqlType },
    IsNull(Box<Expr>),
    InList { expr: Box<Expr>, list: Vec<Expr>, negated: bool },
}

impl Expr {
    pub fn column(range_index: usize, name: &str, data_type: SqlType) -> Self {
        Expr::Column(ColumnRef::new(range_index, name, data_type))
    }
    pub fn literal(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
    pub fn text(s: &str) -> Self {
        Expr::Literal(Literal::Text(s.to_string()))
    }
    pub fn coerce(expr: Expr, target: SqlType) -> Self {
        Expr::Coerce { expr: Box::new(expr), target }
    }
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp { op, left: Box::new(left), right: Box::new(right) }
    }
    pub fn and(args: Vec<Expr>) -> Self {
        Expr::Bool { op: BoolOp::And, args }
    }
    pub fn or(args: Vec<Expr>) -> Self {
        Expr::Bool { op: BoolOp::Or, args }
    }
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }
    pub fn function(name: &str, args: Vec<Expr>, return_type: SqlType) -> Self {
        Expr::Function { name: name.to_string(), args, return_type }
    }

    pub fn data_type(&self) -> SqlType {
        match self {
            Expr::Column(column) => column.data_type,
            Expr::Literal(literal) => literal.data_type(),
            Expr::Coerce { target, .. } => *target,
            Expr::BinaryOp { op, left, right } => {
                if op.is_comparison() {
                    SqlType::Boolean
                } else if left.data_type() == SqlType::Gate || right.data_type() == SqlType::Gate {
                    SqlType::Gate
                } else {
                    left.data_type()
                }
            }
            Expr::Function { return_type, .. } => *return_type,
            Expr::Not(_) | Expr::Bool { .. } | Expr::IsNull(_) | Expr::InList { .. } => {
                SqlType::Boolean
            }
        }
    }

    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Column(_) => "column reference",
            Expr::Literal(_) => "literal",
            Expr::Coerce { .. } => "coercion",
            Expr::BinaryOp { .. } => "operator",
            Expr::Not(_) => "NOT",
            Expr::Bool { op: BoolOp::And, .. } => "AND",
            Expr::Bool { op: BoolOp::Or, .. } => "OR",
            Expr::Function { .. } => "function call",
            Expr::IsNull(_) => "IS NULL",
            Expr::InList { .. } => "IN list",
        }
    }
}

// compound operands are parenthesized
fn fmt_operand(expr: &Expr, f: &mut fmt::Formatter) -> fmt::Result {
    match expr {
        Expr::BinaryOp { .. } | Expr::Bool { .. } | Expr::Not(_) => write!(f, "({})", expr),
        _ => write!(f, "{}", expr),
    }
}

fn fmt_list(exprs: &[Expr], separator: &str, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", expr)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Column(column) => write!(f, "{}", column),
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::Coerce { expr, target } => {
                fmt_operand(expr, f)?;
                write!(f, "::{}", target)
            }
            Expr::BinaryOp { op, left, right } => {
                fmt_operand(left, f)?;
                write!(f, " {} ", op)?;
                fmt_operand(right, f)
            }
            Expr::Not(expr) => {
                write!(f, "NOT ")?;
                fmt_operand(expr, f)
            }
            Expr::Bool { op, args } => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op)?;
                    }
                    fmt_operand(arg, f)?;
                }
                Ok(())
            }
            Expr::Function { name, args, .. } => {
                write!(f, "{}(", name)?;
                fmt_list(args, ", ", f)?;
                write!(f, ")")
            }
            Expr::IsNull(expr) => {
                fmt_operand(expr, f)?;
                write!(f, " IS NULL")
            }
            Expr::InList { expr, list, negated } => {
                fmt_operand(expr, f)?;
                write!(f, "{} IN (", if *negated { " NOT" } else { "" })?;
                fmt_list(list, ", ", f)?;
                write!(f, ")")
            }
        }
    }
}

// ------------- Query -------------
/// Stable identity of a physical relation, the same for every alias of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct RangeTableEntry {
    pub alias: String,
    /// None for entries that do not scan a relation (joins, subqueries).
    pub relation: Option<RelationId>,
}
impl RangeTableEntry {
    pub fn relation(alias: &str, relation: RelationId) -> Self {
        Self { alias: alias.to_string(), relation: Some(relation) }
    }
    pub fn derived(alias: &str) -> Self {
        Self { alias: alias.to_string(), relation: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    pub expr: Expr,
    /// 1-based output position.
    pub resno: usize,
    pub name: Option<String>,
    /// Carried for the planner but not returned to the client.
    pub junk: bool,
}
impl TargetEntry {
    pub fn new(expr: Expr, resno: usize, name: &str) -> Self {
        Self { expr, resno, name: Some(name.to_string()), junk: false }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub range_table: Vec<RangeTableEntry>,
    pub filter: Option<Expr>,
    pub target_list: Vec<TargetEntry>,
}
impl Query {
    /// Appends an output column at the next position.
    pub fn push_target(&mut self, expr: Expr, name: &str) {
        let resno = self.target_list.len() + 1;
        self.target_list.push(TargetEntry::new(expr, resno, name));
    }
    pub fn target(&self, name: &str) -> Option<&TargetEntry> {
        self.target_list.iter().find(|t| t.name.as_deref() == Some(name))
    }
}

// ------------- Table definitions -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: SqlType,
    pub default: Option<Expr>,
}
impl ColumnDef {
    pub fn new(name: &str, data_type: SqlType) -> Self {
        Self { name: name.to_string(), data_type, default: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}
impl CreateTable {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableAs {
    pub name: String,
    pub query: Query,
}

// ------------- Catalog -------------
/// What the rewrite needs to know about relations from the host.
pub trait Catalog {
    fn carries_condition_column(&self, relation: RelationId) -> bool;
}

/// A catalog kept in memory, mostly for embedding and tests.
#[derive(Debug)]
pub struct MemoryCatalog {
    condition_column: String,
    tables: HashMap<RelationId, CreateTable, OtherHasher>,
    next_relation: u32,
}
impl MemoryCatalog {
    pub fn new(condition_column: &str) -> Self {
        Self {
            condition_column: condition_column.to_string(),
            tables: HashMap::default(),
            next_relation: 0,
        }
    }
    /// Registers a table definition as given and returns its identity.
    pub fn define(&mut self, table: CreateTable) -> RelationId {
        self.next_relation += 1;
        let relation = RelationId(self.next_relation);
        self.tables.insert(relation, table);
        relation
    }
    pub fn table(&self, relation: RelationId) -> Option<&CreateTable> {
        self.tables.get(&relation)
    }
    pub fn len(&self) -> usize {
        self.tables.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
impl Catalog for MemoryCatalog {
    fn carries_condition_column(&self, relation: RelationId) -> bool {
        self.tables
            .get(&relation)
            .and_then(|table| table.column(&self.condition_column))
            .is_some_and(|column| column.data_type == SqlType::Gate)
    }
}
