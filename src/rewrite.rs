//! The entry point the host calls for every statement before planning it.

use tracing::{debug, info, warn};

use crate::ddl::{inject_condition_column, inject_condition_target};
use crate::error::Result;
use crate::expr::{Catalog, CreateTable, CreateTableAs, Query};
use crate::operator::{registry, Registry};
use crate::settings::Settings;
use crate::synthesize::Synthesizer;
use crate::translate::Translator;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Query),
    CreateTable(CreateTable),
    CreateTableAs(CreateTableAs),
    /// Anything else, handed back untouched.
    Other(String),
}

pub struct Rewriter<'c, C: Catalog> {
    catalog: &'c C,
    registry: &'static Registry,
    condition_column: String,
}

impl<'c, C: Catalog> Rewriter<'c, C> {
    pub fn new(catalog: &'c C, settings: &Settings) -> Self {
        Self {
            catalog,
            registry: registry(),
            condition_column: settings.condition_column.clone(),
        }
    }
    pub fn condition_column(&self) -> &str {
        &self.condition_column
    }

    fn synthesizer(&self) -> Synthesizer<'_, C> {
        Synthesizer::new(self.catalog, &self.condition_column, Translator::new(self.registry))
    }

    /// Rewrites one statement. On error nothing is returned, so the host
    /// either gets a complete rewrite or none at all.
    pub fn rewrite(&self, statement: &Statement) -> Result<Statement> {
        let rewritten = match statement {
            Statement::Select(query) => self.rewrite_select(query).map(Statement::Select),
            Statement::CreateTable(table) => {
                inject_condition_column(table, &self.condition_column).map(Statement::CreateTable)
            }
            Statement::CreateTableAs(statement) => {
                debug!(table = %statement.name, "rewriting CREATE TABLE AS");
                inject_condition_target(statement, &self.synthesizer(), &self.condition_column)
                    .map(Statement::CreateTableAs)
            }
            Statement::Other(_) => Ok(statement.clone()),
        };
        if let Err(e) = &rewritten {
            warn!(error = %e, "statement rejected");
        }
        rewritten
    }

    pub fn rewrite_select(&self, query: &Query) -> Result<Query> {
        if query.range_table.is_empty() && query.filter.is_none() {
            return Ok(query.clone());
        }
        let rewritten = self.synthesizer().rewrite(query)?;
        if let Some(target) = rewritten.target(&self.condition_column) {
            info!(condition = %target.expr, "condition column");
        }
        Ok(rewritten)
    }
}
