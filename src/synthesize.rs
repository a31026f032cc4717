//! Builds the condition column of a query's output.
//!
//! Every scanned relation that carries a condition column contributes that
//! column once, however many aliases it is scanned under. Together with the
//! translated predicate they are and-ed into one gate expression which
//! replaces whatever condition columns the target list already had.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::classify::classify_filter;
use crate::error::Result;
use crate::expr::{Catalog, ColumnRef, Expr, Query, RelationId, SqlType};
use crate::translate::Translator;
use crate::OtherHasher;

pub struct Synthesizer<'a, C: Catalog> {
    catalog: &'a C,
    condition_column: &'a str,
    translator: Translator<'a>,
}

impl<'a, C: Catalog> Synthesizer<'a, C> {
    pub fn new(catalog: &'a C, condition_column: &'a str, translator: Translator<'a>) -> Self {
        Self { catalog, condition_column, translator }
    }

    /// One reference to the condition column per distinct relation, in range
    /// table order. Later aliases of an already seen relation are skipped.
    pub fn contributors(&self, query: &Query) -> Vec<Expr> {
        let mut seen: HashSet<RelationId, OtherHasher> = HashSet::default();
        let mut contributors = Vec::new();
        for (position, entry) in query.range_table.iter().enumerate() {
            let Some(relation) = entry.relation else { continue };
            if !self.catalog.carries_condition_column(relation) {
                continue;
            }
            if !seen.insert(relation) {
                trace!(alias = %entry.alias, ?relation, "relation already contributes");
                continue;
            }
            let column = ColumnRef::new(position + 1, self.condition_column, SqlType::Gate)
                .qualified(&entry.alias);
            contributors.push(Expr::Column(column));
        }
        contributors
    }

    /// Returns the query with its condition column regenerated. `predicate`
    /// is the already translated gate part of the filter, if any. The input
    /// query is not modified.
    pub fn synthesize(&self, query: &Query, predicate: Option<Expr>) -> Result<Query> {
        let mut contributors = self.contributors(query);
        let tables = contributors.len();
        contributors.extend(predicate);
        if contributors.is_empty() {
            debug!("no condition contributors, query left as is");
            return Ok(query.clone());
        }

        let condition = match contributors.len() {
            1 => contributors.remove(0),
            _ => self.translator.translate(Expr::and(contributors))?,
        };
        debug!(tables, %condition, "synthesized condition");

        let mut rewritten = query.clone();
        rewritten
            .target_list
            .retain(|target| target.name.as_deref() != Some(self.condition_column));
        for (position, target) in rewritten.target_list.iter_mut().enumerate() {
            target.resno = position + 1;
        }
        rewritten.push_target(condition, self.condition_column);
        Ok(rewritten)
    }

    /// Runs the whole SELECT pipeline: classify the filter, translate what is
    /// left of it, then synthesize.
    pub fn rewrite(&self, query: &Query) -> Result<Query> {
        let pruned = classify_filter(query.filter.as_ref())?;
        trace!(pruned = ?pruned.as_ref().map(|p| p.to_string()), "pruned filter");
        let predicate = self.translator.translate_opt(pruned)?;
        self.synthesize(query, predicate)
    }
}
