// 📊 Search Report - catalog size plus hit counts for key terms

use crate::catalog::CatalogSource;
use crate::search::ParsedQuery;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Terms counted by the product report
pub const KEY_TERMS: [&str; 4] = ["Cool", "Amazing", "Perfect", "Kids"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub product_count: i64,

    /// One entry per configured term
    pub search_term_hits: BTreeMap<String, usize>,
}

pub struct ReportAggregator {
    catalog: Arc<dyn CatalogSource>,
    terms: Vec<String>,
}

impl ReportAggregator {
    /// Aggregator over the standard key terms
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self::with_terms(catalog, &KEY_TERMS)
    }

    pub fn with_terms(catalog: Arc<dyn CatalogSource>, terms: &[&str]) -> Self {
        ReportAggregator {
            catalog,
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Build the report.
    ///
    /// `product_count` comes straight from the catalog's count. Term hits are
    /// computed with the default search semantics over a single listing, so
    /// all terms see the same snapshot.
    pub fn generate(&self) -> Result<SearchReport> {
        let product_count = self.catalog.count()?;
        let items = self.catalog.list_all()?;

        let search_term_hits: BTreeMap<String, usize> = self
            .terms
            .iter()
            .map(|term| {
                let hits = ParsedQuery::parse(term).filter(&items).len();
                (term.clone(), hits)
            })
            .collect();

        tracing::debug!(product_count, terms = self.terms.len(), "generated search report");

        Ok(SearchReport {
            product_count,
            search_term_hits,
        })
    }
}
