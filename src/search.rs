// 🔍 Product Search - free-text matching over name and description
// Two modes: Exact ("quoted" query, case-sensitive equality) and Substring
// (case-insensitive containment)

use crate::catalog::CatalogSource;
use crate::db::ProductItem;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const QUOTE: char = '"';

// ============================================================================
// MATCH MODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Whole-field, case-sensitive equality after stripping one pair of quotes
    Exact,

    /// Case-insensitive contiguous substring
    Substring,
}

// ============================================================================
// PARSED QUERY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub mode: MatchMode,

    /// Effective term: quotes stripped (Exact) or lowercased (Substring)
    pub term: String,
}

impl ParsedQuery {
    /// Derive the mode and effective term from the raw query.
    ///
    /// A query is exact only when it has at least two characters and both the
    /// first and the last are `"`, so a lone `"` stays a substring query.
    pub fn parse(raw: &str) -> Self {
        let quoted = raw.len() >= 2 && raw.starts_with(QUOTE) && raw.ends_with(QUOTE);

        if quoted {
            ParsedQuery {
                mode: MatchMode::Exact,
                term: raw[1..raw.len() - 1].to_string(),
            }
        } else {
            ParsedQuery {
                mode: MatchMode::Substring,
                term: raw.to_lowercase(),
            }
        }
    }

    pub fn matches(&self, item: &ProductItem) -> bool {
        match self.mode {
            MatchMode::Exact => item.name == self.term || item.description == self.term,
            MatchMode::Substring => {
                item.name.to_lowercase().contains(&self.term)
                    || item.description.to_lowercase().contains(&self.term)
            }
        }
    }

    /// Matching items in their original order
    pub fn filter<'a>(&self, items: &'a [ProductItem]) -> Vec<&'a ProductItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Items matching `raw_query`, preserving the order of `items`
pub fn search_products(raw_query: &str, items: &[ProductItem]) -> Vec<ProductItem> {
    ParsedQuery::parse(raw_query)
        .filter(items)
        .into_iter()
        .cloned()
        .collect()
}

// ============================================================================
// SEARCH SERVICE
// ============================================================================

/// Runs queries against a full scan of the catalog on every call
#[derive(Clone)]
pub struct ProductSearchService {
    catalog: Arc<dyn CatalogSource>,
}

impl ProductSearchService {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        ProductSearchService { catalog }
    }

    pub fn search(&self, raw_query: &str) -> Result<Vec<ProductItem>> {
        let items = self.catalog.list_all()?;
        let query = ParsedQuery::parse(raw_query);
        let results: Vec<ProductItem> = query.filter(&items).into_iter().cloned().collect();

        tracing::debug!(
            query = raw_query,
            mode = ?query.mode,
            scanned = items.len(),
            matched = results.len(),
            "product search"
        );

        Ok(results)
    }
}
