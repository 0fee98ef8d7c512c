use crate::core::codes::{normalize_code, parse_codes_from_text, unique_preserve_order};
use crate::core::fetcher::fetch_all;
use crate::domain::model::BatchResponse;
use crate::domain::ports::{ConfigProvider, PriceLookup};
use crate::utils::error::{FipeError, Result};
use std::sync::Arc;

/// Runs one batch: merge structured codes and free text, normalize,
/// deduplicate, then resolve everything under the concurrency ceiling.
pub struct BatchEngine<L: PriceLookup> {
    lookup: Arc<L>,
    concurrency: usize,
}

impl<L: PriceLookup + 'static> BatchEngine<L> {
    pub fn new(lookup: L, concurrency: usize) -> Self {
        Self {
            lookup: Arc::new(lookup),
            concurrency,
        }
    }

    pub fn from_config<C: ConfigProvider>(lookup: L, config: &C) -> Self {
        Self::new(lookup, config.concurrency())
    }

    /// Merge order is structured codes first, then text tokens; that order
    /// (minus duplicates) is the order of the returned results. An empty
    /// merged set fails before any lookup is dispatched.
    pub async fn run(&self, codes: &[String], text: &str) -> Result<BatchResponse> {
        let mut merged: Vec<String> =
            codes.iter().filter_map(|raw| normalize_code(raw)).collect();
        merged.extend(parse_codes_from_text(text));

        let unique = unique_preserve_order(merged);
        if unique.is_empty() {
            return Err(FipeError::NoValidCodes);
        }

        tracing::info!("Resolving batch of {} unique code(s)", unique.len());

        let results = fetch_all(Arc::clone(&self.lookup), unique, self.concurrency).await?;

        Ok(BatchResponse {
            count: results.len(),
            results,
        })
    }
}
