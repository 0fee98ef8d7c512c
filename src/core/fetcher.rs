use crate::domain::model::LookupResult;
use crate::domain::ports::PriceLookup;
use crate::utils::error::{FipeError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Fallback message when the upstream rejects a code with an empty body.
pub const DEFAULT_LOOKUP_ERROR: &str = "Erro ao consultar codigo FIPE";

/// Reqwest-backed client for the FIPE price endpoint. Every failure mode is
/// captured into the returned `LookupResult`; nothing propagates.
pub struct FipeClient {
    client: Client,
    base_url: Url,
}

impl FipeClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let base_url =
            Url::parse(api_base.trim_end_matches('/')).map_err(|e| FipeError::ConfigError {
                message: format!("Invalid API base URL '{}': {}", api_base, e),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(FipeError::ConfigError {
                message: format!("API base URL '{}' cannot carry a path", api_base),
            });
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn price_url(&self, code: &str) -> Url {
        let mut url = self.base_url.clone();
        // Infallible for http(s) bases, checked at construction. push()
        // percent-encodes the code.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(code);
        }
        url
    }
}

#[async_trait]
impl PriceLookup for FipeClient {
    async fn lookup(&self, code: &str) -> LookupResult {
        let url = self.price_url(code);
        tracing::debug!("Fetching FIPE price from: {}", url);

        let response = match self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return LookupResult::failure(code, 0, e.to_string()),
        };

        let status = response.status();
        tracing::debug!("Upstream response for {}: {}", code, status);

        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => {
                    let trimmed = body.trim();
                    if trimmed.is_empty() {
                        DEFAULT_LOOKUP_ERROR.to_string()
                    } else {
                        trimmed.to_string()
                    }
                }
                Err(e) => return LookupResult::failure(code, 0, e.to_string()),
            };
            return LookupResult::failure(code, status.as_u16(), message);
        }

        match response.json::<serde_json::Value>().await {
            Ok(data) => LookupResult::success(code, data),
            Err(e) => LookupResult::failure(code, 0, e.to_string()),
        }
    }
}

/// Resolve every code under a fixed concurrency ceiling.
///
/// `min(concurrency, len)` workers share one atomically advancing cursor;
/// each claims the next index exactly once, performs the lookup, and its
/// result lands in the pre-sized slot for that index. The output is therefore
/// index-aligned with the input no matter which lookups finish first. One
/// code failing never disturbs the others; failures are values here.
pub async fn fetch_all<L: PriceLookup + 'static>(
    lookup: Arc<L>,
    codes: Vec<String>,
    concurrency: usize,
) -> Result<Vec<LookupResult>> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }

    let total = codes.len();
    let workers = concurrency.max(1).min(total);
    let codes = Arc::new(codes);
    let cursor = Arc::new(AtomicUsize::new(0));

    tracing::debug!("Resolving {} code(s) with {} worker(s)", total, workers);

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let lookup = Arc::clone(&lookup);
        let codes = Arc::clone(&codes);
        let cursor = Arc::clone(&cursor);

        handles.push(tokio::spawn(async move {
            let mut claimed = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                if index >= codes.len() {
                    break;
                }
                let result = lookup.lookup(&codes[index]).await;
                claimed.push((index, result));
            }
            claimed
        }));
    }

    let mut slots: Vec<Option<LookupResult>> = (0..total).map(|_| None).collect();
    for handle in handles {
        let claimed = handle.await.map_err(|e| FipeError::ProcessingError {
            message: format!("Lookup worker failed: {}", e),
        })?;
        for (index, result) in claimed {
            slots[index] = Some(result);
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| FipeError::ProcessingError {
                message: format!("No result recorded for index {}", index),
            })
        })
        .collect()
}
