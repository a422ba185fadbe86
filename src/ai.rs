//! Optional order summaries from a locally hosted Ollama-style endpoint.
//!
//! The model call is a single `POST /api/generate` with `stream: false`.
//! Because a summary runs in a background task while the user keeps
//! working, [`AnalysisGate`] hands out generation tokens so a result that
//! arrives after the user moved on (or started a newer run) is dropped
//! instead of overwriting fresher state.

use crate::config::AiConfig;
use crate::errors::{Error, Result};
use crate::models::ReportRow;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// How many of the most recent orders feed the prompt.
const PROMPT_ORDER_COUNT: usize = 5;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Thin HTTP client for the generate endpoint.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl AiClient {
    /// Builds a client with the configured request timeout.
    pub fn new(config: &AiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Ai(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Sends one non-streaming generate request and returns the model text.
    #[instrument(skip(self, prompt))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("Requesting summary from {} with model '{}'.", url, self.model);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Ai(format!("Request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Ai(format!("Model endpoint returned an error: {e}")))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Ai(format!("Could not parse model response: {e}")))?;
        info!("Received summary of {} chars.", parsed.response.len());
        Ok(parsed.response)
    }
}

/// Renders the newest [`PROMPT_ORDER_COUNT`] report rows into a prompt
/// asking for a short sales summary. `rows` is expected newest-first, as
/// [`crate::db::report_rows`] returns it.
#[must_use]
pub fn build_order_prompt(rows: &[ReportRow]) -> String {
    let mut prompt = String::from(
        "You are an assistant for a small sales team. Summarize the \
         following recent orders in two or three sentences, noting totals \
         and anything unusual.\n\n",
    );
    for row in rows.iter().take(PROMPT_ORDER_COUNT) {
        prompt.push_str(&format!(
            "- Order {} on {} for {}: {} (total {:.2})\n",
            row.order_id,
            row.date.format("%Y-%m-%d"),
            row.customer_name,
            if row.items.is_empty() { "no items" } else { row.items.as_str() },
            row.total,
        ));
    }
    prompt
}

/// Guards the single summary slot.
///
/// `begin` hands out a token tied to the current generation; `finish`
/// accepts it only while that generation is still current. `reset`
/// invalidates outstanding tokens, so a task finishing after a reset is
/// recognized as stale.
#[derive(Debug, Default)]
pub struct AnalysisGate {
    generation: AtomicU64,
    busy: AtomicBool,
}

impl AnalysisGate {
    /// Claims the summary slot. Returns `None` while a run is in flight.
    pub fn begin(&self) -> Option<u64> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        Some(self.generation.load(Ordering::Acquire))
    }

    /// Releases the slot. Returns whether `token` was still current; a
    /// stale token releases nothing.
    pub fn finish(&self, token: u64) -> bool {
        if self.generation.load(Ordering::Acquire) == token {
            self.busy.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Invalidates any in-flight run and frees the slot.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.busy.store(false, Ordering::Release);
    }
}

/// Kicks off one background summary run over `rows`.
///
/// Returns `None` when a run is already in flight. The spawned task
/// resolves to the summary text, or to [`Error::Ai`] when the call failed
/// or the run was superseded by a [`AnalysisGate::reset`].
pub fn spawn_summary(
    client: AiClient,
    gate: Arc<AnalysisGate>,
    rows: Vec<ReportRow>,
) -> Option<tokio::task::JoinHandle<Result<String>>> {
    let token = gate.begin()?;
    Some(tokio::spawn(async move {
        let prompt = build_order_prompt(&rows);
        let result = client.generate(&prompt).await;
        if gate.finish(token) {
            result
        } else {
            warn!("Dropping stale summary result.");
            Err(Error::Ai("Summary superseded before it finished".to_string()))
        }
    }))
}
