//! Batch deduplication.

use std::time::Instant;

use tracing::{debug, warn};

use super::HeaderDeduplicationService;
use crate::core::{CanonicalHeaders, HeaderError, RawHeaders, Result};

impl HeaderDeduplicationService {
    /// Deduplicate each header set in order.
    ///
    /// The output has one slot per input. A failing item yields
    /// [`HeaderError::BatchItemFailure`] in its slot and the rest of the
    /// batch is still processed. With batch processing enabled, an empty
    /// name cache is warmed first so every item shares it.
    pub fn batch_deduplicate_headers(
        &mut self,
        batch: &[RawHeaders],
    ) -> Vec<Result<CanonicalHeaders>> {
        let batch_enabled = self.config.enable_batch_processing;
        let start = self.config.enable_performance_logging.then(Instant::now);

        if batch_enabled && self.cache.is_empty() {
            self.warmup_cache();
        }

        let mut results = Vec::with_capacity(batch.len());
        let mut failed = 0usize;
        for (index, headers) in batch.iter().enumerate() {
            match self.deduplicate_headers(headers) {
                Ok(canonical) => results.push(Ok(canonical)),
                Err(err) => {
                    failed += 1;
                    self.emit(|| warn!(index, error = %err, "batch item failed, continuing"));
                    results.push(Err(HeaderError::batch_item(index, err)));
                }
            }
        }

        self.counters.batches += 1;
        self.counters.batch_items_failed += failed as u64;

        if let Some(start) = start {
            let elapsed = start.elapsed();
            let items = batch.len();
            let items_per_sec = if elapsed.as_secs_f64() > 0.0 {
                items as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            };
            self.emit(|| {
                debug!(
                    target: "header_dedup::perf",
                    operation = "batch",
                    duration_us = elapsed.as_micros() as u64,
                    items,
                    failed,
                    items_per_sec,
                    "header batch processed"
                )
            });
        }

        if let Some(ref metrics) = self.metrics {
            metrics.operations_total.with_label_values(&["batch"]).inc();
        }

        results
    }
}
