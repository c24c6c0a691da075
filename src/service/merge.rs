//! Merging a primary header set with a secondary (fallback) set.

use tracing::{debug, warn};

use super::HeaderDeduplicationService;
use crate::core::{CanonicalHeaders, HeaderValue, RawHeaders, Result, ValuePolicy};

impl HeaderDeduplicationService {
    /// Merge two header sets after deduplicating each independently.
    ///
    /// Single-value headers present in both take primary's value.
    /// Accumulate-policy headers get primary's values followed by those of
    /// secondary's values that are not byte-identical to one already kept.
    /// Headers present in only one input pass through unchanged; primary's
    /// keys come first in the result.
    pub fn merge_headers(
        &mut self,
        primary: &RawHeaders,
        secondary: &RawHeaders,
    ) -> Result<CanonicalHeaders> {
        let start = self.timer();
        let result = self.merge_inner(primary, secondary);
        self.counters.merges += 1;

        if let Some(start) = start {
            let elapsed = start.elapsed();
            if self.config.enable_performance_logging {
                let output = result.as_ref().map(CanonicalHeaders::len).unwrap_or(0);
                self.emit(|| {
                    debug!(
                        target: "header_dedup::perf",
                        operation = "merge",
                        duration_us = elapsed.as_micros() as u64,
                        primary_entries = primary.len(),
                        secondary_entries = secondary.len(),
                        output_headers = output,
                        "headers merged"
                    )
                });
            }
            self.observe("merge", elapsed.as_secs_f64(), result.as_ref().err());
        }

        result
    }

    fn merge_inner(
        &mut self,
        primary: &RawHeaders,
        secondary: &RawHeaders,
    ) -> Result<CanonicalHeaders> {
        let primary = self.dedup_inner(primary)?;
        let secondary = self.dedup_inner(secondary)?;
        Ok(self.combine(primary, secondary))
    }

    fn combine(
        &mut self,
        mut merged: CanonicalHeaders,
        secondary: CanonicalHeaders,
    ) -> CanonicalHeaders {
        for (name, incoming) in secondary {
            let policy = self.policies.policy(&name);
            let Some(existing) = merged.get_canonical_mut(&name) else {
                merged.insert_canonical(name, incoming);
                continue;
            };

            match policy {
                ValuePolicy::Accumulate => {
                    let mut values = existing.values().to_vec();
                    for v in incoming.iter() {
                        if !values.iter().any(|kept| kept == v) {
                            values.push(v.to_string());
                        }
                    }
                    *existing = HeaderValue::from_values(values);
                }
                ValuePolicy::Override => {
                    if *existing != incoming {
                        let kept = existing.to_string();
                        self.report_override(&name, &kept, &incoming);
                    }
                }
            }
        }
        merged
    }

    fn report_override(&mut self, name: &str, kept: &str, dropped: &HeaderValue) {
        self.counters.conflicts_resolved += 1;
        let critical = self.policies.is_critical(name);

        if let Some(ref metrics) = self.metrics {
            metrics.record_conflict(name, critical, "primary_wins");
        }

        if !critical {
            return;
        }
        self.counters.critical_conflicts += 1;

        if self.config.log_critical_conflicts {
            self.emit(|| {
                warn!(
                    target: "header_dedup::conflict",
                    header = name,
                    kept = kept,
                    dropped = %dropped,
                    "critical header overridden by primary source"
                )
            });
        }
    }
}
