//! Test helpers and utilities

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use header_dedup::config::DedupConfig;
use header_dedup::{HeaderDeduplicationService, RawHeaders};
use tracing::field::{Field, Visit};
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// A log event recorded by [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: HashMap<String, String>,
}

#[allow(dead_code)]
impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// True if the message or any field mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.fields.values().any(|v| v.contains(needle))
    }
}

/// Layer that records every event it sees.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[allow(dead_code)]
impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that feeds this capture, for `with_dispatch`.
    pub fn dispatch(&self) -> Dispatch {
        Dispatch::new(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn with_target(&self, target: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.target == target)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: HashMap<String, String>,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}

/// Service with default configuration and a log capture attached.
#[allow(dead_code)]
pub fn captured_service(config: DedupConfig) -> (HeaderDeduplicationService, LogCapture) {
    let capture = LogCapture::new();
    let service = HeaderDeduplicationService::new(config).with_dispatch(capture.dispatch());
    (service, capture)
}

/// Build raw headers from `(name, value)` pairs.
#[allow(dead_code)]
pub fn raw(pairs: &[(&str, &str)]) -> RawHeaders {
    pairs.iter().map(|(n, v)| (*n, *v)).collect()
}

/// Assert no two keys are equal ignoring ASCII case.
#[allow(dead_code)]
pub fn assert_unique_names(headers: &header_dedup::CanonicalHeaders) {
    let names: Vec<String> = headers.names().map(str::to_ascii_lowercase).collect();
    for (i, name) in names.iter().enumerate() {
        assert!(
            !names[i + 1..].contains(name),
            "duplicate header name '{}' in {:?}",
            name,
            headers
        );
    }
}
