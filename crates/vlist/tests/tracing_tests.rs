#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! These tests verify the layout-pass spans and cache events emitted by
//! `vlist`.
//!
//! Spans enabled:
//!   cargo test -p vlist --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p vlist --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use vlist::{LayoutStrategy, VirtualList, VirtualListConfig};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its metadata and parent info.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A captured event with its level and fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
    span_name: Option<String>,
}

/// Timing record for a span.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct SpanTiming {
    name: String,
    enter: Instant,
    duration: Option<std::time::Duration>,
}

/// A tracing Layer that captures spans, events, and timing.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    timings: Arc<Mutex<HashMap<tracing::span::Id, SpanTiming>>>,
    completed_timings: Arc<Mutex<Vec<SpanTiming>>>,
}

impl SpanCapture {
    fn new() -> (Self, CaptureHandle) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let timings = Arc::new(Mutex::new(HashMap::new()));
        let completed_timings = Arc::new(Mutex::new(Vec::new()));

        let handle = CaptureHandle {
            spans: spans.clone(),
            events: events.clone(),
            completed_timings: completed_timings.clone(),
        };

        let layer = Self {
            spans,
            events,
            timings,
            completed_timings,
        };

        (layer, handle)
    }
}

/// Handle to read captured data after a pass.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    completed_timings: Arc<Mutex<Vec<SpanTiming>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn timings(&self) -> Vec<SpanTiming> {
        self.completed_timings.lock().unwrap().clone()
    }
}

/// Visitor that extracts span and event fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        let fields: HashMap<String, String> = visitor.0.into_iter().collect();

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields,
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);

        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        let span_name = ctx
            .event_span(event)
            .map(|span_ref| span_ref.name().to_string());

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
            span_name,
        });
    }

    fn on_enter(&self, id: &tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span_ref) = ctx.span(id) {
            self.timings.lock().unwrap().insert(
                id.clone(),
                SpanTiming {
                    name: span_ref.name().to_string(),
                    enter: Instant::now(),
                    duration: None,
                },
            );
        }
    }

    fn on_exit(&self, id: &tracing::span::Id, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut timings = self.timings.lock().unwrap();
        if let Some(timing) = timings.get_mut(id) {
            timing.duration = Some(timing.enter.elapsed());
        }
    }

    fn on_close(&self, id: tracing::span::Id, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(timing) = self.timings.lock().unwrap().remove(&id) {
            self.completed_timings.lock().unwrap().push(timing);
        }
    }
}

/// Set up a tracing subscriber with span capture and run a closure.
fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let (layer, handle) = SpanCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn fixed_list() -> VirtualList {
    let config = VirtualListConfig::new(300.0).with_strategy(LayoutStrategy::fixed(50.0).unwrap());
    VirtualList::new(config).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

/// Every layout pass opens one `widget_render` span naming the list.
#[test]
#[cfg(feature = "tracing")]
fn span_created_per_layout_pass() {
    let handle = with_captured_spans(|| {
        let mut list = fixed_list();
        list.layout(1000);
        list.handle().scroll_to(1000.0);
        list.layout(1000);
    });

    let spans = handle.spans();
    let passes: Vec<_> = spans
        .iter()
        .filter(|s| s.name == "widget_render")
        .collect();
    assert_eq!(passes.len(), 2, "spans: {spans:?}");

    for span in &passes {
        assert_eq!(
            span.fields.get("widget").map(String::as_str),
            Some("VirtualList")
        );
        assert_eq!(
            span.fields.get("strategy").map(String::as_str),
            Some("fixed")
        );
        assert_eq!(span.fields.get("items").map(String::as_str), Some("1000"));
    }
}

/// The pass summary event carries the computed range inside the span.
#[test]
#[cfg(feature = "tracing")]
fn layout_event_reports_range() {
    let handle = with_captured_spans(|| {
        let mut list = fixed_list();
        list.handle().scroll_to(1000.0);
        list.layout(1000);
    });

    let events = handle.events();
    let pass = events
        .iter()
        .find(|e| e.message == "layout pass")
        .expect("layout pass event");
    assert_eq!(pass.span_name.as_deref(), Some("widget_render"));
    assert_eq!(pass.fields.get("start").map(String::as_str), Some("20"));
    assert_eq!(pass.fields.get("end").map(String::as_str), Some("25"));
    assert_eq!(
        pass.fields.get("overscan_start").map(String::as_str),
        Some("15")
    );
    assert_eq!(
        pass.fields.get("overscan_end").map(String::as_str),
        Some("30")
    );
}

/// Switching strategy logs the replacement and the cache rebuild.
#[test]
#[cfg(feature = "tracing")]
fn strategy_switch_logs_cache_rebuild() {
    let handle = with_captured_spans(|| {
        let mut list = fixed_list();
        list.layout(100);
        list.set_strategy(LayoutStrategy::variable(|i| 20.0 + (i % 3) as f64 * 10.0))
            .unwrap();
        list.layout(100);
    });

    let events = handle.events();
    assert!(
        events
            .iter()
            .any(|e| e.message == "layout strategy replaced"
                && e.fields.get("to").map(String::as_str) == Some("variable")),
        "events: {events:?}"
    );
    let rebuilds: Vec<_> = events
        .iter()
        .filter(|e| e.message == "size cache rebuilt")
        .collect();
    assert_eq!(rebuilds.len(), 2);
    assert!(
        rebuilds
            .iter()
            .all(|e| e.level == tracing::Level::DEBUG)
    );
}

/// Invalid heights from a variable height function are clamped with a warning.
#[test]
#[cfg(feature = "tracing")]
fn invalid_height_warns() {
    let handle = with_captured_spans(|| {
        let config = VirtualListConfig::new(100.0)
            .with_strategy(LayoutStrategy::variable(|i| if i == 3 { f64::NAN } else { 10.0 }));
        let mut list = VirtualList::new(config).unwrap();
        list.layout(10);
        assert_eq!(list.content_extent(), 90.0);
    });

    let warnings: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1, "warnings: {warnings:?}");
    assert_eq!(
        warnings[0].fields.get("index").map(String::as_str),
        Some("3")
    );
}

/// Verify that span timing is recorded and reasonable.
#[test]
#[cfg(feature = "tracing")]
fn span_timing_accurate() {
    let handle = with_captured_spans(|| {
        let items: Vec<u32> = (0..10_000).collect();
        let config = VirtualListConfig::new(300.0)
            .with_strategy(LayoutStrategy::variable(|i| 20.0 + (i % 7) as f64));
        let mut list = VirtualList::new(config).unwrap();
        list.handle().scroll_to(50_000.0);
        let _ = list.render(&items, |item, _, pos| (*item, pos.top));
    });

    let timings = handle.timings();
    let pass_timings: Vec<_> = timings
        .iter()
        .filter(|t| t.name == "widget_render")
        .collect();

    assert!(
        !pass_timings.is_empty(),
        "Should have widget_render timing records"
    );

    for timing in &pass_timings {
        let duration = timing.duration.expect("span should have a duration");
        assert!(
            duration < std::time::Duration::from_secs(1),
            "Layout pass took unreasonably long: {duration:?}",
        );
    }
}

/// Tests: zero_overhead_when_disabled
///
/// When compiled WITHOUT `--features tracing`, the `#[cfg(feature = "tracing")]`
/// blocks are removed by the compiler and no spans or events appear.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_when_disabled() {
    let handle = with_captured_spans(|| {
        let mut list = fixed_list();
        list.handle().scroll_to(1000.0);
        list.layout(1000);
    });

    assert!(handle.spans().is_empty());
    assert!(handle.events().is_empty());
}
