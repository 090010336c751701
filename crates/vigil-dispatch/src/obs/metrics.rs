//! Minimal metrics registry for the dispatch subsystem.
//!
//! Counters are atomics; the labelled variants are keyed by `&'static str`
//! because every label set here is closed (deny reasons, transport error
//! codes, control frame kinds), which keeps the registry allocation-free on
//! the hot path. One fixed-bucket histogram tracks dispatch latency in
//! microseconds. Output is Prometheus text exposition format.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

#[derive(Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        let _ = writeln!(out, "{name} {}", self.get());
    }
}

#[derive(Default)]
pub struct LabeledCounter {
    map: DashMap<&'static str, AtomicU64>,
}

impl LabeledCounter {
    pub fn inc(&self, label: &'static str) {
        self.map
            .entry(label)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, label: &str) -> u64 {
        self.map.get(label).map(|c| c.load(Ordering::Relaxed)).unwrap_or(0)
    }

    fn render(&self, name: &str, label_key: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let _ = writeln!(out, "{name}{{{label_key}=\"{}\"}} {}", r.key(), r.value().load(Ordering::Relaxed));
        }
    }
}

// 50us .. 50ms; dispatch is a short bounded pipeline, anything above the
// last bucket lands in +Inf.
const BUCKETS_MICROS: [u64; 7] = [50, 100, 500, 1_000, 5_000, 10_000, 50_000];

pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 7],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

impl Histogram {
    pub fn observe(&self, duration: Duration) {
        let micros = duration.as_micros() as u64;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);
        for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
            let _ = writeln!(out, "{name}_bucket{{le=\"{le}\"}} {}", self.buckets[i].load(Ordering::Relaxed));
        }
        let count = self.count.load(Ordering::Relaxed);
        let _ = writeln!(out, "{name}_bucket{{le=\"+Inf\"}} {count}");
        let _ = writeln!(out, "{name}_sum {}", self.sum.load(Ordering::Relaxed));
        let _ = writeln!(out, "{name}_count {count}");
    }
}

#[derive(Default)]
pub struct DispatchMetrics {
    /// Reports handed to the transport.
    pub sent: Counter,
    /// Refusals by reason: `policy`, `rate`, `not_initialized`.
    pub denied: LabeledCounter,
    /// Calls with an absent required field.
    pub invalid_arguments: Counter,
    /// Encoder/transport failures by stable error code.
    pub transport_errors: LabeledCounter,
    /// Control frames seen on the group: `ready`, `bye`, `invalid`.
    pub control_frames: LabeledCounter,
    /// Round-boundary resets applied to the rate window.
    pub round_resets: Counter,
    /// Dispatch pipeline latency (microseconds).
    pub dispatch_duration: Histogram,
}

impl DispatchMetrics {
    /// Render all registered metrics plus gauge lines provided by the caller.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.sent.render("vigil_reports_sent_total", &mut out);
        self.denied.render("vigil_dispatch_denied_total", "reason", &mut out);
        self.invalid_arguments.render("vigil_invalid_arguments_total", &mut out);
        self.transport_errors.render("vigil_transport_errors_total", "kind", &mut out);
        self.control_frames.render("vigil_control_frames_total", "kind", &mut out);
        self.round_resets.render("vigil_round_resets_total", &mut out);
        self.dispatch_duration.render("vigil_dispatch_duration_micros", &mut out);
        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {k} gauge");
            let _ = writeln!(out, "{k} {v}");
        }
        out
    }
}
