//! Per-load metrics.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use shop_core::LoadId;

/// Metrics for a single page load.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct LoadMetrics {
    /// Load ID for correlation.
    pub load_id: String,
    /// Section outcomes, keyed by section name.
    pub sections: BTreeMap<String, SectionMetrics>,
    /// The product fetch, if one was made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch: Option<FetchMetrics>,
    /// The simulated workload, if it ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload: Option<WorkloadMetrics>,
    /// Product cards appended to the page.
    pub cards_rendered: usize,
    /// Total load duration (microseconds).
    pub total_duration_us: u64,
}

/// Outcome of one page section.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct SectionMetrics {
    /// Section name.
    pub name: String,
    /// Time from load start to section start (microseconds).
    pub start_us: u64,
    /// Time from load start to section end (microseconds).
    pub done_us: u64,
    /// Time spent on the section (microseconds).
    pub duration_us: u64,
    /// Whether the section finished successfully.
    pub success: bool,
    /// Error message if the section failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metrics for the product fetch.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct FetchMetrics {
    /// URL fetched.
    pub url: String,
    /// Fetch duration (microseconds).
    pub duration_us: u64,
    /// HTTP status code, if a response arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Response size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_bytes: Option<usize>,
    /// Whether the fetch succeeded.
    pub success: bool,
}

/// Metrics for the simulated workload.
#[derive(Debug, Clone, Default, Serialize, serde::Deserialize)]
pub struct WorkloadMetrics {
    /// Chunks executed.
    pub chunks: u32,
    /// Units processed.
    pub units: u64,
    /// Largest chunk, in units.
    pub max_units_per_turn: u64,
}

#[derive(Debug)]
struct SectionBuilder {
    start: Instant,
    done: Option<Instant>,
    success: bool,
    error: Option<String>,
}

/// Collector for load metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    load_id: LoadId,
    start: Instant,
    sections: BTreeMap<String, SectionBuilder>,
    fetch: Option<FetchMetrics>,
    workload: Option<WorkloadMetrics>,
    cards_rendered: usize,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    pub fn new(load_id: LoadId) -> Self {
        Self {
            load_id,
            start: Instant::now(),
            sections: BTreeMap::new(),
            fetch: None,
            workload: None,
            cards_rendered: 0,
        }
    }

    /// Record section start.
    pub fn record_section_start(&mut self, name: &str) {
        self.sections.insert(
            name.to_string(),
            SectionBuilder {
                start: Instant::now(),
                done: None,
                success: false,
                error: None,
            },
        );
    }

    /// Record a section finishing successfully.
    pub fn record_section_done(&mut self, name: &str) {
        self.finish_section(name, None);
    }

    /// Record a section failing.
    pub fn record_section_failed(&mut self, name: &str, error: impl Into<String>) {
        self.finish_section(name, Some(error.into()));
    }

    fn finish_section(&mut self, name: &str, error: Option<String>) {
        let now = Instant::now();
        let section = self
            .sections
            .entry(name.to_string())
            .or_insert_with(|| SectionBuilder {
                start: now,
                done: None,
                success: false,
                error: None,
            });
        section.done = Some(now);
        section.success = error.is_none();
        section.error = error;
    }

    /// Record the product fetch.
    pub fn record_fetch(
        &mut self,
        url: &str,
        duration: Duration,
        status_code: Option<u16>,
        response_bytes: Option<usize>,
        success: bool,
    ) {
        self.fetch = Some(FetchMetrics {
            url: url.to_string(),
            duration_us: duration.as_micros() as u64,
            status_code,
            response_bytes,
            success,
        });
    }

    /// Record one executed workload chunk.
    pub fn record_chunk(&mut self, units: u64) {
        let workload = self.workload.get_or_insert_with(WorkloadMetrics::default);
        workload.chunks += 1;
        workload.units += units;
        workload.max_units_per_turn = workload.max_units_per_turn.max(units);
    }

    /// Record cards appended to the product container.
    pub fn record_cards(&mut self, count: usize) {
        self.cards_rendered += count;
    }

    /// Get total elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finalize and return the metrics.
    pub fn finalize(self) -> LoadMetrics {
        let now = Instant::now();
        let start = self.start;

        let sections = self
            .sections
            .into_iter()
            .map(|(name, builder)| {
                let done = builder.done.unwrap_or(now);
                (
                    name.clone(),
                    SectionMetrics {
                        name,
                        start_us: builder.start.duration_since(start).as_micros() as u64,
                        done_us: done.duration_since(start).as_micros() as u64,
                        duration_us: done.duration_since(builder.start).as_micros() as u64,
                        success: builder.done.is_some() && builder.success,
                        error: builder.error,
                    },
                )
            })
            .collect();

        LoadMetrics {
            load_id: self.load_id.to_string(),
            sections,
            fetch: self.fetch,
            workload: self.workload,
            cards_rendered: self.cards_rendered,
            total_duration_us: now.duration_since(start).as_micros() as u64,
        }
    }
}

impl LoadMetrics {
    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as JSON (pretty printed).
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Load: {}", self.load_id));
        lines.push(format!(
            "  Total: {}us ({:.2}ms)",
            self.total_duration_us,
            self.total_duration_us as f64 / 1000.0
        ));

        if !self.sections.is_empty() {
            lines.push("  Sections:".to_string());
            for (name, section) in &self.sections {
                let outcome = match &section.error {
                    Some(e) => format!(" [failed: {}]", e),
                    None => String::new(),
                };
                lines.push(format!(
                    "    {}: {}us ({:.2}ms){}",
                    name,
                    section.duration_us,
                    section.duration_us as f64 / 1000.0,
                    outcome
                ));
            }
        }

        if let Some(fetch) = &self.fetch {
            let status = if fetch.success {
                format!("{}", fetch.status_code.unwrap_or(0))
            } else {
                "FAILED".to_string()
            };
            lines.push(format!(
                "  Fetch [{}]: {}us ({:.2}ms) - {}",
                status,
                fetch.duration_us,
                fetch.duration_us as f64 / 1000.0,
                fetch.url
            ));
        }

        lines.push(format!("  Cards rendered: {}", self.cards_rendered));

        if let Some(workload) = &self.workload {
            lines.push(format!(
                "  Workload: {} chunks, {} units, max {} units/turn",
                workload.chunks, workload.units, workload.max_units_per_turn
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_sections_and_workload() {
        let mut metrics = MetricsCollector::new(LoadId::from_string("load-7"));
        metrics.record_section_start("banner");
        metrics.record_section_done("banner");
        metrics.record_section_start("products");
        metrics.record_section_failed("products", "HTTP error: 500");
        metrics.record_fetch("http://x/products", Duration::from_millis(3), Some(500), None, false);
        for _ in 0..3 {
            metrics.record_chunk(100);
        }
        metrics.record_chunk(40);

        let m = metrics.finalize();
        assert!(m.sections["banner"].success);
        assert!(!m.sections["products"].success);
        assert_eq!(m.sections["products"].error.as_deref(), Some("HTTP error: 500"));

        let workload = m.workload.as_ref().unwrap();
        assert_eq!(workload.chunks, 4);
        assert_eq!(workload.units, 340);
        assert_eq!(workload.max_units_per_turn, 100);

        let summary = m.to_summary();
        assert!(summary.contains("Load: load-7"));
        assert!(summary.contains("Fetch [FAILED]"));
        assert!(summary.contains("4 chunks, 340 units"));
    }

    #[test]
    fn test_unfinished_section_is_not_success() {
        let mut metrics = MetricsCollector::new(LoadId::from_string("x"));
        metrics.record_section_start("workload");
        let m = metrics.finalize();
        assert!(!m.sections["workload"].success);
    }

    #[test]
    fn test_json_output() {
        let mut metrics = MetricsCollector::new(LoadId::from_string("x"));
        metrics.record_cards(20);
        let json: serde_json::Value = serde_json::from_str(&metrics.finalize().to_json()).unwrap();
        assert_eq!(json["cards_rendered"], 20);
        assert!(json.get("fetch").is_none());
    }
}
