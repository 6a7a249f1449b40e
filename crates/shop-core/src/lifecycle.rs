//! Page load lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Phases of a page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    /// Load started, document shell built.
    Start,
    /// A named section started populating.
    SectionStarted(String),
    /// A named section finished populating.
    SectionDone(String),
    /// A named section failed.
    SectionFailed(String),
    /// All units finished.
    Completion,
}

impl LoadPhase {
    /// Timing mark name for this phase.
    pub fn mark_name(&self) -> String {
        match self {
            Self::Start => "start".to_string(),
            Self::SectionStarted(s) => format!("section_{}_start", s),
            Self::SectionDone(s) => format!("section_{}_done", s),
            Self::SectionFailed(s) => format!("section_{}_failed", s),
            Self::Completion => "completion".to_string(),
        }
    }
}

/// Timing context for a page load.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Record a lifecycle phase.
    pub fn record(&mut self, phase: &LoadPhase) {
        self.mark(&phase.mark_name());
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from start to a given mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Get timing for a section that has both a start and an end mark.
    /// A failed section's end is its failure mark.
    pub fn section_timing(&self, section: &str) -> Option<SectionTiming> {
        let start = self
            .marks
            .get(&LoadPhase::SectionStarted(section.to_string()).mark_name())?;
        let done = self
            .marks
            .get(&LoadPhase::SectionDone(section.to_string()).mark_name())
            .or_else(|| {
                self.marks
                    .get(&LoadPhase::SectionFailed(section.to_string()).mark_name())
            })?;

        Some(SectionTiming {
            name: section.to_string(),
            start: start.duration_since(self.start),
            done: done.duration_since(self.start),
            duration: done.duration_since(*start),
        })
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing information for a section.
#[derive(Debug, Clone)]
pub struct SectionTiming {
    /// Section name.
    pub name: String,
    /// Time from load start to section start.
    pub start: Duration,
    /// Time from load start to section end.
    pub done: Duration,
    /// Time spent populating the section.
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_timing_requires_both_marks() {
        let mut timing = TimingContext::new();
        timing.record(&LoadPhase::SectionStarted("products".to_string()));
        assert!(timing.section_timing("products").is_none());

        timing.record(&LoadPhase::SectionDone("products".to_string()));
        let t = timing.section_timing("products").unwrap();
        assert_eq!(t.name, "products");
        assert!(t.done >= t.start);
    }

    #[test]
    fn test_failed_section_has_timing() {
        let mut timing = TimingContext::new();
        timing.record(&LoadPhase::SectionStarted("products".to_string()));
        timing.record(&LoadPhase::SectionFailed("products".to_string()));
        assert!(timing.section_timing("products").is_some());
    }

    #[test]
    fn test_mark_names() {
        assert_eq!(LoadPhase::Start.mark_name(), "start");
        assert_eq!(
            LoadPhase::SectionDone("banner".to_string()).mark_name(),
            "section_banner_done"
        );
    }
}
