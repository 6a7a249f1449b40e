//! Presentation of section failures.

use shop_core::ErrorMode;
use shop_dom::{el, Document};

use crate::error::LoadError;

/// Class marker of the message a visible failure leaves in its region.
pub const SECTION_ERROR_CLASS: &str = "section-error";

/// A page section that could not be populated.
#[derive(Debug)]
pub struct SectionFailure<'a> {
    /// Section name (`banner`, `products`, `workload`).
    pub section: &'a str,
    /// Selector of the region the section fills, if it has one.
    pub region: Option<&'a str>,
    /// What went wrong.
    pub error: &'a LoadError,
}

/// Decides what a failed section looks like on the page.
///
/// The page loader logs every failure itself; a reporter only touches the
/// document. Returns whether the document was changed.
pub trait ErrorReporter {
    fn report(&self, doc: &mut Document, failure: &SectionFailure<'_>) -> bool;
}

/// Leaves the page as it is: the failed section simply never populates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ErrorReporter for SilentReporter {
    fn report(&self, _doc: &mut Document, _failure: &SectionFailure<'_>) -> bool {
        false
    }
}

/// Appends a `p.section-error` message to the failed section's region.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibleReporter;

impl VisibleReporter {
    /// Message shown for a failure.
    pub fn message(failure: &SectionFailure<'_>) -> String {
        format!("Could not load {}: {}", failure.section, failure.error)
    }
}

impl ErrorReporter for VisibleReporter {
    fn report(&self, doc: &mut Document, failure: &SectionFailure<'_>) -> bool {
        let Some(selector) = failure.region else {
            return false;
        };
        let Ok(Some(region)) = doc.query_selector(selector) else {
            return false;
        };

        doc.append(
            region,
            el("p")
                .class(SECTION_ERROR_CLASS)
                .attr("role", "alert")
                .attr("data-error-kind", failure.error.kind())
                .text(Self::message(failure)),
        );
        true
    }
}

/// Reporter for a configured error mode.
pub fn reporter_for(mode: ErrorMode) -> Box<dyn ErrorReporter> {
    match mode {
        ErrorMode::Silent => Box::new(SilentReporter),
        ErrorMode::Visible => Box::new(VisibleReporter),
    }
}
