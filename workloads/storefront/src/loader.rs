//! Page load orchestration.

use std::cell::RefCell;
use std::time::Instant;

use shop_core::{LoadId, LoadPhase, StorefrontConfig, TimingContext};
use shop_data::{FetchClient, FetchError};
use shop_dom::Document;
use shop_executor::{ChunkReport, HostScheduler, TaskTracker, WorkloadSummary};
use shop_observability::{LoadMetrics, MetricsCollector, StructuredLogger};

use crate::banner::show_top_bar;
use crate::calculation::perform_heavy_calculation;
use crate::cards::display_products;
use crate::catalog::load_products;
use crate::error::LoadError;
use crate::page::page_document;
use crate::report::{reporter_for, ErrorReporter, SectionFailure};
use crate::{BANNER_SELECTOR, PRODUCTS_REGION_SELECTOR};

/// Section name of the country/VAT banner.
pub const SECTION_BANNER: &str = "banner";
/// Section name of the product catalog.
pub const SECTION_PRODUCTS: &str = "products";
/// Section name of the simulated calculation.
pub const SECTION_WORKLOAD: &str = "workload";

/// Everything a finished page load produced.
#[derive(Debug)]
pub struct PageLoad {
    pub load_id: LoadId,
    pub document: Document,
    pub metrics: LoadMetrics,
    pub tasks: TaskTracker,
    pub timing: TimingContext,
    /// Summary of the calculation; `None` if it could not start.
    pub workload: Option<WorkloadSummary>,
}

impl PageLoad {
    /// Serialize the final document.
    pub fn html(&self) -> String {
        self.document.to_html()
    }

    /// Sections that failed, in start order.
    pub fn failed_sections(&self) -> Vec<&str> {
        self.tasks.failed()
    }
}

/// Mutable state shared by the three units of one load.
///
/// Borrowed only between awaits, never across one.
struct LoadState {
    document: Document,
    metrics: MetricsCollector,
    tasks: TaskTracker,
    timing: TimingContext,
}

impl LoadState {
    fn start(&mut self, section: &str) {
        self.tasks.start(section);
        self.metrics.record_section_start(section);
        self.timing
            .record(&LoadPhase::SectionStarted(section.to_string()));
    }

    fn succeed(&mut self, section: &str) {
        self.tasks.complete(section);
        self.metrics.record_section_done(section);
        self.timing.record(&LoadPhase::SectionDone(section.to_string()));
    }

    fn fail(&mut self, section: &str, error: &LoadError) {
        self.tasks.fail(section, error.to_string());
        self.metrics.record_section_failed(section, error.to_string());
        self.timing
            .record(&LoadPhase::SectionFailed(section.to_string()));
    }
}

/// Loads the storefront page.
///
/// The banner, the product catalog and the calculation start in that order
/// and then interleave on the calling thread. A failing unit never stops
/// the others; its failure is logged and handed to the [`ErrorReporter`].
pub struct PageLoader {
    config: StorefrontConfig,
    client: FetchClient,
    logger: StructuredLogger,
    reporter: Box<dyn ErrorReporter>,
}

impl PageLoader {
    /// Create a loader; the reporter follows `config.errors.mode`.
    pub fn new(config: StorefrontConfig, client: FetchClient, logger: StructuredLogger) -> Self {
        let reporter = reporter_for(config.errors.mode);
        Self {
            config,
            client,
            logger,
            reporter,
        }
    }

    /// Replace the error reporter.
    pub fn with_reporter(mut self, reporter: impl ErrorReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Load the page into a fresh shell.
    pub async fn load<H>(&self, host: &H, on_chunk: impl FnMut(&ChunkReport)) -> PageLoad
    where
        H: HostScheduler + ?Sized,
    {
        self.load_into(page_document(), host, on_chunk).await
    }

    /// Load the page into an existing document.
    pub async fn load_into<H>(
        &self,
        document: Document,
        host: &H,
        mut on_chunk: impl FnMut(&ChunkReport),
    ) -> PageLoad
    where
        H: HostScheduler + ?Sized,
    {
        let load_id = self.client.load_id().clone();
        let mut tasks = TaskTracker::new();
        for section in [SECTION_BANNER, SECTION_PRODUCTS, SECTION_WORKLOAD] {
            tasks.add_task(section);
        }
        let mut timing = TimingContext::new();
        timing.record(&LoadPhase::Start);

        let state = RefCell::new(LoadState {
            document,
            metrics: MetricsCollector::new(load_id.clone()),
            tasks,
            timing,
        });

        self.logger
            .info_builder("Page load started")
            .field("endpoint", self.config.catalog.endpoint.as_str())
            .field_u64("total_units", self.config.workload.total_units)
            .emit();

        let banner = async { self.run_banner(&state) };
        let products = self.run_products(&state);
        let workload = self.run_workload(&state, host, &mut on_chunk);
        let ((), (), summary) = futures::join!(banner, products, workload);

        let mut state = state.into_inner();
        state.timing.record(&LoadPhase::Completion);
        let failed = state.tasks.failed().len();
        self.logger
            .info_builder("Page load complete")
            .field_u64("failed_sections", failed as u64)
            .duration_ms("elapsed_ms", state.timing.elapsed())
            .emit();

        PageLoad {
            load_id,
            document: state.document,
            metrics: state.metrics.finalize(),
            tasks: state.tasks,
            timing: state.timing,
            workload: summary,
        }
    }

    fn run_banner(&self, state: &RefCell<LoadState>) {
        let logger = self.logger.for_component(SECTION_BANNER);
        let result = {
            let mut s = state.borrow_mut();
            s.start(SECTION_BANNER);
            show_top_bar(&mut s.document, &self.config.banner)
        };

        match result {
            Ok(shown) => {
                if !shown {
                    logger.debug("Country bar not found, skipped");
                }
                state.borrow_mut().succeed(SECTION_BANNER);
            }
            Err(e) => self.fail(state, SECTION_BANNER, Some(BANNER_SELECTOR), e.into()),
        }
    }

    async fn run_products(&self, state: &RefCell<LoadState>) {
        let logger = self.logger.for_component(SECTION_PRODUCTS);
        let endpoint = self.config.catalog.endpoint.as_str();
        state.borrow_mut().start(SECTION_PRODUCTS);

        let started = Instant::now();
        let fetched = load_products(&self.client, endpoint).await;

        let outcome: Result<usize, LoadError> = {
            let mut s = state.borrow_mut();
            let outcome = match fetched {
                Ok(fetched) => {
                    s.metrics.record_fetch(
                        endpoint,
                        fetched.duration,
                        Some(fetched.status),
                        Some(fetched.bytes),
                        true,
                    );
                    display_products(&mut s.document, &fetched.value)
                        .map(|cards| {
                            s.metrics.record_cards(cards);
                            cards
                        })
                        .map_err(LoadError::from)
                }
                Err(e) => {
                    let status = match &e {
                        FetchError::Status { status, .. } => Some(*status),
                        _ => None,
                    };
                    s.metrics
                        .record_fetch(endpoint, started.elapsed(), status, None, false);
                    Err(e.into())
                }
            };
            outcome
        };

        match outcome {
            Ok(cards) => {
                logger
                    .info_builder("Products rendered")
                    .field_u64("cards", cards as u64)
                    .duration_ms("fetch_ms", started.elapsed())
                    .emit();
                state.borrow_mut().succeed(SECTION_PRODUCTS);
            }
            Err(e) => self.fail(state, SECTION_PRODUCTS, Some(PRODUCTS_REGION_SELECTOR), e),
        }
    }

    async fn run_workload<H>(
        &self,
        state: &RefCell<LoadState>,
        host: &H,
        on_chunk: &mut impl FnMut(&ChunkReport),
    ) -> Option<WorkloadSummary>
    where
        H: HostScheduler + ?Sized,
    {
        let logger = self.logger.for_component(SECTION_WORKLOAD);
        state.borrow_mut().start(SECTION_WORKLOAD);

        let result = perform_heavy_calculation(&self.config.workload, host, |report| {
            state.borrow_mut().metrics.record_chunk(report.units());
            logger.trace(&format!("chunk {} done", report.index));
            on_chunk(report);
        })
        .await;

        match result {
            Ok(summary) => {
                logger
                    .debug_builder("Calculation finished")
                    .field_u64("chunks", summary.chunks as u64)
                    .field_u64("units", summary.processed)
                    .duration_ms("elapsed_ms", summary.elapsed)
                    .emit();
                state.borrow_mut().succeed(SECTION_WORKLOAD);
                Some(summary)
            }
            Err(e) => {
                self.fail(state, SECTION_WORKLOAD, None, e.into());
                None
            }
        }
    }

    fn fail(
        &self,
        state: &RefCell<LoadState>,
        section: &str,
        region: Option<&str>,
        error: LoadError,
    ) {
        self.logger
            .for_component(section)
            .warn_builder(format!("Section {} failed", section))
            .field("error", error.to_string())
            .field("kind", error.kind())
            .emit();

        let mut s = state.borrow_mut();
        let failure = SectionFailure {
            section,
            region,
            error: &error,
        };
        self.reporter.report(&mut s.document, &failure);
        s.fail(section, &error);
    }
}

impl std::fmt::Debug for PageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
