//! Runs a registry against a table set.
//!
//! Every entry is considered exactly once, in registry order. Entries outside
//! the selection are recorded as skipped without being touched. The rest are
//! pulled off a shared cursor by a bounded pool of scoped worker threads and
//! evaluated behind a fault boundary:
//!
//! - `RuleError::MissingMetadata` becomes `Skipped(missing-metadata)`
//! - `RuleError::Unhandled` and panics become `Failed(unhandled)`
//! - locations naming an unknown table or row become `Failed(invalid-result)`
//!
//! Results are slotted back by registry position, so the outcome list does
//! not depend on which worker finished first.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use lac_model::{
    FailureKind, Locations, RuleError, RuleOutcome, RuleStatus, SkipReason, TableSet,
};

use crate::error::ValidateError;
use crate::registry::Registry;
use crate::rule::RuleEntry;

/// Shared flag a caller can flip to stop a run early.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request early termination. Rules already running still finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Why a run stopped before evaluating every selected rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CancelReason {
    /// The caller's [`CancelFlag`] was set.
    Requested,
    /// The number of failed rules reached the configured limit.
    FailureThreshold { limit: usize },
    /// The run exceeded its time budget.
    Deadline,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => write!(f, "cancelled by caller"),
            Self::FailureThreshold { limit } => write!(f, "{limit} rule failures reached"),
            Self::Deadline => write!(f, "time budget exceeded"),
        }
    }
}

/// Run configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    selection: Option<BTreeSet<String>>,
    workers: usize,
    failure_threshold: Option<usize>,
    deadline: Option<Duration>,
    cancel: CancelFlag,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            selection: None,
            workers: thread::available_parallelism().map_or(1, usize::from),
            failure_threshold: None,
            deadline: None,
            cancel: CancelFlag::default(),
        }
    }
}

impl RunOptions {
    /// Evaluate only these codes; every other entry is skipped.
    #[must_use]
    pub fn with_selection<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    /// Worker thread count. Zero is treated as one.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Stop dispatching once this many rules have failed.
    #[must_use]
    pub fn with_failure_threshold(mut self, limit: usize) -> Self {
        self.failure_threshold = Some(limit);
        self
    }

    /// Stop dispatching once the run has taken longer than `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn selection(&self) -> Option<&BTreeSet<String>> {
        self.selection.as_ref()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn is_selected(&self, code: &str) -> bool {
        self.selection
            .as_ref()
            .is_none_or(|selection| selection.contains(code))
    }
}

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[RuleOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status {
                RuleStatus::Success { .. } => summary.succeeded += 1,
                RuleStatus::Skipped { .. } => summary.skipped += 1,
                RuleStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

/// Ordered outcomes of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub version: String,
    pub outcomes: Vec<RuleOutcome>,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<CancelReason>,
}

impl RunResult {
    fn new(version: &str, outcomes: Vec<RuleOutcome>, cancelled: Option<CancelReason>) -> Self {
        let summary = RunSummary::from_outcomes(&outcomes);
        Self {
            version: version.to_string(),
            outcomes,
            summary,
            cancelled,
        }
    }

    pub fn outcome(&self, code: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|outcome| outcome.code == code)
    }

    /// True when every considered rule has an outcome.
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_none()
    }
}

/// Runs the rules of one registry.
#[derive(Debug)]
pub struct Orchestrator<'r> {
    registry: &'r Registry,
    options: RunOptions,
}

impl<'r> Orchestrator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: RunOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Evaluate the whole registry against `tables`.
    ///
    /// Always returns one outcome per considered entry unless the run was
    /// cancelled, in which case entries never dispatched have no outcome and
    /// `RunResult::cancelled` says why.
    pub fn run(&self, tables: &TableSet) -> RunResult {
        let entries = self.registry.entries();
        let span = info_span!(
            "validation_run",
            version = %self.registry.version(),
            rules = entries.len()
        );
        let _guard = span.enter();

        if let Some(selection) = self.options.selection() {
            for code in self.registry.unknown_codes(selection) {
                warn!(code, "selected code is not in the rule set");
            }
        }

        let mut slots: Vec<Option<RuleOutcome>> = vec![None; entries.len()];
        let mut pending = Vec::new();
        for (position, entry) in entries.iter().enumerate() {
            if self.options.is_selected(entry.code()) {
                pending.push(position);
            } else {
                slots[position] = Some(RuleOutcome::skipped(entry.code(), SkipReason::Selection));
            }
        }

        let dispatch = Dispatch::new(&pending, &self.options);
        let workers = self.options.workers().min(pending.len()).max(1);
        debug!(pending = pending.len(), workers, "dispatching rules");

        let finished = if workers == 1 {
            drain(entries, tables, &dispatch)
        } else {
            thread::scope(|scope| {
                let handles: Vec<_> = (0..workers)
                    .map(|_| scope.spawn(|| drain(entries, tables, &dispatch)))
                    .collect();
                let mut finished = Vec::with_capacity(pending.len());
                for handle in handles {
                    match handle.join() {
                        Ok(results) => finished.extend(results),
                        Err(_) => warn!("validation worker terminated unexpectedly"),
                    }
                }
                finished
            })
        };

        for (position, outcome) in finished {
            slots[position] = Some(outcome);
        }

        let cancelled = dispatch.into_reason();
        if let Some(reason) = cancelled {
            warn!(%reason, "validation run stopped early");
        }

        let result = RunResult::new(
            self.registry.version(),
            slots.into_iter().flatten().collect(),
            cancelled,
        );
        info!(
            succeeded = result.summary.succeeded,
            skipped = result.summary.skipped,
            failed = result.summary.failed,
            "validation run finished"
        );
        result
    }

    /// Evaluate a single code, producing the same shape as a one-rule batch.
    pub fn run_single(&self, code: &str, tables: &TableSet) -> Result<RunResult, ValidateError> {
        let entry = self
            .registry
            .get(code)
            .ok_or_else(|| ValidateError::UnknownCode {
                code: code.to_string(),
                version: self.registry.version().to_string(),
            })?;
        let span = info_span!("validation_run", version = %self.registry.version(), code);
        let _guard = span.enter();

        let outcome = evaluate_entry(entry, tables);
        Ok(RunResult::new(self.registry.version(), vec![outcome], None))
    }
}

/// Shared dispatch state for one run.
struct Dispatch<'a> {
    pending: &'a [usize],
    cursor: AtomicUsize,
    failures: AtomicUsize,
    started: Instant,
    options: &'a RunOptions,
    stopped: Mutex<Option<CancelReason>>,
}

impl<'a> Dispatch<'a> {
    fn new(pending: &'a [usize], options: &'a RunOptions) -> Self {
        Self {
            pending,
            cursor: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            started: Instant::now(),
            options,
            stopped: Mutex::new(None),
        }
    }

    /// Claim the next registry position, or `None` when the run is over.
    fn next(&self) -> Option<usize> {
        if self.cursor.load(Ordering::Acquire) >= self.pending.len() || self.is_stopped() {
            return None;
        }
        if let Some(reason) = self.stop_reason() {
            self.stop(reason);
            return None;
        }
        let claimed = self.cursor.fetch_add(1, Ordering::AcqRel);
        self.pending.get(claimed).copied()
    }

    fn stop_reason(&self) -> Option<CancelReason> {
        if self.options.cancel.is_cancelled() {
            return Some(CancelReason::Requested);
        }
        if let Some(limit) = self.options.failure_threshold
            && self.failures.load(Ordering::Acquire) >= limit
        {
            return Some(CancelReason::FailureThreshold { limit });
        }
        if let Some(deadline) = self.options.deadline
            && self.started.elapsed() >= deadline
        {
            return Some(CancelReason::Deadline);
        }
        None
    }

    fn is_stopped(&self) -> bool {
        self.stopped
            .lock()
            .map(|stopped| stopped.is_some())
            .unwrap_or(true)
    }

    fn stop(&self, reason: CancelReason) {
        if let Ok(mut stopped) = self.stopped.lock() {
            stopped.get_or_insert(reason);
        }
    }

    fn record(&self, outcome: &RuleOutcome) {
        if outcome.is_failed() {
            self.failures.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn into_reason(self) -> Option<CancelReason> {
        self.stopped.into_inner().ok().flatten()
    }
}

/// Worker loop: evaluate claimed entries until the dispatch runs dry.
fn drain(
    entries: &[RuleEntry],
    tables: &TableSet,
    dispatch: &Dispatch<'_>,
) -> Vec<(usize, RuleOutcome)> {
    let mut finished = Vec::new();
    while let Some(position) = dispatch.next() {
        let outcome = evaluate_entry(&entries[position], tables);
        dispatch.record(&outcome);
        finished.push((position, outcome));
    }
    finished
}

/// Evaluate one entry inside the fault boundary.
fn evaluate_entry(entry: &RuleEntry, tables: &TableSet) -> RuleOutcome {
    let code = entry.code();

    let missing = entry.definition().missing_tables(|table| tables.contains(table));
    if !missing.is_empty() {
        debug!(code, ?missing, "required tables absent, vacuous pass");
        return RuleOutcome::success(code, Locations::new());
    }

    let started = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| entry.evaluate(tables)));
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let outcome = match result {
        Ok(Ok(locations)) => match check_locations(&locations, tables) {
            Ok(()) => RuleOutcome::success(code, locations),
            Err(detail) => RuleOutcome::failed(code, FailureKind::InvalidResult, detail),
        },
        Ok(Err(RuleError::MissingMetadata { key })) => {
            RuleOutcome::skipped(code, SkipReason::MissingMetadata { key })
        }
        Ok(Err(RuleError::Unhandled { message })) => {
            RuleOutcome::failed(code, FailureKind::Unhandled, message)
        }
        Err(payload) => RuleOutcome::failed(
            code,
            FailureKind::Unhandled,
            format!("rule panicked: {}", panic_message(payload.as_ref())),
        ),
    };

    match &outcome.status {
        RuleStatus::Success { locations } => {
            debug!(code, elapsed_ms, flagged = locations.total_rows(), "rule evaluated");
        }
        RuleStatus::Skipped { reason } => {
            debug!(code, elapsed_ms, %reason, "rule skipped");
        }
        RuleStatus::Failed { kind, detail } => {
            warn!(code, elapsed_ms, kind = kind.label(), %detail, "rule failed");
        }
    }
    outcome
}

/// Every table must exist and every row must be inside it.
fn check_locations(locations: &Locations, tables: &TableSet) -> Result<(), String> {
    for (table, rows) in locations.iter() {
        let Some(height) = tables.height(table) else {
            return Err(format!("table '{table}' is not in the table set"));
        };
        if let Some(&row) = rows.last()
            && row >= height
        {
            return Err(format!(
                "row {row} is out of range for table '{table}' ({height} rows)"
            ));
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
