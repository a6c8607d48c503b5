//! Refresh state machine
//!
//! ```text
//! idle -> in-progress -> succeeded | failed -> idle
//! ```
//!
//! Manual and automatic refreshes share one guard, so at most one
//! attempt is ever in flight. Progress labels run on their own timer and
//! are dropped as soon as the real operation completes. The notifier is
//! never called with the state lock held, so it may read the state or
//! request another refresh from inside a callback.

use super::marker::LastUpdateMarker;
use super::progress::ProgressSchedule;
use crate::api::PriceApi;
use crate::clock::Clock;
use crate::events::{toast, Event, Notifier, ToastVariant};
use crate::store::ProductStore;
use chrono::{DateTime, Utc};
use chrono_tz::Europe::Sofia;
use parking_lot::{Mutex, ReentrantMutex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// What started a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshTrigger {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub updated: u32,
    pub completed_at: DateTime<Utc>,
    pub message: String,
    pub trigger: RefreshTrigger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RefreshState {
    Idle,
    InProgress { stage: String, trigger: RefreshTrigger },
    Succeeded(RefreshSummary),
    Failed { reason: String, trigger: RefreshTrigger },
}

impl RefreshState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, RefreshState::InProgress { .. })
    }
}

/// Result of asking for a refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "state", rename_all = "camelCase")]
pub enum RefreshOutcome {
    /// This call ran an attempt; carries its terminal state
    Completed(RefreshState),
    /// Another attempt was already running; carries its current state
    AlreadyRunning(RefreshState),
}

struct Inner {
    state: RefreshState,
    attempt: Option<Uuid>,
    last_outcome: Option<RefreshState>,
}

pub struct RefreshOrchestrator {
    api: Arc<dyn PriceApi>,
    store: Arc<ProductStore>,
    marker: Arc<LastUpdateMarker>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    schedule: ProgressSchedule,
    inner: Arc<Mutex<Inner>>,
    /// Serializes event publication. Never taken while `inner` is held,
    /// and `inner` is always released before the notifier runs.
    publishing: Arc<ReentrantMutex<()>>,
}

impl RefreshOrchestrator {
    pub fn new(
        api: Arc<dyn PriceApi>,
        store: Arc<ProductStore>,
        marker: Arc<LastUpdateMarker>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            store,
            marker,
            clock,
            notifier,
            schedule: ProgressSchedule::default(),
            inner: Arc::new(Mutex::new(Inner {
                state: RefreshState::Idle,
                attempt: None,
                last_outcome: None,
            })),
            publishing: Arc::new(ReentrantMutex::new(())),
        }
    }

    pub fn with_schedule(mut self, schedule: ProgressSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn state(&self) -> RefreshState {
        self.inner.lock().state.clone()
    }

    pub fn is_in_progress(&self) -> bool {
        self.inner.lock().state.is_in_progress()
    }

    /// Terminal state of the most recent finished attempt
    pub fn last_outcome(&self) -> Option<RefreshState> {
        self.inner.lock().last_outcome.clone()
    }

    /// Run one refresh attempt, unless one is already in flight.
    ///
    /// The attempt runs on its own task: dropping the returned future only
    /// stops waiting for it, the attempt still completes and returns the
    /// orchestrator to idle.
    pub async fn refresh(self: &Arc<Self>, trigger: RefreshTrigger) -> RefreshOutcome {
        let attempt = match self.try_begin(trigger) {
            Ok(attempt) => attempt,
            Err(current) => {
                info!("Refresh already in progress, ignoring {:?} trigger", trigger);
                return RefreshOutcome::AlreadyRunning(current);
            }
        };

        let this = Arc::clone(self);
        let task = tokio::spawn(async move {
            let span = info_span!("refresh", %attempt, ?trigger);
            let labels = this.spawn_progress_labels(attempt);
            let terminal = this.run_attempt(trigger).instrument(span).await;
            labels.abort();

            this.finish(attempt, terminal.clone());
            terminal
        });

        let terminal = match task.await {
            Ok(terminal) => terminal,
            Err(e) => {
                error!("Refresh attempt {} ended abnormally: {}", attempt, e);
                let terminal = RefreshState::Failed {
                    reason: format!("Refresh ended unexpectedly: {}", e),
                    trigger,
                };
                self.finish(attempt, terminal.clone());
                terminal
            }
        };

        RefreshOutcome::Completed(terminal)
    }

    fn publish(notifier: &dyn Notifier, state: RefreshState) {
        Event::RefreshState { state }.notify(notifier);
    }

    /// Check-and-set the in-progress state in one critical section
    fn try_begin(&self, trigger: RefreshTrigger) -> Result<Uuid, RefreshState> {
        let _publishing = self.publishing.lock();

        let (attempt, state) = {
            let mut inner = self.inner.lock();
            if inner.state.is_in_progress() {
                return Err(inner.state.clone());
            }

            let attempt = Uuid::new_v4();
            inner.attempt = Some(attempt);
            inner.state = RefreshState::InProgress {
                stage: self.schedule.initial_label().to_string(),
                trigger,
            };
            (attempt, inner.state.clone())
        };

        Self::publish(self.notifier.as_ref(), state);
        Ok(attempt)
    }

    fn spawn_progress_labels(&self, attempt: Uuid) -> JoinHandle<()> {
        let stages = self.schedule.later_stages().to_vec();
        let inner = Arc::clone(&self.inner);
        let publishing = Arc::clone(&self.publishing);
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            for next in stages {
                tokio::time::sleep_until(started + next.offset).await;

                let _publishing = publishing.lock();
                let state = {
                    let mut guard = inner.lock();
                    if guard.attempt != Some(attempt) {
                        return;
                    }
                    if let RefreshState::InProgress { stage, .. } = &mut guard.state {
                        *stage = next.label;
                    }
                    guard.state.clone()
                };
                debug!("Refresh progress: {:?}", state);
                Self::publish(notifier.as_ref(), state);
            }
        })
    }

    async fn run_attempt(&self, trigger: RefreshTrigger) -> RefreshState {
        info!("Starting price refresh");

        let outcome = match self.api.trigger_scrape().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Price refresh failed: {}", e);
                return RefreshState::Failed {
                    reason: e.to_string(),
                    trigger,
                };
            }
        };

        if !outcome.success {
            warn!("Scraper reported failure: {}", outcome.message);
            let reason = if outcome.message.trim().is_empty() {
                "Scraper reported a failure".to_string()
            } else {
                outcome.message
            };
            return RefreshState::Failed { reason, trigger };
        }

        let products = match self.api.fetch_all_products().await {
            Ok(products) => products,
            Err(e) => {
                warn!("Prices scraped but reloading products failed: {}", e);
                return RefreshState::Failed {
                    reason: format!("Reloading products failed: {}", e),
                    trigger,
                };
            }
        };

        self.store.replace(products);
        let now = self.clock.now();
        self.marker.mark_refreshed(now);

        info!("Price refresh completed: {} products updated", outcome.updated);
        RefreshState::Succeeded(RefreshSummary {
            updated: outcome.updated,
            completed_at: now,
            message: outcome.message,
            trigger,
        })
    }

    /// Publish the terminal state, notify, and return to idle
    fn finish(&self, attempt: Uuid, terminal: RefreshState) {
        let _publishing = self.publishing.lock();

        {
            let mut inner = self.inner.lock();
            if inner.attempt != Some(attempt) {
                warn!("Refresh attempt {} finished after losing ownership", attempt);
                return;
            }
            inner.state = terminal.clone();
        }

        Self::publish(self.notifier.as_ref(), terminal.clone());
        match &terminal {
            RefreshState::Succeeded(summary) => toast(
                ToastVariant::Success,
                format!(
                    "Prices updated successfully. Updated products: {}. Time: {}",
                    summary.updated,
                    summary.completed_at.with_timezone(&Sofia).format("%H:%M:%S")
                ),
                self.notifier.as_ref(),
            ),
            RefreshState::Failed { reason, .. } => toast(
                ToastVariant::Error,
                format!("Price refresh failed: {}", reason),
                self.notifier.as_ref(),
            ),
            _ => {}
        }

        {
            let mut inner = self.inner.lock();
            inner.last_outcome = Some(terminal);
            inner.attempt = None;
            inner.state = RefreshState::Idle;
        }
        Self::publish(self.notifier.as_ref(), RefreshState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{product, ScriptedApi};
    use crate::api::types::{Category, ScrapeOutcome};
    use crate::clock::testing::ManualClock;
    use crate::events::testing::RecordingNotifier;
    use crate::refresh::progress::ProgressStage;
    use chrono::TimeZone;
    use std::sync::Weak;
    use std::time::Duration;

    struct Harness {
        api: Arc<ScriptedApi>,
        store: Arc<ProductStore>,
        marker: Arc<LastUpdateMarker>,
        notifier: Arc<RecordingNotifier>,
        orchestrator: Arc<RefreshOrchestrator>,
    }

    fn server_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 2, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn harness(api: ScriptedApi) -> Harness {
        let api = Arc::new(api);
        let store = Arc::new(ProductStore::new());
        store.replace(vec![product(1, Category::Gold, 250000, 31.1)]);
        let marker = Arc::new(LastUpdateMarker::new());
        marker.seed_from_server(Some(server_time()));
        let notifier = Arc::new(RecordingNotifier::default());
        let orchestrator = Arc::new(RefreshOrchestrator::new(
            api.clone(),
            store.clone(),
            marker.clone(),
            Arc::new(ManualClock::at(now())),
            notifier.clone(),
        ));
        Harness {
            api,
            store,
            marker,
            notifier,
            orchestrator,
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..1000 {
            if condition() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition never became true");
    }

    #[tokio::test]
    async fn test_successful_refresh_replaces_snapshot_and_marker() {
        let api = ScriptedApi::new(vec![product(1, Category::Gold, 250000, 31.1)])
            .with_refreshed(vec![
                product(1, Category::Gold, 251000, 31.1),
                product(2, Category::Silver, 9500, 31.1),
            ])
            .with_scrape(ScrapeOutcome {
                success: true,
                updated: 2,
                message: "Updated 2 products".to_string(),
            });
        let h = harness(api);

        let outcome = h.orchestrator.refresh(RefreshTrigger::Manual).await;

        match outcome {
            RefreshOutcome::Completed(RefreshState::Succeeded(summary)) => {
                assert_eq!(summary.updated, 2);
                assert_eq!(summary.completed_at, now());
                assert_eq!(summary.trigger, RefreshTrigger::Manual);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(h.api.scrape_calls(), 1);
        assert_eq!(h.store.snapshot().len(), 2);
        assert_eq!(h.marker.get(), Some(now()));
        assert_eq!(h.orchestrator.state(), RefreshState::Idle);
        assert!(matches!(h.orchestrator.last_outcome(), Some(RefreshState::Succeeded(_))));

        let states = h.notifier.states();
        assert!(states[0].is_in_progress());
        assert!(matches!(states[states.len() - 2], RefreshState::Succeeded(_)));
        assert_eq!(states[states.len() - 1], RefreshState::Idle);

        let toasts = h.notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].0, ToastVariant::Success);
        assert!(toasts[0].1.contains("Updated products: 2"));
    }

    #[tokio::test]
    async fn test_reported_failure_leaves_data_untouched() {
        let api = ScriptedApi::new(vec![])
            .with_refreshed(vec![product(9, Category::Silver, 100, 1.0)])
            .with_scrape(ScrapeOutcome {
                success: false,
                updated: 0,
                message: "Tavex timed out".to_string(),
            });
        let h = harness(api);

        let outcome = h.orchestrator.refresh(RefreshTrigger::Automatic).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed(RefreshState::Failed {
                reason: "Tavex timed out".to_string(),
                trigger: RefreshTrigger::Automatic,
            })
        );
        assert_eq!(h.marker.get(), Some(server_time()));
        assert_eq!(h.store.snapshot()[0].id, 1);
        assert_eq!(h.api.fetch_calls(), 0);
        assert_eq!(h.orchestrator.state(), RefreshState::Idle);

        let toasts = h.notifier.toasts();
        assert_eq!(toasts[0].0, ToastVariant::Error);
        assert!(toasts[0].1.contains("Tavex timed out"));
    }

    #[tokio::test]
    async fn test_remote_error_becomes_failed_state() {
        let h = harness(ScriptedApi::new(vec![]).with_scrape_error("connection refused"));

        let outcome = h.orchestrator.refresh(RefreshTrigger::Manual).await;

        match outcome {
            RefreshOutcome::Completed(RefreshState::Failed { reason, .. }) => {
                assert!(reason.contains("connection refused"))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(h.marker.get(), Some(server_time()));
        assert_eq!(h.orchestrator.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn test_reload_failure_after_scrape_keeps_old_snapshot() {
        let h = harness(ScriptedApi::new(vec![product(5, Category::Gold, 1, 1.0)]));
        h.api.fail_fetches(true);

        let outcome = h.orchestrator.refresh(RefreshTrigger::Manual).await;

        assert!(matches!(outcome, RefreshOutcome::Completed(RefreshState::Failed { .. })));
        assert_eq!(h.store.snapshot()[0].id, 1);
        assert_eq!(h.marker.get(), Some(server_time()));
    }

    #[tokio::test]
    async fn test_second_trigger_while_running_is_a_no_op() {
        let (api, gate) = ScriptedApi::new(vec![]).gated();
        let h = harness(api);

        let first = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.refresh(RefreshTrigger::Manual).await })
        };
        let orchestrator = h.orchestrator.clone();
        wait_until(|| orchestrator.is_in_progress()).await;

        let second = h.orchestrator.refresh(RefreshTrigger::Automatic).await;
        match second {
            RefreshOutcome::AlreadyRunning(RefreshState::InProgress { trigger, .. }) => {
                assert_eq!(trigger, RefreshTrigger::Manual)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        gate.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, RefreshOutcome::Completed(RefreshState::Succeeded(_))));
        assert_eq!(h.api.scrape_calls(), 1);

        // Idle again: a new attempt may start
        gate.notify_one();
        h.orchestrator.refresh(RefreshTrigger::Manual).await;
        assert_eq!(h.api.scrape_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_labels_follow_schedule() {
        let (api, gate) = ScriptedApi::new(vec![]).gated();
        let h = harness(api);

        let running = {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.refresh(RefreshTrigger::Manual).await })
        };
        let orchestrator = h.orchestrator.clone();
        wait_until(|| orchestrator.is_in_progress()).await;
        assert!(matches!(
            h.orchestrator.state(),
            RefreshState::InProgress { ref stage, .. } if stage == "Starting price refresh..."
        ));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(matches!(
            h.orchestrator.state(),
            RefreshState::InProgress { ref stage, .. } if stage == "Fetching prices from Top Gold..."
        ));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(matches!(
            h.orchestrator.state(),
            RefreshState::InProgress { ref stage, .. } if stage == "Fetching prices from Tavex..."
        ));

        gate.notify_one();
        running.await.unwrap();
        assert_eq!(h.orchestrator.state(), RefreshState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_labels_never_follow_terminal_state() {
        let h = harness(ScriptedApi::new(vec![]));
        let orchestrator = Arc::new(
            RefreshOrchestrator::new(
                h.api.clone(),
                h.store.clone(),
                h.marker.clone(),
                Arc::new(ManualClock::at(now())),
                h.notifier.clone(),
            )
            .with_schedule(ProgressSchedule::new(vec![
                ProgressStage::new(0, "start"),
                ProgressStage::new(10, "dealer one"),
                ProgressStage::new(20, "dealer two"),
            ])),
        );

        orchestrator.refresh(RefreshTrigger::Manual).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        let states = h.notifier.states();
        let terminal = states
            .iter()
            .position(|s| matches!(s, RefreshState::Succeeded(_)))
            .unwrap();
        assert!(states[terminal..].iter().all(|s| !s.is_in_progress()));
        assert_eq!(states.last(), Some(&RefreshState::Idle));
        assert_eq!(orchestrator.state(), RefreshState::Idle);
    }

    /// Reads the orchestrator back from inside every callback
    #[derive(Default)]
    struct ReadBackNotifier {
        orchestrator: Mutex<Weak<RefreshOrchestrator>>,
        seen: Mutex<Vec<(String, bool, RefreshState)>>,
    }

    impl Notifier for ReadBackNotifier {
        fn notify(&self, event: &Event) {
            if let Some(orchestrator) = self.orchestrator.lock().upgrade() {
                let reading = (
                    event.name().to_string(),
                    orchestrator.is_in_progress(),
                    orchestrator.state(),
                );
                self.seen.lock().push(reading);
            }
        }
    }

    #[tokio::test]
    async fn test_notifier_may_read_state_during_callbacks() {
        let notifier = Arc::new(ReadBackNotifier::default());
        let orchestrator = Arc::new(RefreshOrchestrator::new(
            Arc::new(ScriptedApi::new(vec![]).with_scrape(ScrapeOutcome {
                success: true,
                updated: 3,
                message: "ok".to_string(),
            })),
            Arc::new(ProductStore::new()),
            Arc::new(LastUpdateMarker::new()),
            Arc::new(ManualClock::at(now())),
            notifier.clone(),
        ));
        *notifier.orchestrator.lock() = Arc::downgrade(&orchestrator);

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            orchestrator.refresh(RefreshTrigger::Manual),
        )
        .await
        .expect("refresh must not block on its own notifier");

        assert!(matches!(outcome, RefreshOutcome::Completed(RefreshState::Succeeded(_))));

        let seen = notifier.seen.lock().clone();
        assert!(seen[0].1, "in progress while the start is published");
        assert!(matches!(seen[1].2, RefreshState::Succeeded(_)));
        assert!(!seen[1].1);
        let (name, in_progress, state) = seen.last().unwrap();
        assert_eq!(name, "refresh-state");
        assert!(!in_progress);
        assert_eq!(*state, RefreshState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_caller_does_not_wedge_the_guard() {
        let (api, gate) = ScriptedApi::new(vec![]).gated();
        let h = harness(api);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            h.orchestrator.refresh(RefreshTrigger::Manual),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(h.orchestrator.is_in_progress());

        // The attempt keeps running without its caller and settles on its own
        gate.notify_one();
        let orchestrator = h.orchestrator.clone();
        wait_until(|| !orchestrator.is_in_progress()).await;
        assert_eq!(h.orchestrator.state(), RefreshState::Idle);
        assert!(matches!(h.orchestrator.last_outcome(), Some(RefreshState::Succeeded(_))));

        gate.notify_one();
        let next = h.orchestrator.refresh(RefreshTrigger::Automatic).await;
        assert!(matches!(next, RefreshOutcome::Completed(RefreshState::Succeeded(_))));
        assert_eq!(h.api.scrape_calls(), 2);
    }
}
