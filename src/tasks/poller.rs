use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::sleep};

use crate::{
    api::{
        response::{failure_text, NETWORK_ERROR_MESSAGE},
        PollOutcome, StatusSource,
    },
    domain::SummaryCounts,
    render::{DashboardView, TableContent},
};

/// Mutable state shared by all polls of one dashboard.
#[derive(Debug, Default)]
pub struct PollState {
    issued: AtomicU64,
    rendered: AtomicU64,
    last_update: Mutex<Option<DateTime<Utc>>>,
}

pub struct Poller {
    source: Arc<dyn StatusSource>,
    view: Arc<dyn DashboardView>,
    indicator_delay: Duration,
    state: PollState,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        view: Arc<dyn DashboardView>,
        indicator_delay: Duration,
    ) -> Self {
        Self {
            source,
            view,
            indicator_delay,
            state: PollState::default(),
        }
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.state.last_update.lock()
    }

    /// Runs one poll in the background. Overlapping polls are allowed.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let poller = self.clone();
        tokio::spawn(async move { poller.refresh_data().await })
    }

    pub async fn refresh_data(&self) {
        let seq = self.state.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.show_indicator();

        let outcome = PollOutcome::classify(self.source.fetch_status().await);

        // Only the newest poll to complete may touch the table; an older
        // response arriving late is dropped.
        let previous = self.state.rendered.fetch_max(seq, Ordering::SeqCst);
        if previous < seq {
            self.apply(outcome);
        } else {
            tracing::debug!(
                target: "poller",
                seq,
                newer = previous,
                outcome = outcome.kind(),
                "dropping stale poll result"
            );
        }

        self.schedule_hide_indicator();
    }

    fn apply(&self, outcome: PollOutcome) {
        match outcome {
            PollOutcome::Success(platforms) => {
                let counts = SummaryCounts::from_platforms(&platforms);
                let total = platforms.len();
                self.view.render_table(TableContent::from_platforms(platforms));
                self.view.render_summary(counts);

                let now = Utc::now();
                *self.state.last_update.lock() = Some(now);
                self.view.render_last_updated(now);
                tracing::info!(target: "poller", platforms = total, "dashboard refreshed");
            }
            PollOutcome::Failure(message) => {
                tracing::warn!(target: "poller", message = %message, "status endpoint reported failure");
                self.view
                    .render_table(TableContent::Error(failure_text(&message)));
            }
            PollOutcome::Transport(err) => {
                tracing::error!(target: "poller", error = %err, "error fetching dashboard status");
                self.view
                    .render_table(TableContent::Error(NETWORK_ERROR_MESSAGE.to_string()));
            }
        }
    }

    fn schedule_hide_indicator(&self) {
        let view = self.view.clone();
        let delay = self.indicator_delay;
        tokio::spawn(async move {
            sleep(delay).await;
            view.hide_indicator();
        });
    }
}
