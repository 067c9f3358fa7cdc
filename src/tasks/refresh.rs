use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use super::poller::Poller;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Active,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Owns the repeating poll timer and the Active/Paused state machine.
pub struct AutoRefresh {
    poller: Arc<Poller>,
    period: Duration,
    timer: Option<JoinHandle<()>>,
    state: RefreshState,
}

impl AutoRefresh {
    pub fn new(poller: Arc<Poller>, period: Duration) -> Self {
        Self {
            poller,
            period,
            timer: None,
            state: RefreshState::Active,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Starts polling every period; the first tick fires one period from now.
    /// Replaces any timer that is already running.
    pub fn start_auto_refresh(&mut self) {
        self.stop_auto_refresh();

        let poller = self.poller.clone();
        let period = self.period;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!(target: "refresh", "timer tick");
                poller.spawn_refresh();
            }
        }));
        tracing::info!(target: "refresh", period_ms = period.as_millis() as u64, "auto refresh started");
    }

    pub fn stop_auto_refresh(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            tracing::info!(target: "refresh", "auto refresh stopped");
        }
    }

    /// Returns true when the transition changed the state.
    pub fn set_visibility(&mut self, visibility: Visibility) -> bool {
        match (self.state, visibility) {
            (RefreshState::Active, Visibility::Hidden) => {
                self.stop_auto_refresh();
                self.state = RefreshState::Paused;
                true
            }
            (RefreshState::Paused, Visibility::Visible) => {
                self.poller.spawn_refresh();
                self.start_auto_refresh();
                self.state = RefreshState::Active;
                true
            }
            (state, visibility) => {
                tracing::debug!(target: "refresh", ?state, ?visibility, "visibility unchanged");
                false
            }
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::{api::client::testing::ScriptedSource, render::view::testing::RecordingView};

    const PERIOD: Duration = Duration::from_secs(10);

    fn auto_refresh() -> (AutoRefresh, Arc<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::default());
        let view = Arc::new(RecordingView::default());
        let poller = Arc::new(Poller::new(
            source.clone(),
            view,
            Duration::from_millis(500),
        ));
        (AutoRefresh::new(poller, PERIOD), source)
    }

    #[tokio::test(start_paused = true)]
    async fn polls_once_per_period_after_start() {
        let (mut refresh, source) = auto_refresh();
        refresh.start_auto_refresh();

        sleep(Duration::from_millis(9_900)).await;
        assert_eq!(source.calls(), 0);

        sleep(Duration::from_millis(15_200)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_a_noop_without_timer() {
        let (mut refresh, _source) = auto_refresh();
        refresh.stop_auto_refresh();
        refresh.stop_auto_refresh();
        assert!(!refresh.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_keeps_a_single_timer() {
        let (mut refresh, source) = auto_refresh();
        refresh.start_auto_refresh();
        refresh.start_auto_refresh();

        sleep(Duration::from_millis(10_100)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_pauses_and_visible_polls_immediately() {
        let (mut refresh, source) = auto_refresh();
        refresh.start_auto_refresh();
        assert_eq!(refresh.state(), RefreshState::Active);

        assert!(refresh.set_visibility(Visibility::Hidden));
        assert_eq!(refresh.state(), RefreshState::Paused);
        assert!(!refresh.is_running());

        sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls(), 0);

        assert!(!refresh.set_visibility(Visibility::Hidden));

        assert!(refresh.set_visibility(Visibility::Visible));
        assert_eq!(refresh.state(), RefreshState::Active);
        sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);

        sleep(Duration::from_millis(10_000)).await;
        assert_eq!(source.calls(), 2);

        assert!(!refresh.set_visibility(Visibility::Visible));
    }
}
