use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    api::StatusClient,
    config::AppConfig,
    infrastructure::{
        directories::ResolvedPaths,
        shutdown::{Shutdown, ShutdownReason},
    },
    render::HtmlPageView,
    tasks::{
        input::{self, ClientEvent},
        poller::Poller,
        refresh::AutoRefresh,
    },
};

const EVENT_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Refreshed,
    VisibilityChanged,
    Ignored,
    Quit,
}

pub struct DashboardApp {
    paths: ResolvedPaths,
    client: StatusClient,
    poller: Arc<Poller>,
    refresh: AutoRefresh,
    shutdown: Shutdown,
    events: mpsc::Receiver<ClientEvent>,
    input_tasks: Vec<JoinHandle<()>>,
}

impl DashboardApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("social-monitor-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to build http client")?;
        let client = StatusClient::new(http_client, config.api.clone());

        let view = Arc::new(HtmlPageView::new(paths.output_path.clone(), config.timezone));
        view.flush()
            .with_context(|| format!("cannot write {}", view.output_path().display()))?;

        let poller = Arc::new(Poller::new(
            Arc::new(client.clone()),
            view,
            config.refresh.indicator_min_visible,
        ));
        let refresh = AutoRefresh::new(poller.clone(), config.refresh.interval);

        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let mut input_tasks = vec![input::spawn_stdin_reader(tx.clone(), shutdown.subscribe())];
        input_tasks.extend(input::spawn_signal_refresh(tx));

        Ok(Self {
            paths,
            client,
            poller,
            refresh,
            shutdown,
            events,
            input_tasks,
        })
    }

    pub async fn run(self) -> Result<()> {
        let DashboardApp {
            paths,
            client,
            poller,
            mut refresh,
            shutdown,
            mut events,
            input_tasks,
        } = self;

        tracing::info!(
            target: "lifecycle",
            output = %paths.output_path.display(),
            "dashboard client started"
        );
        probe_health(&client).await;

        poller.spawn_refresh();
        refresh.start_auto_refresh();

        let mut shutdown_listener = shutdown.subscribe();
        loop {
            tokio::select! {
                reason = shutdown_listener.notified() => {
                    tracing::info!(target: "lifecycle", ?reason, "shutdown requested");
                    break;
                }
                Some(event) = events.recv() => {
                    if dispatch_event(event, &poller, &mut refresh) == Dispatch::Quit {
                        shutdown.trigger(ShutdownReason::UserQuit);
                    }
                }
            }
        }

        refresh.stop_auto_refresh();
        for task in input_tasks {
            task.abort();
        }
        if let Some(at) = poller.last_update() {
            tracing::info!(target: "lifecycle", last_update = %at, "dashboard client stopped");
        } else {
            tracing::info!(target: "lifecycle", "dashboard client stopped before first update");
        }
        Ok(())
    }
}

pub fn dispatch_event(event: ClientEvent, poller: &Arc<Poller>, refresh: &mut AutoRefresh) -> Dispatch {
    match event {
        ClientEvent::Key(key) if key.is_refresh_shortcut() => {
            tracing::info!(target: "input", key = %key.key, "manual refresh");
            poller.spawn_refresh();
            Dispatch::Refreshed
        }
        ClientEvent::Key(key) => {
            tracing::debug!(target: "input", ?key, "key ignored");
            Dispatch::Ignored
        }
        ClientEvent::Visibility(visibility) => {
            if refresh.set_visibility(visibility) {
                tracing::info!(
                    target: "refresh",
                    ?visibility,
                    state = ?refresh.state(),
                    timer_running = refresh.is_running(),
                    "visibility changed"
                );
                Dispatch::VisibilityChanged
            } else {
                Dispatch::Ignored
            }
        }
        ClientEvent::Quit => Dispatch::Quit,
    }
}

async fn probe_health(client: &StatusClient) {
    match client.health().await {
        Ok(health) => tracing::info!(
            target: "api",
            status = %health.status,
            service = health.service.as_deref().unwrap_or("unknown"),
            "monitoring service reachable"
        ),
        Err(err) => tracing::warn!(
            target: "api",
            error = %err,
            "health check failed; polling anyway"
        ),
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::{
        api::client::testing::ScriptedSource,
        render::view::testing::RecordingView,
        tasks::{input::KeyPress, refresh::Visibility},
    };

    fn harness() -> (Arc<Poller>, AutoRefresh, Arc<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::default());
        let poller = Arc::new(Poller::new(
            source.clone(),
            Arc::new(RecordingView::default()),
            Duration::from_millis(500),
        ));
        let refresh = AutoRefresh::new(poller.clone(), Duration::from_secs(10));
        (poller, refresh, source)
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_shortcut_polls_immediately() {
        let (poller, mut refresh, source) = harness();

        let outcome = dispatch_event(ClientEvent::Key(KeyPress::ctrl("r")), &poller, &mut refresh);
        assert_eq!(outcome, Dispatch::Refreshed);
        sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);

        let outcome = dispatch_event(ClientEvent::Key(KeyPress::plain("x")), &poller, &mut refresh);
        assert_eq!(outcome, Dispatch::Ignored);
        sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn visibility_events_drive_the_timer() {
        let (poller, mut refresh, source) = harness();
        refresh.start_auto_refresh();

        let hidden = ClientEvent::Visibility(Visibility::Hidden);
        assert_eq!(
            dispatch_event(hidden.clone(), &poller, &mut refresh),
            Dispatch::VisibilityChanged
        );
        assert_eq!(dispatch_event(hidden, &poller, &mut refresh), Dispatch::Ignored);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls(), 0);

        assert_eq!(
            dispatch_event(ClientEvent::Visibility(Visibility::Visible), &poller, &mut refresh),
            Dispatch::VisibilityChanged
        );
        sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn quit_is_reported() {
        let (poller, mut refresh, _source) = harness();
        assert_eq!(dispatch_event(ClientEvent::Quit, &poller, &mut refresh), Dispatch::Quit);
    }
}
