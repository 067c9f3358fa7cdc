use std::io::IsTerminal;

use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
};

use crate::infrastructure::shutdown::ShutdownListener;

use super::refresh::Visibility;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    /// Ctrl+R, Cmd+R or F5.
    pub fn is_refresh_shortcut(&self) -> bool {
        ((self.ctrl || self.meta) && self.key == "r") || self.key == "F5"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Key(KeyPress),
    Visibility(Visibility),
    Quit,
}

pub fn parse_command(line: &str) -> Option<ClientEvent> {
    let command = line.trim().to_ascii_lowercase();
    if command.is_empty() {
        return None;
    }

    let event = match command.as_str() {
        "quit" | "exit" | "q" => ClientEvent::Quit,
        "hide" | "hidden" => ClientEvent::Visibility(Visibility::Hidden),
        "show" | "visible" => ClientEvent::Visibility(Visibility::Visible),
        "refresh" => ClientEvent::Key(KeyPress::ctrl("r")),
        "f5" => ClientEvent::Key(KeyPress::plain("F5")),
        other => match other.split_once('+') {
            Some(("ctrl", key)) if !key.is_empty() => ClientEvent::Key(KeyPress::ctrl(key)),
            Some(("cmd" | "meta", key)) if !key.is_empty() => ClientEvent::Key(KeyPress {
                meta: true,
                ..KeyPress::plain(key)
            }),
            Some(_) => return None,
            None => ClientEvent::Key(KeyPress::plain(other)),
        },
    };
    Some(event)
}

/// Reads commands from stdin until shutdown. End of input quits the client
/// only when stdin is a terminal; a detached stdin just stops being read.
pub fn spawn_stdin_reader(
    events: mpsc::Sender<ClientEvent>,
    mut shutdown: ShutdownListener,
) -> JoinHandle<()> {
    let interactive = std::io::stdin().is_terminal();
    tokio::spawn(async move {
        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = shutdown.notified() => break,
            };

            match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(event) => {
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        if !line.trim().is_empty() {
                            tracing::warn!(target: "input", command = %line.trim(), "unknown command");
                        }
                    }
                },
                Ok(None) => {
                    if interactive {
                        let _ = events.send(ClientEvent::Quit).await;
                    }
                    break;
                }
                Err(err) => {
                    tracing::warn!(target: "input", error = %err, "stdin read failed");
                    break;
                }
            }
        }
        tracing::debug!(target: "input", "stdin reader stopped");
    })
}

/// SIGUSR1 acts as the refresh shortcut.
#[cfg(unix)]
pub fn spawn_signal_refresh(events: mpsc::Sender<ClientEvent>) -> Option<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sig = match signal(SignalKind::user_defined1()) {
        Ok(sig) => sig,
        Err(err) => {
            tracing::warn!(target: "input", error = %err, "SIGUSR1 handler not installed");
            return None;
        }
    };
    Some(tokio::spawn(async move {
        while sig.recv().await.is_some() {
            if events.send(ClientEvent::Key(KeyPress::ctrl("r"))).await.is_err() {
                break;
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_refresh(_events: mpsc::Sender<ClientEvent>) -> Option<JoinHandle<()>> {
    None
}
