use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    UserQuit,
}

#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<Option<ShutdownReason>>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<Option<ShutdownReason>>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownListener) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, ShutdownListener { receiver })
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    /// The first reason wins; later triggers are ignored.
    pub fn trigger(&self, reason: ShutdownReason) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }
}

impl ShutdownListener {
    pub async fn notified(&mut self) -> Option<ShutdownReason> {
        if let Some(reason) = *self.receiver.borrow() {
            return Some(reason);
        }
        let _ = self.receiver.changed().await;
        *self.receiver.borrow()
    }
}

pub fn install_signal_handlers(shutdown: Shutdown) {
    let ctrlc = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc.trigger(ShutdownReason::Interrupt);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let term = shutdown.clone();
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                term.trigger(ShutdownReason::Terminate);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listeners_see_first_reason() {
        let (shutdown, mut listener) = Shutdown::new();
        let mut late = shutdown.subscribe();

        shutdown.trigger(ShutdownReason::UserQuit);
        shutdown.trigger(ShutdownReason::Terminate);

        assert_eq!(listener.notified().await, Some(ShutdownReason::UserQuit));
        assert_eq!(late.notified().await, Some(ShutdownReason::UserQuit));
    }
}
