//! Shutdown signal handling for the watch loop

use colored::Colorize;
use tokio::sync::mpsc;

/// Signal that stopped the watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

impl StopSignal {
    pub fn name(&self) -> &'static str {
        match self {
            StopSignal::Interrupt => "SIGINT",
            StopSignal::Terminate => "SIGTERM",
        }
    }
}

/// Listens for SIGINT/SIGTERM (Ctrl+C elsewhere) in background tasks
pub struct ShutdownSignal {
    receiver: mpsc::Receiver<StopSignal>,
}

impl ShutdownSignal {
    /// Start listening for shutdown signals.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(2);

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let tx_int = tx.clone();
            let mut sigint = signal(SignalKind::interrupt())?;
            tokio::spawn(async move {
                sigint.recv().await;
                let _ = tx_int.send(StopSignal::Interrupt).await;
            });

            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                sigterm.recv().await;
                let _ = tx.send(StopSignal::Terminate).await;
            });
        }

        #[cfg(not(unix))]
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(StopSignal::Interrupt).await;
            }
        });

        Ok(Self { receiver: rx })
    }

    /// Wait for the next shutdown signal
    pub async fn recv(&mut self) -> Option<StopSignal> {
        let signal = self.receiver.recv().await;
        if let Some(signal) = signal {
            eprintln!("{} Received {} (shutdown)", "↓".cyan(), signal.name());
        }
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_names() {
        assert_eq!(StopSignal::Interrupt.name(), "SIGINT");
        assert_eq!(StopSignal::Terminate.name(), "SIGTERM");
    }

    #[tokio::test]
    async fn listen_installs_handlers() {
        assert!(ShutdownSignal::listen().is_ok());
    }
}
