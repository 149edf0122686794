//! Shutdown signal handling for watch mode

use std::future::Future;

use colored::Colorize;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Receives SIGINT/SIGTERM as a single shutdown event
pub struct ShutdownSignal {
    receiver: mpsc::Receiver<&'static str>,
}

impl ShutdownSignal {
    /// Start listening for SIGINT and SIGTERM
    pub fn listen() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(2);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            let _ = tx_int.send("SIGINT").await;
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            let _ = tx.send("SIGTERM").await;
        });

        Ok(Self { receiver: rx })
    }

    /// Wait until a shutdown signal arrives
    pub async fn recv(&mut self) {
        if let Some(name) = self.receiver.recv().await {
            eprintln!("{} Received {} (shutdown)", "↓".cyan(), name);
        }
    }

    /// Drive `fut` unless a shutdown signal arrives first; `None` on shutdown
    pub async fn guard<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.recv() => None,
            output = fut => Some(output),
        }
    }
}
