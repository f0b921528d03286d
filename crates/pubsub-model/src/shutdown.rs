use std::io;

use tokio::signal;
use tracing::info;

/// Resolves on Ctrl-C or, on unix, SIGTERM. The SIGTERM handler is
/// registered in `install`, so a signal that lands before the server starts
/// polling is still observed instead of killing the process.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl ShutdownSignal {
    /// Must be called from inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal::unix::signal(signal::unix::SignalKind::terminate())?,
        })
    }

    pub async fn recv(self) {
        let ctrl_c = async {
            let _ = signal::ctrl_c().await;
        };

        #[cfg(unix)]
        let terminate = async move {
            let mut terminate = self.terminate;
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!(signal = "ctrl-c", "shutdown signal received"),
            _ = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
        }
    }
}
