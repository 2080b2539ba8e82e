use std::{net::SocketAddr, sync::Arc};

use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use crate::{CampaignBackend, error::ServerError, router::build_router, state::ProxyState};

/// The HTTP proxy in front of the crowdfunding contract.
pub struct ProxyServer {
    addr: SocketAddr,
    state: ProxyState,
    running: Option<RunningServer>,
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ProxyServer {
    /// Creates a server that will listen on `addr`. Port `0` picks a free port on
    /// [`start`](Self::start).
    pub fn new(addr: SocketAddr, backend: Arc<dyn CampaignBackend>) -> Self {
        Self { addr, state: ProxyState::new(backend), running: None }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The bound address while running, the configured one otherwise.
    pub fn local_addr(&self) -> SocketAddr {
        self.running.as_ref().map_or(self.addr, |running| running.local_addr)
    }

    pub fn port(&self) -> u16 {
        self.local_addr().port()
    }

    /// Binds the listener and serves requests in a background task.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.running.is_some() {
            return Err(ServerError::AlreadyRunning);
        }

        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind { addr: self.addr, source })?;
        let local_addr = listener.local_addr()?;
        let router = build_router(self.state.clone());
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        info!(target: "proxy", %local_addr, "Backend API is running on port {}", local_addr.port());
        self.running = Some(RunningServer { local_addr, shutdown, task });
        Ok(())
    }

    /// Stops accepting connections and waits for in-flight requests to finish. Does nothing if
    /// the server is not running.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let Some(RunningServer { local_addr, shutdown, task }) = self.running.take() else {
            return Ok(());
        };
        let _ = shutdown.send(());
        task.await??;
        info!(target: "proxy", %local_addr, "server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for ProxyServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyServer")
            .field("addr", &self.local_addr())
            .field("running", &self.is_running())
            .finish()
    }
}
