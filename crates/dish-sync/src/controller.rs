//! Sync controller
//!
//! Owns the dish store and the push-channel supervisor. The supervisor is a
//! single task per controller: it connects, pumps frames into the store until
//! the channel closes, waits the fixed reconnect delay and starts over. The
//! shutdown token is checked before every attempt and raced against every
//! wait, so nothing is left scheduled once `shutdown` returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use dish_core::config::DEFAULT_RECONNECT_DELAY;
use dish_core::{DashboardConfig, DishApi, DishId, PushChannel, PushConnector, PushEvent};

use crate::connection::{ConnectionState, ShutdownToken};
use crate::store::DishStore;

/// Controller settings
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Fixed delay between a close and the next connection attempt
    pub reconnect_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl From<&DashboardConfig> for SyncConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            reconnect_delay: config.reconnect_delay,
        }
    }
}

/// Result of a user toggle.
///
/// `applied_locally` and `persisted` can disagree: the local flip is never
/// rolled back when the service rejects or misses the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The dish was in the snapshot and its flag was flipped
    pub applied_locally: bool,
    /// The service acknowledged the request
    pub persisted: bool,
}

struct Inner {
    api: Arc<dyn DishApi>,
    connector: Arc<dyn PushConnector>,
    store: DishStore,
    config: SyncConfig,
    connection: watch::Sender<ConnectionState>,
    shutdown: ShutdownToken,
    supervisor: Mutex<Option<JoinHandle<()>>>,
    connect_attempts: AtomicU64,
}

/// Dish store plus push-channel supervision
#[derive(Clone)]
pub struct SyncController {
    inner: Arc<Inner>,
}

impl SyncController {
    pub fn new(
        api: Arc<dyn DishApi>,
        connector: Arc<dyn PushConnector>,
        config: SyncConfig,
    ) -> Self {
        let (connection, _rx) = watch::channel(ConnectionState::Idle);
        Self {
            inner: Arc::new(Inner {
                api,
                connector,
                store: DishStore::new(),
                config,
                connection,
                shutdown: ShutdownToken::new(),
                supervisor: Mutex::new(None),
                connect_attempts: AtomicU64::new(0),
            }),
        }
    }

    /// The store the presentation layer renders from
    pub fn store(&self) -> &DishStore {
        &self.inner.store
    }

    /// Current push-channel state (diagnostics only)
    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.connection.borrow()
    }

    /// Number of connection attempts made so far
    pub fn connect_attempts(&self) -> u64 {
        self.inner.connect_attempts.load(Ordering::SeqCst)
    }

    /// Kick off the initial fetch and the push channel together.
    ///
    /// Returns the handle of the fetch task.
    pub fn start(&self) -> JoinHandle<()> {
        let this = self.clone();
        let fetch = tokio::spawn(async move { this.load_initial().await });
        self.connect();
        fetch
    }

    /// Fetch the full collection once and settle the loading flag.
    ///
    /// Failures are logged; the previous snapshot stays in place.
    pub async fn load_initial(&self) {
        match self.inner.api.fetch_all().await {
            Ok(dishes) => {
                info!("Fetched {} dishes", dishes.len());
                self.inner.store.replace(dishes);
            }
            Err(e) => {
                error!("Error fetching dishes: {}", e);
            }
        }
        self.inner.store.finish_loading();
    }

    /// Start the push-channel supervisor. Only the first call has an effect.
    pub fn connect(&self) {
        if self.inner.shutdown.is_cancelled() {
            warn!("Controller is shut down, not connecting");
            return;
        }

        let mut supervisor = match self.inner.supervisor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if supervisor.is_some() {
            debug!("Push channel supervisor already running");
            return;
        }
        *supervisor = Some(tokio::spawn(self.clone().supervise()));
    }

    /// Flip a dish locally, then ask the service to do the same.
    ///
    /// The local flip happens first and stays whatever the service answers.
    pub async fn toggle(&self, id: &DishId) -> ToggleOutcome {
        info!("Toggling status for dishId: {}", id);

        let applied_locally = self.inner.store.toggle_local(id);
        if !applied_locally {
            warn!("Dish {} is not in the current snapshot", id);
        }

        let persisted = match self.inner.api.toggle_status(id).await {
            Ok(body) => {
                info!("Response from toggle status: {}", body);
                true
            }
            Err(e) => {
                error!("Error toggling status for dish {}: {}", id, e);
                false
            }
        };

        ToggleOutcome {
            applied_locally,
            persisted,
        }
    }

    /// Close the push channel and stop reconnecting.
    ///
    /// In-flight fetch and toggle requests are left to finish.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();

        let handle = match self.inner.supervisor.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Push channel supervisor failed: {}", e);
            }
        }
        self.set_connection(ConnectionState::Stopped);
        info!("Sync controller shut down");
    }

    async fn supervise(self) {
        let delay = self.inner.config.reconnect_delay;

        loop {
            if self.inner.shutdown.is_cancelled() {
                break;
            }

            self.set_connection(ConnectionState::Connecting);
            self.inner.connect_attempts.fetch_add(1, Ordering::SeqCst);

            let connected = tokio::select! {
                biased;
                _ = self.inner.shutdown.cancelled() => break,
                result = self.inner.connector.connect() => result,
            };

            match connected {
                Ok(mut channel) => {
                    self.set_connection(ConnectionState::Open);
                    info!("Connected to push channel");

                    if self.pump(channel.as_mut()).await {
                        channel.close().await;
                        break;
                    }
                    info!(
                        "Disconnected from push channel. Attempting to reconnect in {}s...",
                        delay.as_secs()
                    );
                }
                Err(e) => {
                    error!("Push channel error: {}", e);
                    info!(
                        "Push channel unavailable. Attempting to reconnect in {}s...",
                        delay.as_secs()
                    );
                }
            }

            self.set_connection(ConnectionState::ClosedPendingRetry);
            tokio::select! {
                biased;
                _ = self.inner.shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.set_connection(ConnectionState::Stopped);
        debug!("Push channel supervisor stopped");
    }

    /// Feed frames into the store until the channel closes.
    ///
    /// Returns true when shutdown interrupted it.
    async fn pump(&self, channel: &mut dyn PushChannel) -> bool {
        loop {
            let frame = tokio::select! {
                biased;
                _ = self.inner.shutdown.cancelled() => return true,
                frame = channel.next_frame() => frame,
            };

            match frame {
                Some(Ok(text)) => self.apply_frame(&text),
                Some(Err(e)) => error!("Push channel error: {}", e),
                None => return false,
            }
        }
    }

    fn apply_frame(&self, frame: &str) {
        match PushEvent::decode(frame) {
            Ok(PushEvent::UpdateDishes(dishes)) => {
                info!("Received dish update with {} dishes", dishes.len());
                self.inner.store.replace(dishes);
            }
            Ok(PushEvent::Other(kind)) => {
                debug!("Ignoring push event of type {}", kind);
            }
            Err(e) => {
                warn!("Dropping malformed push message: {}", e);
            }
        }
    }

    fn set_connection(&self, state: ConnectionState) {
        self.inner.connection.send_replace(state);
    }
}
