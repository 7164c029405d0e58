use crate::command::CommandSink;
use crate::session::{
    CredentialIssuer, SessionConfig, SessionError, SessionTransport, TelemetryHub,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tiller_core::{
    DiscreteCommand, DriveCommand, RelayMessage, RpcMethod, SessionCredential, Telemetry, Waypoint,
};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the single outbound channel to the robot.
///
/// The channel state and peer presence are tracked independently: the
/// channel can be up with nobody on the far side, which is the expected
/// steady state until the robot joins. Once connected, a probe loop
/// retries the readiness handshake forever at a fixed interval, and a
/// telemetry poll fans `status` results out to registered observers.
pub struct PeerSession {
    cfg: SessionConfig,
    issuer: Arc<dyn CredentialIssuer>,
    transport: Arc<dyn SessionTransport>,
    state: watch::Sender<SessionState>,
    peer_present: AtomicBool,
    credential: Mutex<Option<SessionCredential>>,
    last_drive: Mutex<Option<DriveCommand>>,
    cameras: Mutex<Option<Telemetry>>,
    telemetry: TelemetryHub,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PeerSession {
    pub fn new(
        cfg: SessionConfig,
        issuer: Arc<dyn CredentialIssuer>,
        transport: Arc<dyn SessionTransport>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Arc::new(Self {
            cfg,
            issuer,
            transport,
            state,
            peer_present: AtomicBool::new(false),
            credential: Mutex::new(None),
            last_drive: Mutex::new(None),
            cameras: Mutex::new(None),
            telemetry: TelemetryHub::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn peer_present(&self) -> bool {
        self.peer_present.load(Ordering::SeqCst)
    }

    /// Camera set reported by the robot in the readiness handshake.
    pub async fn available_cameras(&self) -> Option<Telemetry> {
        self.cameras.lock().await.clone()
    }

    /// Last drive command submitted, whether or not the peer was
    /// present to receive it.
    pub async fn last_drive_command(&self) -> Option<DriveCommand> {
        self.last_drive.lock().await.clone()
    }

    /// Establishes the channel. Credential issuance or connect failure
    /// is fatal to the start; retrying is the caller's decision. On
    /// success the peer probe and telemetry loops are running.
    pub async fn start(self: &Arc<Self>) -> Result<(), SessionError> {
        // The tasks lock spans the whole transition so two concurrent
        // starts cannot both pass the state guard.
        let mut tasks = self.tasks.lock().await;
        if self.state() != SessionState::Disconnected {
            return Err(SessionError::AlreadyStarted);
        }
        self.state.send_replace(SessionState::Connecting);

        let credential = match self.session_credential().await {
            Ok(credential) => credential,
            Err(e) => {
                self.state.send_replace(SessionState::Disconnected);
                return Err(SessionError::Credential(e));
            }
        };

        if let Err(e) = self
            .transport
            .connect(&credential.endpoint, &credential.credential)
            .await
        {
            self.state.send_replace(SessionState::Disconnected);
            return Err(SessionError::Connect(e));
        }

        self.state.send_replace(SessionState::Connected);
        info!(room = %self.cfg.room_key, "channel connected");

        tasks.push(self.spawn_probe_loop());
        tasks.push(self.spawn_telemetry_loop());
        Ok(())
    }

    /// Tears the session down: cancels the probe and poll loops and
    /// closes the channel. The credential cache survives for the next
    /// `start()` while it stays fresh.
    pub async fn stop(&self) {
        for task in self.tasks.lock().await.drain(..) {
            task.abort();
        }
        self.peer_present.store(false, Ordering::SeqCst);
        self.transport.close().await;
        self.state.send_replace(SessionState::Disconnected);
        info!("session stopped");
    }

    /// Transport-level disconnect notification. No silent reconnect:
    /// the caller re-establishes with an explicit `start()`.
    pub async fn notify_disconnected(&self) {
        warn!("channel disconnected");
        for task in self.tasks.lock().await.drain(..) {
            task.abort();
        }
        self.peer_present.store(false, Ordering::SeqCst);
        self.state.send_replace(SessionState::Disconnected);
    }

    /// Continuous drive command. Dropped silently while the peer is
    /// absent: last-writer-wins makes a lost command harmless since the
    /// robot defaults to motion stop.
    pub async fn send_drive(&self, command: DriveCommand) -> Result<(), SessionError> {
        *self.last_drive.lock().await = Some(command);

        if !self.peer_present() {
            trace!("peer absent, drive command dropped");
            return Ok(());
        }

        let payload = serde_json::to_vec(&RelayMessage::Drive {
            drive_cmd: command,
        })?;
        self.call(RpcMethod::DriveCmd, Bytes::from(payload)).await?;
        Ok(())
    }

    /// Discrete command. Dropped silently while the peer is absent.
    pub async fn send_command(&self, command: DiscreteCommand) -> Result<(), SessionError> {
        if !self.peer_present() {
            trace!(command = command.as_str(), "peer absent, command dropped");
            return Ok(());
        }

        let payload = serde_json::to_vec(&RelayMessage::Discrete {
            command: command.as_str().to_string(),
        })?;
        self.call(RpcMethod::Cmd, Bytes::from(payload)).await?;
        Ok(())
    }

    /// Telemetry snapshot. Returns an empty document while the peer is
    /// absent instead of erroring.
    pub async fn status(&self) -> Result<Telemetry, SessionError> {
        if !self.peer_present() {
            return Ok(Telemetry::Object(Default::default()));
        }

        let response = self.call(RpcMethod::Status, Bytes::new()).await?;
        Ok(serde_json::from_slice(&response)?)
    }

    /// Waypoint mission upload. A one-shot action: rejected explicitly
    /// while the peer is absent so the operator can be told.
    pub async fn send_waypoints(&self, waypoints: &[Waypoint]) -> Result<(), SessionError> {
        if !self.peer_present() {
            return Err(SessionError::PeerUnavailable(
                self.cfg.peer_identity.clone(),
            ));
        }

        let payload = serde_json::to_vec(&serde_json::json!({ "waypoints": waypoints }))?;
        self.call(RpcMethod::WaypointCmd, Bytes::from(payload))
            .await?;
        Ok(())
    }

    /// Active camera switch. One-shot, rejected while the peer is
    /// absent.
    pub async fn switch_camera(&self, camera_id: &str) -> Result<(), SessionError> {
        if !self.peer_present() {
            return Err(SessionError::PeerUnavailable(
                self.cfg.peer_identity.clone(),
            ));
        }

        self.call(
            RpcMethod::SwitchCamera,
            Bytes::from(camera_id.as_bytes().to_vec()),
        )
        .await?;
        Ok(())
    }

    pub async fn on_telemetry<F>(&self, observer: F) -> crate::session::ObserverId
    where
        F: Fn(&Telemetry) + Send + Sync + 'static,
    {
        self.telemetry.subscribe(observer).await
    }

    pub async fn off_telemetry(&self, id: crate::session::ObserverId) {
        self.telemetry.unsubscribe(id).await
    }

    async fn session_credential(&self) -> anyhow::Result<SessionCredential> {
        let mut cached = self.credential.lock().await;

        if let Some(credential) = cached.as_ref() {
            if credential.is_fresh(self.cfg.credential_margin) {
                debug!("reusing cached credential");
                return Ok(credential.clone());
            }
        }

        let credential = self.issuer.issue(&self.cfg.room_key).await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    /// One request/response exchange, bounded by the configured
    /// timeout. A timed-out drive command is not retried; the next poll
    /// supersedes it.
    async fn call(&self, method: RpcMethod, payload: Bytes) -> Result<Bytes, SessionError> {
        if self.state() != SessionState::Connected {
            return Err(SessionError::NotConnected);
        }

        let exchange = self
            .transport
            .call(method.as_str(), payload, &self.cfg.peer_identity);

        let result = match self.cfg.rpc_timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| SessionError::RpcTimeout(method))?,
            None => exchange.await,
        };

        result.map_err(|source| SessionError::Rpc { method, source })
    }

    /// Checks for the named peer at a fixed interval, forever. On the
    /// transition to present it runs the readiness handshake; a failed
    /// handshake puts the probe back into the retry state.
    fn spawn_probe_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(session.cfg.probe_interval);
            loop {
                ticker.tick().await;

                let present = session
                    .transport
                    .is_peer_present(&session.cfg.peer_identity)
                    .await;
                let was_present = session.peer_present.swap(present, Ordering::SeqCst);

                if present && !was_present {
                    info!(peer = %session.cfg.peer_identity, "peer joined, running handshake");
                    match session.call(RpcMethod::ClientConnected, Bytes::new()).await {
                        Ok(response) => {
                            match serde_json::from_slice::<Telemetry>(&response) {
                                Ok(cameras) => *session.cameras.lock().await = Some(cameras),
                                Err(e) => debug!("unreadable camera list: {e}"),
                            }
                        }
                        Err(e) => {
                            warn!("handshake failed, will retry: {e}");
                            session.peer_present.store(false, Ordering::SeqCst);
                        }
                    }
                } else if !present && was_present {
                    info!(peer = %session.cfg.peer_identity, "peer left");
                }
            }
        })
    }

    /// Polls `status` once per interval while the peer is ready and
    /// fans the decoded result out. A failed poll is dropped; the next
    /// tick re-issues it.
    fn spawn_telemetry_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(session.cfg.telemetry_interval);
            loop {
                ticker.tick().await;

                if !session.peer_present() {
                    continue;
                }

                match session.status().await {
                    Ok(telemetry) => session.telemetry.publish(&telemetry).await,
                    Err(e) => debug!("telemetry poll failed: {e}"),
                }
            }
        })
    }
}

/// Lets the command dispatcher feed this session directly. Per-call
/// errors are logged here; the dispatcher has no failure path of its
/// own and the next poll naturally supersedes a lost command.
#[async_trait]
impl CommandSink for PeerSession {
    async fn drive(&self, command: DriveCommand) {
        if let Err(e) = self.send_drive(command).await {
            warn!("drive command failed: {e}");
        }
    }

    async fn discrete(&self, command: DiscreteCommand) {
        if let Err(e) = self.send_command(command).await {
            warn!("discrete command failed: {e}");
        }
    }
}
