//! Log-driven supervision of the game server process.
//!
//! One [`ServerSupervisor`] owns at most one child process at a time. Each
//! spawned process (a "generation") gets:
//!
//! - two console readers feeding a single worker channel,
//! - a waiter task that owns the `Child`, reaps it and can force-kill it,
//! - a worker task that classifies lines and applies lifecycle events.
//!
//! The worker is the only code that mutates [`ServerState`] or publishes
//! events, so state changes and their broadcasts are totally ordered.
//! Lifecycle operations (start/stop/restart) are serialized by a separate
//! async gate. A second operation fails fast with
//! [`SupervisorError::OperationInProgress`], except that `stop` waits for
//! an in-flight `start` to resolve.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use mcwarden_core::{
    LifecycleEvent, LogClassifier, ServerEvent, ServerState, StatusSnapshot, SupervisorConfig,
    SupervisorError,
};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::bus::{EventBus, Subscription};
use super::launcher::ProcessLauncher;
use super::shutdown::terminate_child;
use super::stream::spawn_line_reader;
use super::types::{Phase, ProcessState, ReadyOutcome, WorkerMessage};
use crate::pidfile;

const WORKER_CHANNEL_CAPACITY: usize = 1024;

/// How long the exit path waits for console readers to hit EOF.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

type SharedStdin = Arc<AsyncMutex<ChildStdin>>;

struct ProcessHandle {
    pid: Option<u32>,
    stdin: SharedStdin,
    kill: Option<oneshot::Sender<()>>,
    exit: watch::Receiver<ProcessState>,
}

/// Lifecycle operation currently holding the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Start,
    Stop,
    Restart,
}

struct Shared {
    phase: Phase,
    state: ServerState,
    generation: u64,
    ready: Option<oneshot::Sender<ReadyOutcome>>,
    process: Option<ProcessHandle>,
    operation: Option<Operation>,
}

/// Held for the duration of a lifecycle operation.
///
/// Clears the recorded [`Operation`] before the gate itself is released.
struct LifecycleGuard<'a> {
    inner: &'a Inner,
    _gate: AsyncMutexGuard<'a, ()>,
}

impl Drop for LifecycleGuard<'_> {
    fn drop(&mut self) {
        self.inner.lock_shared().operation = None;
    }
}

struct Inner {
    config: SupervisorConfig,
    classifier: LogClassifier,
    launcher: Arc<dyn ProcessLauncher>,
    bus: EventBus,
    pidfile: Option<PathBuf>,
    shared: Mutex<Shared>,
    lifecycle: AsyncMutex<()>,
}

/// Handle to the supervised game server. Cheap to clone.
///
/// Dropping the last handle terminates a running process.
#[derive(Clone)]
pub struct ServerSupervisor {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ServerSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSupervisor")
            .field("phase", &self.phase())
            .field("pid", &self.pid())
            .finish_non_exhaustive()
    }
}

impl ServerSupervisor {
    pub fn new(config: SupervisorConfig, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self::build(config, launcher, None)
    }

    /// Like [`ServerSupervisor::new`], recording the child's PID at `pidfile`
    /// while it is alive.
    pub fn with_pidfile(
        config: SupervisorConfig,
        launcher: Arc<dyn ProcessLauncher>,
        pidfile: impl Into<PathBuf>,
    ) -> Self {
        Self::build(config, launcher, Some(pidfile.into()))
    }

    fn build(
        config: SupervisorConfig,
        launcher: Arc<dyn ProcessLauncher>,
        pidfile: Option<PathBuf>,
    ) -> Self {
        let classifier = LogClassifier::new(config.ready_markers.iter().cloned());
        let bus = EventBus::new(config.event_capacity);
        let state = ServerState::new(config.max_players);
        Self {
            inner: Arc::new(Inner {
                config,
                classifier,
                launcher,
                bus,
                pidfile,
                shared: Mutex::new(Shared {
                    phase: Phase::Idle,
                    state,
                    generation: 0,
                    ready: None,
                    process: None,
                    operation: None,
                }),
                lifecycle: AsyncMutex::new(()),
            }),
        }
    }

    /// Spawn the server and wait until it prints a ready marker.
    ///
    /// On [`SupervisorError::StartTimeout`] the process is left running in
    /// the `Starting` phase; a late ready marker still moves it to
    /// `Running`, and [`ServerSupervisor::stop`] can shut it down.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        let _gate = self
            .inner
            .try_begin(Operation::Start)
            .map_err(|_| SupervisorError::OperationInProgress)?;
        self.start_locked().await
    }

    /// Ask the server to stop, forcing termination after the stop timeout.
    ///
    /// Waits for an in-flight start to resolve first; fails with
    /// [`SupervisorError::OperationInProgress`] while another stop or a
    /// restart is underway. Returns the exit code once the exit has been
    /// observed and state has been cleared.
    pub async fn stop(&self) -> Result<Option<i32>, SupervisorError> {
        let _gate = match self.inner.try_begin(Operation::Stop) {
            Ok(gate) => gate,
            Err(Some(Operation::Stop | Operation::Restart)) => {
                return Err(SupervisorError::OperationInProgress);
            }
            Err(holder) => {
                debug!(?holder, "Stop waiting for the lifecycle gate");
                self.inner.begin(Operation::Stop).await
            }
        };
        self.stop_locked().await
    }

    /// Stop (when a process exists) and start again as one operation.
    pub async fn restart(&self) -> Result<(), SupervisorError> {
        let _gate = self
            .inner
            .try_begin(Operation::Restart)
            .map_err(|_| SupervisorError::OperationInProgress)?;

        if matches!(self.phase(), Phase::Running | Phase::Starting) {
            info!("Restarting game server");
            self.stop_locked().await?;
        }
        self.start_locked().await
    }

    /// Write one line to the server console. No acknowledgement is awaited.
    pub async fn send_command(&self, text: &str) -> Result<(), SupervisorError> {
        let stdin = {
            let shared = self.inner.lock_shared();
            if shared.phase != Phase::Running {
                return Err(SupervisorError::NotRunning);
            }
            shared
                .process
                .as_ref()
                .map(|process| Arc::clone(&process.stdin))
                .ok_or(SupervisorError::NotRunning)?
        };

        write_line(&stdin, text)
            .await
            .map_err(SupervisorError::CommandWrite)?;
        debug!(command = %text, "Console command sent");
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock_shared().phase
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.lock_shared().state.snapshot()
    }

    pub fn subscribe(&self) -> Subscription {
        self.inner.bus.subscribe()
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// OS process id of the current child, if any.
    pub fn pid(&self) -> Option<u32> {
        self.inner
            .lock_shared()
            .process
            .as_ref()
            .and_then(|process| process.pid)
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.inner.config
    }

    async fn start_locked(&self) -> Result<(), SupervisorError> {
        let ready = self.spawn_process()?;
        self.await_ready(ready).await
    }

    fn spawn_process(&self) -> Result<oneshot::Receiver<ReadyOutcome>, SupervisorError> {
        let inner = &self.inner;
        let mut shared = inner.lock_shared();
        if shared.phase != Phase::Idle {
            return Err(SupervisorError::AlreadyRunning);
        }

        let mut child = inner.launcher.launch().map_err(|e| {
            warn!(error = %e, "Failed to launch game server");
            SupervisorError::Spawn(e)
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SupervisorError::Spawn(io::Error::other("stdin is not piped")))?;
        let pid = child.id();

        shared.generation += 1;
        let generation = shared.generation;

        let (messages_tx, messages_rx) = mpsc::channel(WORKER_CHANNEL_CAPACITY);
        let readers: Vec<JoinHandle<()>> = [
            child
                .stdout
                .take()
                .map(|stream| spawn_line_reader(stream, "stdout", messages_tx.clone())),
            child
                .stderr
                .take()
                .map(|stream| spawn_line_reader(stream, "stderr", messages_tx.clone())),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (kill_tx, kill_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = watch::channel(ProcessState::Alive);
        let (ready_tx, ready_rx) = oneshot::channel();

        tokio::spawn(wait_for_exit(
            child,
            kill_rx,
            readers,
            messages_tx,
            inner.config.kill_grace,
        ));
        tokio::spawn(run_worker(
            Arc::downgrade(inner),
            generation,
            messages_rx,
            exit_tx,
        ));

        shared.phase = Phase::Starting;
        shared.ready = Some(ready_tx);
        shared.process = Some(ProcessHandle {
            pid,
            stdin: Arc::new(AsyncMutex::new(stdin)),
            kill: Some(kill_tx),
            exit: exit_rx,
        });
        if let Some(pid) = pid {
            inner.record_pid(pid);
        }
        drop(shared);

        info!(pid = ?pid, generation, "Game server process spawned");
        Ok(ready_rx)
    }

    async fn await_ready(
        &self,
        mut ready: oneshot::Receiver<ReadyOutcome>,
    ) -> Result<(), SupervisorError> {
        let limit = self.inner.config.start_timeout;

        let outcome = if let Ok(result) = timeout(limit, &mut ready).await {
            result.ok()
        } else {
            // First resolution wins: whoever takes the sender decides.
            let pending = self.inner.lock_shared().ready.take();
            if pending.is_some() {
                warn!(
                    timeout_secs = limit.as_secs(),
                    "Game server not ready in time, leaving it running"
                );
                return Err(SupervisorError::StartTimeout(limit));
            }
            // The worker holds the sender and either sends or drops it.
            ready.await.ok()
        };

        match outcome {
            Some(ReadyOutcome::Ready) => Ok(()),
            Some(ReadyOutcome::Exited(exit_code)) => {
                warn!(exit_code = ?exit_code, "Game server exited before becoming ready");
                Err(SupervisorError::StartFailed { exit_code })
            }
            None => Err(SupervisorError::StartFailed { exit_code: None }),
        }
    }

    async fn stop_locked(&self) -> Result<Option<i32>, SupervisorError> {
        let (stdin, mut exit) = {
            let mut shared = self.inner.lock_shared();
            if !matches!(shared.phase, Phase::Running | Phase::Starting) {
                return Err(SupervisorError::NotRunning);
            }
            let Some(process) = shared.process.as_ref() else {
                return Err(SupervisorError::NotRunning);
            };
            let handles = (Arc::clone(&process.stdin), process.exit.clone());
            shared.phase = Phase::Stopping;
            handles
        };

        let config = &self.inner.config;
        info!(command = %config.stop_command, "Stopping game server");
        if let Err(e) = write_line(&stdin, &config.stop_command).await {
            warn!(error = %e, "Failed to send stop command, forcing termination");
            self.inner.force_kill();
        }

        let exit_code =
            if let Ok(code) = timeout(config.stop_timeout, wait_exited(&mut exit)).await {
                code
            } else {
                warn!(
                    timeout_secs = config.stop_timeout.as_secs(),
                    "Game server did not stop in time, forcing termination"
                );
                self.inner.force_kill();
                wait_exited(&mut exit).await
            };

        Ok(exit_code)
    }
}

impl Inner {
    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the lifecycle gate for `operation` without waiting.
    ///
    /// On failure returns the operation holding the gate. `None` there
    /// means the holder is just releasing it.
    fn try_begin(&self, operation: Operation) -> Result<LifecycleGuard<'_>, Option<Operation>> {
        let mut shared = self.lock_shared();
        match self.lifecycle.try_lock() {
            Ok(gate) => {
                shared.operation = Some(operation);
                Ok(LifecycleGuard {
                    inner: self,
                    _gate: gate,
                })
            }
            Err(_) => Err(shared.operation),
        }
    }

    async fn begin(&self, operation: Operation) -> LifecycleGuard<'_> {
        let gate = self.lifecycle.lock().await;
        self.lock_shared().operation = Some(operation);
        LifecycleGuard {
            inner: self,
            _gate: gate,
        }
    }

    fn force_kill(&self) {
        let kill = self
            .lock_shared()
            .process
            .as_mut()
            .and_then(|process| process.kill.take());
        if let Some(kill) = kill {
            let _ = kill.send(());
        }
    }

    fn record_pid(&self, pid: u32) {
        if let Some(path) = &self.pidfile {
            if let Err(e) = pidfile::write_pidfile(path, pid) {
                warn!(path = %path.display(), error = %e, "Failed to write pidfile");
            }
        }
    }

    fn remove_pidfile(&self) {
        if let Some(path) = &self.pidfile {
            if let Err(e) = pidfile::delete_pidfile(path) {
                warn!(path = %path.display(), error = %e, "Failed to remove pidfile");
            }
        }
    }

    fn handle_line(&self, generation: u64, line: String) {
        debug!(target: "mcwarden::console", "{line}");
        let events = self.classifier.classify(&line);
        self.bus.publish(ServerEvent::log(line));
        for event in events {
            self.apply(generation, event);
        }
    }

    fn apply(&self, generation: u64, event: LifecycleEvent) {
        let mut shared = self.lock_shared();
        if shared.generation != generation {
            debug!(
                generation,
                current = shared.generation,
                "Ignoring event from a previous process"
            );
            return;
        }

        match event {
            LifecycleEvent::ServerReady => {
                if shared.phase != Phase::Starting {
                    return;
                }
                shared.phase = Phase::Running;
                shared.state.mark_started();
                let snapshot = shared.state.snapshot();
                let ready = shared.ready.take();
                drop(shared);

                if let Some(ready) = ready {
                    let _ = ready.send(ReadyOutcome::Ready);
                    info!("Game server is ready");
                } else {
                    info!("Game server became ready after the start deadline");
                }
                self.bus.publish(ServerEvent::status(snapshot));
            }
            LifecycleEvent::PlayerJoined(player) => {
                if !shared.state.player_joined(&player) {
                    return;
                }
                let snapshot = shared.state.snapshot();
                drop(shared);

                info!(%player, online = snapshot.players, "Player joined");
                self.bus.publish(ServerEvent::player_join(player));
                self.bus.publish(ServerEvent::status(snapshot));
            }
            LifecycleEvent::PlayerLeft(player) => {
                if !shared.state.player_left(&player) {
                    return;
                }
                let snapshot = shared.state.snapshot();
                drop(shared);

                info!(%player, online = snapshot.players, "Player left");
                self.bus.publish(ServerEvent::player_leave(player));
                self.bus.publish(ServerEvent::status(snapshot));
            }
            LifecycleEvent::ProcessExited(exit_code) => {
                let previous = shared.phase;
                let ready = shared.ready.take();
                shared.phase = Phase::Idle;
                shared.state.reset();
                shared.process = None;
                let snapshot = shared.state.snapshot();
                drop(shared);

                if let Some(ready) = ready {
                    let _ = ready.send(ReadyOutcome::Exited(exit_code));
                }
                if previous == Phase::Stopping {
                    info!(exit_code = ?exit_code, "Game server stopped");
                } else {
                    warn!(exit_code = ?exit_code, phase = %previous, "Game server exited unexpectedly");
                }
                self.remove_pidfile();
                self.bus.publish(ServerEvent::status(snapshot));
            }
            LifecycleEvent::LogLine(_) => {}
        }
    }
}

/// Serialized event-processing path of one process generation.
async fn run_worker(
    inner: Weak<Inner>,
    generation: u64,
    mut messages: mpsc::Receiver<WorkerMessage>,
    exit: watch::Sender<ProcessState>,
) {
    while let Some(message) = messages.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        match message {
            WorkerMessage::Output(line) => inner.handle_line(generation, line),
            WorkerMessage::Exited(code) => {
                inner.apply(generation, LifecycleEvent::ProcessExited(code));
                exit.send_replace(ProcessState::Exited(code));
                break;
            }
        }
    }
    debug!(generation, "Supervisor worker exiting");
}

/// Own the child until it exits, then report the exit after its output.
async fn wait_for_exit(
    mut child: Child,
    kill: oneshot::Receiver<()>,
    readers: Vec<JoinHandle<()>>,
    messages: mpsc::Sender<WorkerMessage>,
    kill_grace: Duration,
) {
    let exited = tokio::select! {
        status = child.wait() => Some(status),
        _ = kill => None,
    };
    let status = match exited {
        Some(status) => status,
        None => {
            info!("Forcing game server termination");
            terminate_child(&mut child, kill_grace).await
        }
    };

    let exit_code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!(error = %e, "Failed to reap game server process");
            None
        }
    };

    for reader in readers {
        if timeout(READER_DRAIN_TIMEOUT, reader).await.is_err() {
            debug!("Console stream still open after exit, not waiting for it");
        }
    }

    let _ = messages.send(WorkerMessage::Exited(exit_code)).await;
}

async fn wait_exited(exit: &mut watch::Receiver<ProcessState>) -> Option<i32> {
    exit.wait_for(|state| state.is_exited())
        .await
        .ok()
        .and_then(|state| state.exit_code())
}

async fn write_line(stdin: &AsyncMutex<ChildStdin>, line: &str) -> io::Result<()> {
    let mut stdin = stdin.lock().await;
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}
