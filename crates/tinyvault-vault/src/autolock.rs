// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Idle auto-lock for an unlocked [`VaultSession`].
//!
//! A background task waits for `idle` without a [`AutoLock::touch`] and then
//! calls [`VaultSession::lock`]. After locking it sleeps until the next
//! touch or the next unlock, so an idle, locked vault costs nothing. An
//! unlock always starts a fresh countdown.

use std::sync::Arc;
use std::time::Duration;

use tinyvault_core::VaultStatus;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::session::VaultSession;

/// Handle to the auto-lock task.
pub struct AutoLock {
    activity: Arc<Notify>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AutoLock {
    /// Start the idle timer for `session`. A zero `idle` disables auto-lock;
    /// the returned handle is then inert.
    pub fn spawn(session: Arc<VaultSession>, idle: Duration) -> Self {
        let activity = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        if idle.is_zero() {
            debug!("auto-lock disabled");
            return Self {
                activity,
                cancel,
                handle: None,
            };
        }

        let status = session.watch_status();
        let handle = tokio::spawn(run(
            session,
            idle,
            activity.clone(),
            status,
            cancel.clone(),
        ));
        debug!(idle_secs = idle.as_secs(), "auto-lock armed");

        Self {
            activity,
            cancel,
            handle: Some(handle),
        }
    }

    /// Record user activity, restarting the idle countdown.
    pub fn touch(&self) {
        self.activity.notify_one();
    }

    /// Whether a timer task is running.
    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the timer task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle {
            let _ = handle.await;
        }
        debug!("auto-lock stopped");
    }
}

async fn run(
    session: Arc<VaultSession>,
    idle: Duration,
    activity: Arc<Notify>,
    mut status: watch::Receiver<VaultStatus>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = activity.notified() => continue,
            _ = next_unlock(&mut status) => continue,
            _ = tokio::time::sleep(idle) => {
                if session.lock().await {
                    info!(idle_secs = idle.as_secs(), "vault auto-locked after inactivity");
                }
            }
        }

        // Locked (or never unlocked): nothing to do until a touch or unlock.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = activity.notified() => {}
            _ = next_unlock(&mut status) => {
                debug!("unlock observed, countdown restarted");
            }
        }
    }
}

/// Resolves on the next transition into `Unlocked`.
async fn next_unlock(status: &mut watch::Receiver<VaultStatus>) {
    while status.changed().await.is_ok() {
        if *status.borrow_and_update() == VaultStatus::Unlocked {
            return;
        }
    }
    std::future::pending::<()>().await;
}
