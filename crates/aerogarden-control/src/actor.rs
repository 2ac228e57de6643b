//! Per-device actor and its handle.
//!
//! One tokio task owns a device's cached state and pending acknowledgment and
//! processes commands one at a time, so state transitions never race. Remote
//! calls run in spawned tasks and report back through the mailbox; the actor
//! itself never waits on the network.
//!
//! # Message flow
//!
//! ```text
//!  DeviceHandle ──SetPower──▶ ┌───────────────┐ ──spawn──▶ update_config
//!               ──GetPower──▶ │  DeviceActor  │ ──spawn──▶ query_state
//!               ──SetBright─▶ │  store + ack  │                 │
//!                             └───────────────┘ ◀─Reconcile─────┘
//!                                 ▲       ▲
//!                   FollowUpStep ─┘
//! ```
//!
//! The actor stops on [`DeviceHandle::shutdown`] or once every handle is
//! dropped. Only an explicit shutdown cancels a pending acknowledgment; when
//! the handles are simply dropped, the acknowledgment timer and any follow-up
//! toggle still run to completion.

use std::sync::Arc;

use aerogarden_core::{DeviceId, DeviceState, LightStat, UserId};
use aerogarden_remote::{DeviceRecord, RemoteError, RemoteGateway};
use tokio::sync::{mpsc, oneshot, watch};

use crate::ack::{AckTimer, Acknowledgment};
use crate::config::ControlConfig;
use crate::error::{ControlError, Result};
use crate::reconcile::{reconcile, Reconciliation};
use crate::stepper::{self, StepPlan};
use crate::store::DeviceStateStore;

/// Messages processed by the device actor.
#[derive(Debug)]
pub(crate) enum Command {
    /// Caller asked to switch power.
    SetPower {
        target: bool,
        ack: oneshot::Sender<()>,
    },
    /// Caller asked for the power state.
    GetPower { reply: oneshot::Sender<bool> },
    /// Caller asked to set brightness; accepted and ignored.
    SetBrightness { value: u8, reply: oneshot::Sender<()> },
    /// A state query finished. `cached_on` is the power flag when it was issued.
    Reconcile {
        result: std::result::Result<DeviceRecord, RemoteError>,
        cached_on: bool,
        reply: oneshot::Sender<bool>,
    },
    /// Second toggle of a two-step turn-off.
    FollowUpStep,
    /// Stop the actor.
    Shutdown,
}

/// The task that owns one device's state.
pub struct DeviceActor {
    config: ControlConfig,
    gateway: Arc<dyn RemoteGateway>,
    store: DeviceStateStore,
    ack_timer: AckTimer,
    rx: mpsc::Receiver<Command>,
    mailbox: mpsc::WeakSender<Command>,
}

impl DeviceActor {
    /// Start an actor with the default initial state (off, full brightness).
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::InvalidConfig` if the configuration is unusable.
    pub fn spawn(config: ControlConfig, gateway: Arc<dyn RemoteGateway>) -> Result<DeviceHandle> {
        Self::spawn_with_state(config, gateway, DeviceState::default())
    }

    /// Start an actor whose cache begins at `initial`.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::InvalidConfig` if the configuration is unusable.
    pub fn spawn_with_state(
        config: ControlConfig,
        gateway: Arc<dyn RemoteGateway>,
        initial: DeviceState,
    ) -> Result<DeviceHandle> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.mailbox_capacity);
        let store = DeviceStateStore::new(initial);
        let handle = DeviceHandle {
            tx: tx.clone(),
            state: store.subscribe(),
            device_id: config.device_id.clone(),
        };

        let actor = Self {
            config,
            gateway,
            store,
            ack_timer: AckTimer::default(),
            rx,
            mailbox: tx.downgrade(),
        };

        tracing::info!(device_id = %actor.config.device_id, state = %initial, "Starting device actor");
        tokio::spawn(actor.run());

        Ok(handle)
    }

    async fn run(mut self) {
        let mut shutdown_requested = false;
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::SetPower { target, ack } => self.handle_set_power(target, ack),
                Command::GetPower { reply } => self.handle_get_power(reply),
                Command::SetBrightness { value, reply } => {
                    tracing::debug!(
                        device_id = %self.config.device_id,
                        value,
                        "Ignoring brightness request; the device has no brightness control"
                    );
                    let _ = reply.send(());
                }
                Command::Reconcile {
                    result,
                    cached_on,
                    reply,
                } => self.handle_reconcile(result, cached_on, reply),
                Command::FollowUpStep => self.step(None),
                Command::Shutdown => {
                    shutdown_requested = true;
                    break;
                }
            }
        }

        if shutdown_requested {
            if self.ack_timer.cancel() {
                tracing::debug!(device_id = %self.config.device_id, "Dropped pending acknowledgment on shutdown");
            }
        } else if self.ack_timer.detach() {
            tracing::debug!(device_id = %self.config.device_id, "Leaving pending acknowledgment to fire");
        }
        tracing::info!(device_id = %self.config.device_id, "Device actor stopped");
    }

    fn handle_set_power(&mut self, target: bool, ack: oneshot::Sender<()>) {
        tracing::debug!(device_id = %self.config.device_id, requested = target, "Set power requested");

        let current = self.store.read();
        self.store.write(DeviceState {
            on: target,
            ..current
        });

        let plan = stepper::plan(target, current.brightness);
        match plan {
            StepPlan::NoOp => {
                tracing::debug!(
                    device_id = %self.config.device_id,
                    requested = target,
                    brightness = %current.brightness,
                    "No step applies; acknowledging without a device change"
                );
            }
            StepPlan::Single => self.step(None),
            StepPlan::Double => {
                let delay = self.config.follow_up_step_delay();
                self.step(Some(delay));
            }
        }

        if self.ack_timer.is_pending() {
            tracing::debug!(device_id = %self.config.device_id, "Superseding pending acknowledgment");
        }
        self.ack_timer.arm(ack, self.config.ack_window());
    }

    /// Advance the stepper once and send the matching toggle.
    ///
    /// With `follow_up`, another step is scheduled that long after the toggle
    /// completes, whether or not it succeeded. If the actor has stopped by
    /// then, the task sends the second toggle itself.
    fn step(&self, follow_up: Option<std::time::Duration>) {
        let step = stepper::step(self.store.read());
        self.store.write(step.to);

        tracing::debug!(
            device_id = %self.config.device_id,
            from = %step.from.brightness,
            to = %step.to.brightness,
            "Stepping brightness"
        );

        let gateway = Arc::clone(&self.gateway);
        let device_id = self.config.device_id.clone();
        let user_id = self.config.user_id.clone();
        let mailbox = self.mailbox.clone();
        let light_stat = step.light_stat();
        // Nothing can move the stepper once the actor is gone.
        let follow_up = follow_up.map(|delay| (delay, stepper::step(step.to).light_stat()));

        tokio::spawn(async move {
            send_toggle(gateway.as_ref(), &device_id, &user_id, light_stat).await;

            if let Some((delay, next_light_stat)) = follow_up {
                tokio::time::sleep(delay).await;
                if let Some(tx) = mailbox.upgrade() {
                    if tx.send(Command::FollowUpStep).await.is_ok() {
                        return;
                    }
                }
                tracing::debug!(device_id = %device_id, "Device actor stopped; sending follow-up toggle directly");
                send_toggle(gateway.as_ref(), &device_id, &user_id, next_light_stat).await;
            }
        });
    }

    fn handle_get_power(&self, reply: oneshot::Sender<bool>) {
        let gateway = Arc::clone(&self.gateway);
        let user_id = self.config.user_id.clone();
        let mailbox = self.mailbox.clone();
        let cached_on = self.store.read().on;

        tokio::spawn(async move {
            let result = gateway.query_state(&user_id).await;
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx
                    .send(Command::Reconcile {
                        result,
                        cached_on,
                        reply,
                    })
                    .await;
            }
        });
    }

    fn handle_reconcile(
        &self,
        result: std::result::Result<DeviceRecord, RemoteError>,
        cached_on: bool,
        reply: oneshot::Sender<bool>,
    ) {
        let device_id = &self.config.device_id;
        let cached = self.store.read();
        let outcome = match result {
            Ok(record) => {
                tracing::debug!(
                    device_id = %device_id,
                    light_stat = record.light_stat.as_u8(),
                    "Device reported light state"
                );
                reconcile(cached, record.light_stat)
            }
            Err(e) if e.is_decode() => {
                tracing::error!(device_id = %device_id, error = %e, "Device state report was unusable; using cached state");
                Reconciliation::unchanged(cached_on)
            }
            Err(e) => {
                tracing::warn!(
                    device_id = %device_id,
                    error = %e,
                    transport = e.is_transport(),
                    "State query failed; using cached state"
                );
                Reconciliation::unchanged(cached_on)
            }
        };

        if let Some(update) = outcome.update {
            tracing::debug!(
                device_id = %device_id,
                from = %cached.brightness,
                to = %update.brightness,
                "Reconciled cached brightness"
            );
            self.store.write(update);
        }

        let _ = reply.send(outcome.on);
    }
}

/// Send one toggle, logging the outcome. Failures go no further.
async fn send_toggle(
    gateway: &dyn RemoteGateway,
    device_id: &DeviceId,
    user_id: &UserId,
    light_stat: LightStat,
) {
    match gateway.update_config(device_id, user_id, light_stat).await {
        Ok(()) => {
            tracing::debug!(device_id = %device_id, light_stat = light_stat.as_u8(), "Toggle accepted");
        }
        Err(e) => {
            tracing::error!(
                device_id = %device_id,
                light_stat = light_stat.as_u8(),
                error = %e,
                "Toggle failed"
            );
        }
    }
}

/// Cloneable handle for issuing commands to a device actor.
///
/// The actor stops when [`DeviceHandle::shutdown`] is called or every handle
/// has been dropped.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    tx: mpsc::Sender<Command>,
    state: watch::Receiver<DeviceState>,
    device_id: DeviceId,
}

impl DeviceHandle {
    /// The device this handle controls.
    #[must_use]
    pub const fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Request a power change.
    ///
    /// Returns as soon as the actor has the request. The returned
    /// [`Acknowledgment`] resolves after the acknowledgment window, regardless
    /// of what the remote does. Every call runs the stepper policy, so a burst
    /// of calls may send several toggles; only the last call is acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::ActorUnavailable` if the actor has stopped.
    pub async fn set_power(&self, target: bool) -> Result<Acknowledgment> {
        let (ack, acknowledgment) = Acknowledgment::channel();
        self.send(Command::SetPower { target, ack }).await?;
        Ok(acknowledgment)
    }

    /// Report whether the light is on, preferring the device's own report.
    ///
    /// Remote failures fall back to the cached value and are not errors.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::ActorUnavailable` if the actor has stopped.
    pub async fn get_power(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::GetPower { reply }).await?;
        rx.await.map_err(|_| ControlError::ActorUnavailable)
    }

    /// Accept a brightness request. The device cannot set brightness, so this
    /// changes nothing and acknowledges immediately.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::ActorUnavailable` if the actor has stopped.
    pub async fn set_brightness(&self, value: u8) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SetBrightness { value, reply }).await?;
        rx.await.map_err(|_| ControlError::ActorUnavailable)
    }

    /// The current cached state, without contacting the device.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        *self.state.borrow()
    }

    /// Subscribe to cached state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeviceState> {
        self.state.clone()
    }

    /// Stop the actor. Any pending acknowledgment is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::ActorUnavailable` if the actor already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ControlError::ActorUnavailable)
    }
}
