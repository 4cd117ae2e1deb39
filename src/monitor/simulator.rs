//! Timer-driven generator of synthetic policy updates.
//!
//! Every interval, with a fixed probability, one canned update is emitted.
//! Turning monitoring on schedules one more update after a short delay.
//! Each update is pushed to the front of a capped history and handed to
//! the registered callback.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::{MonitorSettings, Settings};
use crate::domain::ExternalUpdate;

/// Receives every emitted update. No acknowledgement is expected.
pub type UpdateCallback = Arc<dyn Fn(&ExternalUpdate) + Send + Sync>;

/// What caused an update to be emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTrigger {
    Interval,
    Activation,
}

struct Payload {
    source: &'static str,
    title: &'static str,
    changes: &'static [&'static str],
    impacted_policies: &'static [&'static str],
}

static PAYLOADS: [Payload; 3] = [
    Payload {
        source: "College Policy Portal",
        title: "Updated Academic Calendar Guidelines",
        changes: &[
            "Exam schedule moved from June 15 to June 20",
            "Assignment submission deadline extended to 11:59 PM",
            "Minimum attendance requirement changed to 70%",
        ],
        impacted_policies: &["Academic Calendar", "Attendance Policy", "Examination Rules"],
    },
    Payload {
        source: "HR Policy Center",
        title: "Leave Policy Updates",
        changes: &[
            "Sick leave can now be taken with 24-hour notice",
            "Maximum consecutive vacation days increased to 15",
            "Maternity leave extended to 6 months",
        ],
        impacted_policies: &["Leave Management", "HR Policies", "Employee Benefits"],
    },
    Payload {
        source: "IT Security Office",
        title: "Password Policy Revision",
        changes: &[
            "Minimum password length raised to 14 characters",
            "Password rotation reduced to every 180 days",
        ],
        impacted_policies: &["Acceptable Use Policy", "Security Standards"],
    },
];

struct MonitorState {
    updates: VecDeque<ExternalUpdate>,
    monitoring: bool,
    rng: StdRng,
    next_payload: usize,
}

struct Shared {
    settings: MonitorSettings,
    state: Mutex<MonitorState>,
    on_update: UpdateCallback,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Interval tick: emit with the configured probability
    fn tick(&self) {
        let roll = self.lock().rng.gen_bool(self.settings.update_probability);
        if roll {
            self.emit(UpdateTrigger::Interval);
        } else {
            tracing::trace!("No external update this tick");
        }
    }

    fn emit(&self, trigger: UpdateTrigger) {
        let update = {
            let mut state = self.lock();
            let payload = &PAYLOADS[state.next_payload % PAYLOADS.len()];
            state.next_payload += 1;

            let update = ExternalUpdate::new(
                payload.source,
                payload.title,
                payload.changes.iter().map(|s| s.to_string()).collect(),
                payload.impacted_policies.iter().map(|s| s.to_string()).collect(),
            );

            state.updates.push_front(update.clone());
            state.updates.truncate(self.settings.history_limit);
            update
        };

        tracing::info!(
            source = %update.source,
            title = %update.title,
            ?trigger,
            "External update detected"
        );

        // Callback runs outside the lock so it may query the handle
        (self.on_update)(&update);
    }
}

/// Starts the simulator
pub struct ExternalUpdateSimulator;

impl ExternalUpdateSimulator {
    /// Validate the monitor settings and start the interval task.
    ///
    /// Draws are seeded from the top-level seed when one is set. Must be
    /// called inside a tokio runtime.
    pub fn spawn(settings: &Settings, on_update: UpdateCallback) -> Result<MonitorHandle> {
        settings.monitor.validate()?;

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let period = settings.monitor.interval();
        let shared = Arc::new(Shared {
            settings: settings.monitor.clone(),
            state: Mutex::new(MonitorState {
                updates: VecDeque::new(),
                monitoring: false,
                rng,
                next_payload: 0,
            }),
            on_update,
        });

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let ticker_shared = Arc::clone(&shared);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(interval_secs = period.as_secs(), "External monitor started");

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        tracing::info!("External monitor stopping...");
                        break;
                    }
                    _ = ticker.tick() => ticker_shared.tick(),
                }
            }
        });

        Ok(MonitorHandle {
            shared,
            stop_tx,
            task: Some(task),
            pending: Mutex::new(Vec::new()),
        })
    }
}

/// Handle to a running simulator.
///
/// Dropping the handle aborts the interval task and any pending
/// activation update; `stop` does the same and waits for the task.
pub struct MonitorHandle {
    shared: Arc<Shared>,
    stop_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl MonitorHandle {
    /// Retained updates, most recent first
    pub fn updates(&self) -> Vec<ExternalUpdate> {
        self.shared.lock().updates.iter().cloned().collect()
    }

    pub fn is_monitoring(&self) -> bool {
        self.shared.lock().monitoring
    }

    /// Turn monitoring on or off.
    ///
    /// Switching on schedules one update after the activation delay.
    /// Switching off only changes the flag.
    pub fn set_monitoring(&self, on: bool) {
        let was = std::mem::replace(&mut self.shared.lock().monitoring, on);
        if on && !was {
            self.schedule_activation_update();
        }
    }

    /// Flip monitoring and return the new value
    pub fn toggle_monitoring(&self) -> bool {
        let on = !self.is_monitoring();
        self.set_monitoring(on);
        on
    }

    fn schedule_activation_update(&self) {
        let shared = Arc::clone(&self.shared);
        let delay = shared.settings.activation_delay();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.emit(UpdateTrigger::Activation);
        });

        let mut pending = self.lock_pending();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn lock_pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn abort_pending(&self) {
        for handle in self.lock_pending().drain(..) {
            handle.abort();
        }
    }

    /// Stop the simulator and wait for the interval task to finish
    pub async fn stop(mut self) -> Result<()> {
        self.abort_pending();
        let _ = self.stop_tx.send(()).await;
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.abort_pending();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
