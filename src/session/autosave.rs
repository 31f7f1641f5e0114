//! Periodic auto-save of the active tab.

use crate::config::AutosaveConfig;
use crate::workbench::Workbench;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Spawn a task that saves the active tab every `period`.
///
/// The first save happens one full period after spawning. Failures are
/// logged and the loop keeps running; abort the handle to stop it.
pub fn spawn_auto_save(workbench: Arc<Mutex<Workbench>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let result = workbench.lock().auto_save_tick();
            match result {
                Ok(Some(path)) => debug!(path = %path, "Auto-saved"),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Auto-save failed"),
            }
        }
    })
}

/// Start auto-save per configuration; `None` when disabled.
pub fn spawn_configured(
    workbench: Arc<Mutex<Workbench>>,
    config: &AutosaveConfig,
) -> Option<JoinHandle<()>> {
    if !config.enabled {
        debug!("Auto-save disabled");
        return None;
    }
    Some(spawn_auto_save(workbench, config.interval()))
}
