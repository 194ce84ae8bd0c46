use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::coord::comm::{CommReceiver, CommSender};
use crate::coord::message::{MessageId, QueueMessage, RestartRequest};
use crate::coord::slave::SlaveMachine;
use crate::coord::state::SlaveInputState;
use crate::coord::supervisor::TaskSupervisor;

/// Slave receiver loop: react to commands and status snapshots from the
/// master.
pub async fn slave_receiver_loop(
    slave: Arc<SlaveMachine>,
    rx: Arc<CommReceiver<QueueMessage>>,
    pace: Duration,
) {
    #[cfg(feature = "tracing")]
    tracing::info!(component = "SlaveHandler", "slave receiver started");

    loop {
        let message = match rx.recv().await {
            Ok(message) => message,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    component = "SlaveHandler",
                    error = %_err,
                    "state channel closed, receiver stopping"
                );
                return;
            }
        };

        match message.id {
            MessageId::ResetSlave => {
                if let Err(_err) = slave.handle_status(SlaveInputState::ErrorOrReset).await {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        component = "SlaveHandler",
                        error = %_err,
                        "reset command handling failed"
                    );
                }
            }
            MessageId::HandleSlaveFault | MessageId::SlaveCurrentStatus => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    component = "SlaveHandler",
                    id = ?message.id,
                    state = ?message.state,
                    "status snapshot received"
                );
            }
        }

        sleep(pace).await;
    }
}

/// Slave observation loop: report the current slave state toward the master
/// on a fixed interval. This is the pull-based path; fault reports reach
/// the master ahead of it via the fault entry handler.
pub async fn slave_observation_loop(
    slave: Arc<SlaveMachine>,
    tx: CommSender<QueueMessage>,
    interval: Duration,
) {
    #[cfg(feature = "tracing")]
    tracing::info!(component = "SlaveHandler", "status observation started");

    loop {
        sleep(interval).await;

        let snapshot = slave.state().await;
        if let Err(_err) = tx.send(QueueMessage::slave_status(snapshot)).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "SlaveHandler",
                error = %_err,
                state = ?snapshot,
                "status report dropped"
            );
        }
    }
}

/// Restart listener loop: wait for a restart request, hold the configured
/// grace period, then tear down and recreate the registered tasks.
///
/// Exactly one instance of this loop runs, which is what serializes
/// restarts; the supervisor itself does not support concurrent invocations.
pub async fn restart_listener_loop(
    supervisor: Arc<TaskSupervisor>,
    rx: CommReceiver<RestartRequest>,
    delay: Duration,
) {
    #[cfg(feature = "tracing")]
    tracing::info!(component = "SlaveRestart", "restart listener started");

    loop {
        match rx.recv().await {
            Ok(_request) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    component = "SlaveRestart",
                    delay_ms = delay.as_millis() as u64,
                    "restart requested, waiting grace period"
                );
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    component = "SlaveRestart",
                    error = %_err,
                    "restart channel closed, listener stopping"
                );
                return;
            }
        }

        sleep(delay).await;

        match supervisor.restart_all_tasks().await {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::info!(component = "SlaveRestart", "all tasks restarted");
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    component = "SlaveRestart",
                    error = %_err,
                    "task restart failed"
                );
            }
        }
    }
}
