use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::coord::comm::{CommReceiver, CommSender};
use crate::coord::master::MasterMachine;
use crate::coord::message::{QueueMessage, StatePayload};

/// Master receiver loop: drain the state channel and dispatch slave reports.
///
/// One blocking receive per iteration, followed by a fixed pacing delay.
/// The loop ends only when the channel closes, which happens at process
/// shutdown or when the supervisor tears the peer tasks down.
pub async fn master_receiver_loop(
    master: Arc<MasterMachine>,
    rx: Arc<CommReceiver<QueueMessage>>,
    pace: Duration,
) {
    #[cfg(feature = "tracing")]
    tracing::info!(component = "MasterHandler", "master receiver started");

    loop {
        let message = match rx.recv().await {
            Ok(message) => message,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    component = "MasterHandler",
                    error = %_err,
                    "state channel closed, receiver stopping"
                );
                return;
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            component = "MasterHandler",
            id = ?message.id,
            state = ?message.state,
            "message received"
        );

        match message.state {
            StatePayload::Slave(report) => {
                if let Err(_err) = master.state_dispatcher(report).await {
                    // Dispatch failures are transient; the next report retries.
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        component = "MasterHandler",
                        error = %_err,
                        "state dispatch failed"
                    );
                }
            }
            StatePayload::Master(_) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    component = "MasterHandler",
                    "ignoring master-tagged message on master side"
                );
            }
        }

        sleep(pace).await;
    }
}

/// Master status loop: broadcast the current master state toward the slave
/// on a fixed interval.
pub async fn master_status_loop(
    master: Arc<MasterMachine>,
    tx: CommSender<QueueMessage>,
    interval: Duration,
) {
    #[cfg(feature = "tracing")]
    tracing::info!(component = "MasterHandler", "master status check started");

    loop {
        sleep(interval).await;

        let snapshot = master.current_state();
        if let Err(_err) = tx.send(QueueMessage::master_status(snapshot)).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "MasterHandler",
                error = %_err,
                state = ?snapshot,
                "status broadcast dropped"
            );
        }
    }
}
