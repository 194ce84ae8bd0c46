use std::sync::OnceLock;

use tokio::sync::Mutex;

use crate::coord::comm::CommSender;
use crate::coord::error::CoordError;
use crate::coord::message::{QueueMessage, RESTART_REQUESTED, RestartRequest};
use crate::coord::state::{SlaveInputState, SlaveState};

/// State machine of the slave controller loop.
///
/// Owns the process-wide slave state, created as [`SlaveState::Sleep`] and
/// guarded by a mutex with unbounded wait (unlike the master's bounded
/// gate). Transitions are requested through [`SlaveMachine::handle_status`]
/// with the [`SlaveInputState`] vocabulary; raw integer inputs from the
/// bridge go through [`SlaveMachine::handle_status_raw`].
///
/// # Examples
///
/// ```rust
/// use tandem_coord::coord::slave::SlaveMachine;
/// use tandem_coord::coord::state::{SlaveInputState, SlaveState};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), tandem_coord::coord::error::CoordError> {
/// let slave = SlaveMachine::new();
/// slave.handle_status(SlaveInputState::ProcessOrActive).await?;
/// assert_eq!(slave.state().await, SlaveState::Active);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SlaveMachine {
    state: Mutex<SlaveState>,
    report_tx: OnceLock<CommSender<QueueMessage>>,
    restart_tx: OnceLock<CommSender<RestartRequest>>,
}

impl Default for SlaveMachine {
    fn default() -> Self {
        SlaveMachine::new()
    }
}

impl SlaveMachine {
    pub fn new() -> Self {
        SlaveMachine {
            state: Mutex::new(SlaveState::Sleep),
            report_tx: OnceLock::new(),
            restart_tx: OnceLock::new(),
        }
    }

    /// Bind the sender toward the master side of the state channel.
    /// Binding happens once during bootstrap; a second call is ignored.
    pub fn bind_report_sender(&self, tx: CommSender<QueueMessage>) {
        if self.report_tx.set(tx).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "SlaveStateMachine",
                "report sender already bound, ignoring rebind"
            );
        }
    }

    /// Bind the restart channel sender toward the task supervisor.
    /// Binding happens once during bootstrap; a second call is ignored.
    pub fn bind_restart_sender(&self, tx: CommSender<RestartRequest>) {
        if self.restart_tx.set(tx).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "SlaveStateMachine",
                "restart sender already bound, ignoring rebind"
            );
        }
    }

    /// Current resting state. Never observes [`SlaveState::Reset`]; the
    /// reset handler commits `Sleep` before doing anything else.
    pub async fn state(&self) -> SlaveState {
        *self.state.lock().await
    }

    /// Resolve a transition request and run the target state's entry handler.
    ///
    /// # Errors
    ///
    /// - [`CoordError::Comm`] from the fault handler if the state channel is
    ///   unbound, or from the reset handler if the restart request cannot be
    ///   delivered. In the reset case the `Sleep` mutation has already been
    ///   committed when the error is returned.
    pub async fn handle_status(&self, input: SlaveInputState) -> Result<(), CoordError> {
        match SlaveState::for_input(input) {
            SlaveState::Sleep => self.enter_sleep().await,
            SlaveState::Active => self.enter_active().await,
            SlaveState::Fault => self.enter_fault().await,
            SlaveState::Reset => self.enter_reset().await,
        }
    }

    /// Raw-ordinal boundary used by the input bridge.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::State`] for an ordinal outside the
    /// [`SlaveInputState`] range; no mutation occurs.
    pub async fn handle_status_raw(&self, raw: u8) -> Result<(), CoordError> {
        let input = SlaveInputState::try_from(raw)?;
        self.handle_status(input).await
    }

    /// Take the mutex (unbounded wait) and commit the target if it differs.
    async fn commit(&self, target: SlaveState) {
        let mut state = self.state.lock().await;
        if *state != target {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                component = "SlaveStateMachine",
                from = ?*state,
                to = ?target,
                "new slave state committed"
            );
            *state = target;
        }
    }

    async fn enter_sleep(&self) -> Result<(), CoordError> {
        self.commit(SlaveState::Sleep).await;
        Ok(())
    }

    async fn enter_active(&self) -> Result<(), CoordError> {
        self.commit(SlaveState::Active).await;
        Ok(())
    }

    /// Fault entry handler: commit the state, then push the fault report so
    /// the master learns about it ahead of its poll cycle.
    async fn enter_fault(&self) -> Result<(), CoordError> {
        self.commit(SlaveState::Fault).await;

        let Some(tx) = self.report_tx.get() else {
            return Err(CoordError::Comm(
                "state channel not initialized".to_string(),
            ));
        };
        if let Err(_err) = tx.send(QueueMessage::slave_fault()).await {
            // Report lost; the observation loop carries the state anyway.
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "SlaveStateMachine",
                error = %_err,
                "fault report dropped"
            );
        }
        Ok(())
    }

    /// Reset entry handler. `Reset` is a transient pass-through: the resting
    /// value is always `Sleep`, committed before the restart request goes
    /// out. If the restart channel is unavailable the commit stands and the
    /// caller sees [`CoordError::Comm`] (partial success).
    async fn enter_reset(&self) -> Result<(), CoordError> {
        #[cfg(feature = "tracing")]
        tracing::info!(
            component = "SlaveStateMachine",
            "reset requested, returning to sleep baseline"
        );
        self.commit(SlaveState::Sleep).await;

        let Some(tx) = self.restart_tx.get() else {
            return Err(CoordError::Comm(
                "restart channel not initialized".to_string(),
            ));
        };
        tx.send(RESTART_REQUESTED).await
    }
}
