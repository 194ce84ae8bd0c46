use crate::coord::state::{MasterState, SlaveState};

/// Identifies what a [`QueueMessage`] carries.
///
/// `HandleSlaveFault` and `SlaveCurrentStatus` tag status reports;
/// `ResetSlave` tags a command from the master asking the slave to unwind.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageId {
    HandleSlaveFault,
    ResetSlave,
    SlaveCurrentStatus,
}

/// State value attached to a [`QueueMessage`], tagged by which machine it
/// belongs to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatePayload {
    Master(MasterState),
    Slave(SlaveState),
}

/// Message carried on the state channel between master and slave loops.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueMessage {
    pub id: MessageId,
    pub state: StatePayload,
}

impl QueueMessage {
    /// Fault report pushed by the slave's fault entry handler.
    pub fn slave_fault() -> Self {
        QueueMessage {
            id: MessageId::HandleSlaveFault,
            state: StatePayload::Slave(SlaveState::Fault),
        }
    }

    /// Unwind command emitted by the master's error entry handler.
    pub fn reset_slave(current: MasterState) -> Self {
        QueueMessage {
            id: MessageId::ResetSlave,
            state: StatePayload::Master(current),
        }
    }

    /// Periodic status snapshot from the master toward the slave.
    pub fn master_status(state: MasterState) -> Self {
        QueueMessage {
            id: MessageId::SlaveCurrentStatus,
            state: StatePayload::Master(state),
        }
    }

    /// Periodic status snapshot from the slave toward the master.
    pub fn slave_status(state: SlaveState) -> Self {
        QueueMessage {
            id: MessageId::SlaveCurrentStatus,
            state: StatePayload::Slave(state),
        }
    }
}

/// One-byte restart signal sent by the slave's reset handler to the task
/// supervisor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartRequest(pub u8);

/// The only restart payload the supervisor currently understands.
pub const RESTART_REQUESTED: RestartRequest = RestartRequest(1);
