use crate::coord::error::CoordError;

/// Resting states of the master supervisor loop.
///
/// The master owns exactly one of these values for the lifetime of the
/// process, starting at [`MasterState::Idle`]. Transitions happen only
/// through the master machine's dispatcher, never by external callers
/// writing the value directly.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MasterState {
    Idle = 0,
    Processing = 1,
    Error = 2,
}

impl MasterState {
    /// Master-side state map: the master state a slave status report lands on.
    ///
    /// The table is total over [`SlaveState`]; out-of-range input is only
    /// representable at the raw-ordinal boundary and is rejected there by
    /// [`TryFrom<u8>`].
    pub fn for_report(report: SlaveState) -> MasterState {
        match report {
            SlaveState::Sleep => MasterState::Idle,
            SlaveState::Active => MasterState::Processing,
            SlaveState::Fault => MasterState::Error,
            // Reset reports mean the slave is unwinding to its baseline.
            SlaveState::Reset => MasterState::Idle,
        }
    }

    pub(crate) fn from_ordinal(raw: u8) -> MasterState {
        // Only ever fed from values stored by the master machine itself.
        MasterState::try_from(raw).unwrap_or(MasterState::Idle)
    }
}

impl TryFrom<u8> for MasterState {
    type Error = CoordError;

    fn try_from(raw: u8) -> Result<Self, CoordError> {
        match raw {
            0 => Ok(MasterState::Idle),
            1 => Ok(MasterState::Processing),
            2 => Ok(MasterState::Error),
            other => Err(CoordError::State(format!(
                "invalid master state ordinal: {other}"
            ))),
        }
    }
}

/// Resting states of the slave controller loop.
///
/// [`SlaveState::Reset`] is transient: the reset entry handler always lands
/// back on [`SlaveState::Sleep`], so `Reset` is never observed from
/// [`SlaveMachine::state`](crate::coord::slave::SlaveMachine::state).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SlaveState {
    Sleep = 0,
    Active = 1,
    Fault = 2,
    Reset = 3,
}

impl SlaveState {
    /// Slave-side input map: the slave state a transition request resolves to.
    pub fn for_input(input: SlaveInputState) -> SlaveState {
        match input {
            SlaveInputState::IdleOrSleep => SlaveState::Sleep,
            SlaveInputState::ProcessOrActive => SlaveState::Active,
            SlaveInputState::ErrorOrFault => SlaveState::Fault,
            SlaveInputState::ErrorOrReset => SlaveState::Reset,
        }
    }
}

impl TryFrom<u8> for SlaveState {
    type Error = CoordError;

    fn try_from(raw: u8) -> Result<Self, CoordError> {
        match raw {
            0 => Ok(SlaveState::Sleep),
            1 => Ok(SlaveState::Active),
            2 => Ok(SlaveState::Fault),
            3 => Ok(SlaveState::Reset),
            other => Err(CoordError::State(format!(
                "invalid slave state ordinal: {other}"
            ))),
        }
    }
}

/// Transition *requests* presented to the slave machine.
///
/// This is a distinct vocabulary from [`SlaveState`]: inputs are requests,
/// states are resting values, and the two are related only through
/// [`SlaveState::for_input`]. `ErrorOrReset` has no resting counterpart and
/// always routes back to `Sleep`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SlaveInputState {
    IdleOrSleep = 0,
    ProcessOrActive = 1,
    ErrorOrFault = 2,
    ErrorOrReset = 3,
}

impl TryFrom<u8> for SlaveInputState {
    type Error = CoordError;

    fn try_from(raw: u8) -> Result<Self, CoordError> {
        match raw {
            0 => Ok(SlaveInputState::IdleOrSleep),
            1 => Ok(SlaveInputState::ProcessOrActive),
            2 => Ok(SlaveInputState::ErrorOrFault),
            3 => Ok(SlaveInputState::ErrorOrReset),
            other => Err(CoordError::State(format!(
                "invalid slave input ordinal: {other}"
            ))),
        }
    }
}
