use crate::coord::message::{MessageId, QueueMessage, RESTART_REQUESTED, StatePayload};
use crate::coord::state::{MasterState, SlaveState};

#[test]
fn constructors_tag_messages_correctly() {
    let fault = QueueMessage::slave_fault();
    assert_eq!(fault.id, MessageId::HandleSlaveFault);
    assert_eq!(fault.state, StatePayload::Slave(SlaveState::Fault));

    let reset = QueueMessage::reset_slave(MasterState::Error);
    assert_eq!(reset.id, MessageId::ResetSlave);
    assert_eq!(reset.state, StatePayload::Master(MasterState::Error));

    let status = QueueMessage::slave_status(SlaveState::Active);
    assert_eq!(status.id, MessageId::SlaveCurrentStatus);
    assert_eq!(status.state, StatePayload::Slave(SlaveState::Active));

    let master_status = QueueMessage::master_status(MasterState::Idle);
    assert_eq!(master_status.id, MessageId::SlaveCurrentStatus);
    assert_eq!(master_status.state, StatePayload::Master(MasterState::Idle));
}

#[test]
fn restart_request_is_one_byte() {
    assert_eq!(RESTART_REQUESTED.0, 1);
}

#[cfg(feature = "serde")]
#[test]
fn queue_message_serde_round_trip() {
    let message = QueueMessage::reset_slave(MasterState::Error);
    let json = serde_json::to_string(&message).unwrap();
    let back: QueueMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, message);
}
