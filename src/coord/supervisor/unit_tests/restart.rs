use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::coord::error::CoordError;
use crate::coord::slave::SlaveMachine;
use crate::coord::state::{SlaveInputState, SlaveState};
use crate::coord::supervisor::{TaskEntry, TaskFactory, TaskId, TaskSupervisor};

fn parked_factory() -> TaskFactory {
    Box::new(|| {
        Ok(tokio::spawn(async {
            sleep(Duration::from_secs(3600)).await;
        }))
    })
}

fn failing_factory() -> TaskFactory {
    Box::new(|| Err(CoordError::Supervision("spawn refused".to_string())))
}

fn two_slot_registry(second: TaskFactory) -> Vec<TaskEntry> {
    vec![
        TaskEntry::new(
            TaskId::StatusObservation,
            "SlaveStatusObservationHandler",
            1,
            parked_factory(),
        ),
        TaskEntry::new(TaskId::InputBridge, "TcpEchoServerTask", 1, second),
    ]
}

#[tokio::test]
async fn handles_bind_by_name_not_by_order() {
    let slave = Arc::new(SlaveMachine::new());
    let supervisor = TaskSupervisor::new(slave, two_slot_registry(parked_factory()));

    assert_eq!(
        supervisor.handle_snapshot().await,
        vec![(TaskId::StatusObservation, false), (TaskId::InputBridge, false)]
    );

    let handle = tokio::spawn(async {});
    supervisor
        .bind_handle(TaskId::InputBridge, handle)
        .await
        .unwrap();
    assert_eq!(
        supervisor.handle_snapshot().await,
        vec![(TaskId::StatusObservation, false), (TaskId::InputBridge, true)]
    );
}

#[tokio::test]
async fn binding_an_unknown_id_is_rejected() {
    let slave = Arc::new(SlaveMachine::new());
    let registry = vec![TaskEntry::new(
        TaskId::StatusObservation,
        "SlaveStatusObservationHandler",
        1,
        parked_factory(),
    )];
    let supervisor = TaskSupervisor::new(slave, registry);

    let handle = tokio::spawn(async {});
    match supervisor.bind_handle(TaskId::InputBridge, handle).await {
        Err(CoordError::Supervision(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn restart_recreates_every_task_and_forces_the_sleep_baseline() {
    let slave = Arc::new(SlaveMachine::new());
    slave
        .handle_status(SlaveInputState::ProcessOrActive)
        .await
        .unwrap();
    let supervisor = TaskSupervisor::new(Arc::clone(&slave), two_slot_registry(parked_factory()));

    supervisor.restart_all_tasks().await.unwrap();

    assert_eq!(
        supervisor.handle_snapshot().await,
        vec![(TaskId::StatusObservation, true), (TaskId::InputBridge, true)]
    );
    assert_eq!(slave.state().await, SlaveState::Sleep);
}

#[tokio::test]
async fn restart_aborts_the_previous_generation() {
    let witness = Arc::new(());
    let held = Arc::clone(&witness);
    let handle = tokio::spawn(async move {
        let _held = held;
        sleep(Duration::from_secs(3600)).await;
    });

    let slave = Arc::new(SlaveMachine::new());
    let supervisor = TaskSupervisor::new(slave, two_slot_registry(parked_factory()));
    supervisor
        .bind_handle(TaskId::StatusObservation, handle)
        .await
        .unwrap();

    supervisor.restart_all_tasks().await.unwrap();

    // The aborted task drops its clone of the witness.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while Arc::strong_count(&witness) != 1 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "previous generation was not aborted"
        );
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn failed_recreation_stops_the_restart_without_rollback() {
    let slave = Arc::new(SlaveMachine::new());
    slave
        .handle_status(SlaveInputState::ProcessOrActive)
        .await
        .unwrap();
    let supervisor = TaskSupervisor::new(Arc::clone(&slave), two_slot_registry(failing_factory()));

    match supervisor.restart_all_tasks().await {
        Err(CoordError::Supervision(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    // The slot recreated before the failure keeps running; the failed slot
    // stays empty and the slave baseline is not applied.
    assert_eq!(
        supervisor.handle_snapshot().await,
        vec![(TaskId::StatusObservation, true), (TaskId::InputBridge, false)]
    );
    assert_eq!(slave.state().await, SlaveState::Active);
}
