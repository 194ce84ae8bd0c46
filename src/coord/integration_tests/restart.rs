use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::coord::bootstrap::Coordinator;
use crate::coord::config::CoordConfig;
use crate::coord::error::CoordError;
use crate::coord::integration_tests::helper;
use crate::coord::state::{MasterState, SlaveInputState, SlaveState};
use crate::coord::supervisor::TaskId;

#[tokio::test]
async fn init_rejects_an_invalid_config() {
    match Coordinator::init(CoordConfig::default().queue_depth(0)) {
        Err(CoordError::Config(_)) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn start_twice_is_rejected() {
    helper::init_logs();
    let mut coordinator = Coordinator::init(helper::fast_config()).unwrap();
    let handles = coordinator.start().await.unwrap();
    assert_eq!(handles.len(), 4);

    match coordinator.start().await {
        Err(CoordError::Comm(_)) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    for handle in handles {
        handle.abort();
    }
}

#[tokio::test]
async fn full_stack_fault_recovery_cycle() {
    helper::init_logs();
    let mut coordinator = Coordinator::init(helper::fast_config()).unwrap();
    let handles = coordinator.start().await.unwrap();

    let master = coordinator.master();
    let slave = coordinator.slave();
    let supervisor = coordinator.supervisor();

    assert_eq!(
        supervisor.handle_snapshot().await,
        vec![(TaskId::StatusObservation, true), (TaskId::InputBridge, true)]
    );

    // The observation loop carries an activation to the master.
    slave
        .handle_status(SlaveInputState::ProcessOrActive)
        .await
        .unwrap();
    let deadline = Instant::now() + Duration::from_secs(2);
    while master.current_state() != MasterState::Processing {
        assert!(Instant::now() < deadline, "master never reached Processing");
        sleep(Duration::from_millis(5)).await;
    }

    // Declared fault: error on the master, reset command back, restart of
    // the registered tasks, both machines back at their baselines.
    slave
        .handle_status(SlaveInputState::ErrorOrFault)
        .await
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        let settled = master.current_state() == MasterState::Idle
            && slave.state().await == SlaveState::Sleep;
        if settled {
            break;
        }
        assert!(
            Instant::now() < deadline,
            "machines never settled back to baseline"
        );
        sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(
        supervisor.handle_snapshot().await,
        vec![(TaskId::StatusObservation, true), (TaskId::InputBridge, true)]
    );

    for handle in handles {
        handle.abort();
    }
}
