use crate::coord::config::CoordConfig;
use crate::coord::error::CoordError;

#[test]
fn defaults_match_documented_timing() {
    let config = CoordConfig::default();
    assert_eq!(config.queue_depth, 10);
    assert_eq!(config.send_wait_ms, 100);
    assert_eq!(config.send_settle_ms, 10);
    assert_eq!(config.lock_wait_ms, 10);
    assert_eq!(config.master_status_interval_ms, 500);
    assert_eq!(config.observation_interval_ms, 80);
    assert_eq!(config.restart_delay_ms, 3000);
    assert!(config.validate().is_ok());
}

#[test]
fn builder_overrides_fields() {
    let config = CoordConfig::default()
        .queue_depth(4)
        .send_wait_ms(25)
        .send_settle_ms(2)
        .lock_wait_ms(5)
        .recv_pace_ms(1)
        .master_status_interval_ms(100)
        .observation_interval_ms(20)
        .bridge_pace_ms(1)
        .restart_delay_ms(50)
        .bind_addr("127.0.0.1:0");

    assert_eq!(config.queue_depth, 4);
    assert_eq!(config.send_wait_ms, 25);
    assert_eq!(config.restart_delay_ms, 50);
    assert_eq!(config.bind_addr, "127.0.0.1:0");
    assert!(config.validate().is_ok());
}

#[test]
fn validation_rejects_degenerate_values() {
    match CoordConfig::default().queue_depth(0).validate() {
        Err(CoordError::Config(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    match CoordConfig::default().send_wait_ms(0).validate() {
        Err(CoordError::Config(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    match CoordConfig::default().bind_addr("").validate() {
        Err(CoordError::Config(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}
