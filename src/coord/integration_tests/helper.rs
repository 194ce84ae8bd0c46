use std::time::Duration;

use crate::coord::comm::CommTiming;
use crate::coord::config::CoordConfig;

/// Install a fmt subscriber for test runs. Repeated calls are fine; only
/// the first one wins.
pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Default timing scaled down so a full coordination cycle completes in
/// tens of milliseconds.
pub fn fast_config() -> CoordConfig {
    CoordConfig::default()
        .queue_depth(8)
        .send_wait_ms(50)
        .send_settle_ms(1)
        .lock_wait_ms(20)
        .recv_pace_ms(1)
        .master_status_interval_ms(50)
        .observation_interval_ms(10)
        .bridge_pace_ms(1)
        .restart_delay_ms(30)
        .bind_addr("127.0.0.1:0")
}

pub fn fast_timing() -> CommTiming {
    CommTiming {
        send_wait: Duration::from_millis(50),
        settle: Duration::from_millis(1),
    }
}
