use std::time::Duration;

use crate::coord::error::CoordError;

/// Timing and sizing knobs for the coordination core.
///
/// Defaults: a 100 ms wait budget for
/// channel sends followed by a 10 ms settle delay, a 10 ms bounded wait on
/// the master's state gate, 500 ms master status broadcasts, 80 ms slave
/// observation and bridge pacing, and a 3 s grace period before a restart
/// is executed.
///
/// # Examples
///
/// ```rust
/// use tandem_coord::coord::config::CoordConfig;
///
/// let config = CoordConfig::default()
///     .queue_depth(16)
///     .send_wait_ms(50)
///     .bind_addr("127.0.0.1:7070");
/// config.validate().unwrap();
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordConfig {
    /// Bounded depth of each comm channel.
    pub queue_depth: usize,

    /// Wait budget for space when sending on a channel.
    pub send_wait_ms: u64,

    /// Settle delay imposed after every successful send.
    pub send_settle_ms: u64,

    /// Bounded wait for the master's state gate.
    pub lock_wait_ms: u64,

    /// Pacing delay per receiver-loop iteration (master and slave side).
    pub recv_pace_ms: u64,

    /// Interval between master status broadcasts.
    pub master_status_interval_ms: u64,

    /// Interval between slave status observations.
    pub observation_interval_ms: u64,

    /// Pacing delay per bridge connection iteration.
    pub bridge_pace_ms: u64,

    /// Grace period between a restart request and the restart itself.
    pub restart_delay_ms: u64,

    /// Listen address for the TCP input bridge.
    pub bind_addr: String,
}

impl Default for CoordConfig {
    fn default() -> Self {
        CoordConfig {
            queue_depth: 10,
            send_wait_ms: 100,
            send_settle_ms: 10,
            lock_wait_ms: 10,
            recv_pace_ms: 10,
            master_status_interval_ms: 500,
            observation_interval_ms: 80,
            bridge_pace_ms: 80,
            restart_delay_ms: 3000,
            bind_addr: "127.0.0.1:7070".to_string(),
        }
    }
}

impl CoordConfig {
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth;
        self
    }

    pub fn send_wait_ms(mut self, ms: u64) -> Self {
        self.send_wait_ms = ms;
        self
    }

    pub fn send_settle_ms(mut self, ms: u64) -> Self {
        self.send_settle_ms = ms;
        self
    }

    pub fn lock_wait_ms(mut self, ms: u64) -> Self {
        self.lock_wait_ms = ms;
        self
    }

    pub fn recv_pace_ms(mut self, ms: u64) -> Self {
        self.recv_pace_ms = ms;
        self
    }

    pub fn master_status_interval_ms(mut self, ms: u64) -> Self {
        self.master_status_interval_ms = ms;
        self
    }

    pub fn observation_interval_ms(mut self, ms: u64) -> Self {
        self.observation_interval_ms = ms;
        self
    }

    pub fn bridge_pace_ms(mut self, ms: u64) -> Self {
        self.bridge_pace_ms = ms;
        self
    }

    pub fn restart_delay_ms(mut self, ms: u64) -> Self {
        self.restart_delay_ms = ms;
        self
    }

    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Validate the configuration before anything is wired up.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Config`] for a zero queue depth, a zero send
    /// wait budget, or an empty bind address.
    pub fn validate(&self) -> Result<(), CoordError> {
        if self.queue_depth == 0 {
            return Err(CoordError::Config(
                "queue depth must be at least 1".to_string(),
            ));
        }
        if self.send_wait_ms == 0 {
            return Err(CoordError::Config(
                "send wait budget must be non-zero".to_string(),
            ));
        }
        if self.bind_addr.is_empty() {
            return Err(CoordError::Config(
                "bridge bind address cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn send_wait(&self) -> Duration {
        Duration::from_millis(self.send_wait_ms)
    }

    pub(crate) fn send_settle(&self) -> Duration {
        Duration::from_millis(self.send_settle_ms)
    }

    pub(crate) fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }

    pub(crate) fn recv_pace(&self) -> Duration {
        Duration::from_millis(self.recv_pace_ms)
    }

    pub(crate) fn master_status_interval(&self) -> Duration {
        Duration::from_millis(self.master_status_interval_ms)
    }

    pub(crate) fn observation_interval(&self) -> Duration {
        Duration::from_millis(self.observation_interval_ms)
    }

    pub(crate) fn bridge_pace(&self) -> Duration {
        Duration::from_millis(self.bridge_pace_ms)
    }

    pub(crate) fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}
