use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::coord::bridge::TcpBridge;
use crate::coord::comm::{CommEndpoint, CommReceiver, CommTiming, channel, duplex};
use crate::coord::config::CoordConfig;
use crate::coord::error::CoordError;
use crate::coord::master::MasterMachine;
use crate::coord::master::handler::{master_receiver_loop, master_status_loop};
use crate::coord::message::{QueueMessage, RestartRequest};
use crate::coord::slave::SlaveMachine;
use crate::coord::slave::handler::{
    restart_listener_loop, slave_observation_loop, slave_receiver_loop,
};
use crate::coord::supervisor::{TaskEntry, TaskId, TaskSupervisor};
use crate::helper::tracing::MaybeInstrument;

// Priorities are registry metadata, recorded for logging.
const PRIO_STATUS_OBSERVATION: u8 = 1;
const PRIO_INPUT_BRIDGE: u8 = 1;

/// Wires the coordination core together in the required order: channels
/// first, then state machines and their sender bindings, then the
/// supervisor registry. Task spawning happens in [`Coordinator::start`].
///
/// # Examples
///
/// ```rust,no_run
/// use tandem_coord::coord::bootstrap::Coordinator;
/// use tandem_coord::coord::config::CoordConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), tandem_coord::coord::error::CoordError> {
///     let config = CoordConfig::default().bind_addr("127.0.0.1:7070");
///     let mut coordinator = Coordinator::init(config)?;
///     let handles = coordinator.start().await?;
///     for handle in handles {
///         let _ = handle.await;
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Coordinator {
    config: CoordConfig,
    master: Arc<MasterMachine>,
    slave: Arc<SlaveMachine>,
    supervisor: Arc<TaskSupervisor>,
    master_endpoint: CommEndpoint<QueueMessage>,
    slave_endpoint: CommEndpoint<QueueMessage>,
    restart_rx: Option<CommReceiver<RestartRequest>>,
}

impl Coordinator {
    /// Validate the configuration and construct the wired core.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Config`] if the configuration is rejected.
    pub fn init(config: CoordConfig) -> Result<Self, CoordError> {
        config.validate()?;

        let timing = CommTiming::from_config(&config);
        let (master_endpoint, slave_endpoint) = duplex(config.queue_depth, timing);
        let (restart_tx, restart_rx) = channel(config.queue_depth, timing);

        let master = Arc::new(MasterMachine::new(config.lock_wait()));
        master.bind_command_sender(master_endpoint.tx.clone());

        let slave = Arc::new(SlaveMachine::new());
        slave.bind_report_sender(slave_endpoint.tx.clone());
        slave.bind_restart_sender(restart_tx);

        let entries = vec![
            observation_entry(
                slave.clone(),
                slave_endpoint.clone(),
                config.observation_interval(),
            ),
            bridge_entry(slave.clone(), config.bind_addr.clone(), config.bridge_pace()),
        ];
        let supervisor = Arc::new(TaskSupervisor::new(slave.clone(), entries));

        #[cfg(feature = "tracing")]
        tracing::info!(component = "Bootstrap", "components initialized");

        Ok(Coordinator {
            config,
            master,
            slave,
            supervisor,
            master_endpoint,
            slave_endpoint,
            restart_rx: Some(restart_rx),
        })
    }

    /// Spawn the full task set and bind the restartable tasks into the
    /// supervisor registry by name.
    ///
    /// Returns the handles of the non-restartable core loops; the
    /// restartable tasks are owned by the supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Comm`] when called twice, and
    /// [`CoordError::Supervision`] if a handle cannot be bound.
    pub async fn start(&mut self) -> Result<Vec<JoinHandle<()>>, CoordError> {
        let restart_rx = self
            .restart_rx
            .take()
            .ok_or_else(|| CoordError::Comm("coordinator already started".to_string()))?;

        let mut handles = Vec::new();

        handles.push(tokio::spawn(
            master_receiver_loop(
                self.master.clone(),
                self.master_endpoint.rx.clone(),
                self.config.recv_pace(),
            )
            .maybe_instrument("master_receiver"),
        ));
        handles.push(tokio::spawn(
            master_status_loop(
                self.master.clone(),
                self.master_endpoint.tx.clone(),
                self.config.master_status_interval(),
            )
            .maybe_instrument("master_status"),
        ));
        handles.push(tokio::spawn(
            slave_receiver_loop(
                self.slave.clone(),
                self.slave_endpoint.rx.clone(),
                self.config.recv_pace(),
            )
            .maybe_instrument("slave_receiver"),
        ));
        handles.push(tokio::spawn(
            restart_listener_loop(
                self.supervisor.clone(),
                restart_rx,
                self.config.restart_delay(),
            )
            .maybe_instrument("restart_listener"),
        ));

        // Restartable tasks: spawned here once, recreated by the supervisor
        // afterwards.
        let observation = tokio::spawn(
            slave_observation_loop(
                self.slave.clone(),
                self.slave_endpoint.tx.clone(),
                self.config.observation_interval(),
            )
            .maybe_instrument("status_observation"),
        );
        self.supervisor
            .bind_handle(TaskId::StatusObservation, observation)
            .await?;

        let bridge = tokio::spawn(
            run_bridge(
                self.slave.clone(),
                self.config.bind_addr.clone(),
                self.config.bridge_pace(),
            )
            .maybe_instrument("input_bridge"),
        );
        self.supervisor.bind_handle(TaskId::InputBridge, bridge).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(component = "Bootstrap", "all tasks started");

        Ok(handles)
    }

    pub fn master(&self) -> Arc<MasterMachine> {
        self.master.clone()
    }

    pub fn slave(&self) -> Arc<SlaveMachine> {
        self.slave.clone()
    }

    pub fn supervisor(&self) -> Arc<TaskSupervisor> {
        self.supervisor.clone()
    }

    pub fn config(&self) -> &CoordConfig {
        &self.config
    }
}

/// Bridge task body: bind, then serve. A bind failure is fatal to this task
/// only; the supervisor can recreate it later.
async fn run_bridge(slave: Arc<SlaveMachine>, addr: String, pace: Duration) {
    match TcpBridge::bind(&addr, pace).await {
        Ok(bridge) => bridge.serve(slave).await,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::error!(
                component = "TcpBridge",
                error = %_err,
                "bridge task terminating, restart required to recover"
            );
        }
    }
}

fn observation_entry(
    slave: Arc<SlaveMachine>,
    endpoint: CommEndpoint<QueueMessage>,
    interval: Duration,
) -> TaskEntry {
    TaskEntry::new(
        TaskId::StatusObservation,
        "SlaveStatusObservationHandler",
        PRIO_STATUS_OBSERVATION,
        Box::new(move || {
            Ok(tokio::spawn(
                slave_observation_loop(slave.clone(), endpoint.tx.clone(), interval)
                    .maybe_instrument("status_observation"),
            ))
        }),
    )
}

fn bridge_entry(slave: Arc<SlaveMachine>, addr: String, pace: Duration) -> TaskEntry {
    TaskEntry::new(
        TaskId::InputBridge,
        "TcpEchoServerTask",
        PRIO_INPUT_BRIDGE,
        Box::new(move || {
            Ok(tokio::spawn(
                run_bridge(slave.clone(), addr.clone(), pace).maybe_instrument("input_bridge"),
            ))
        }),
    )
}
