use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::coord::error::CoordError;
use crate::coord::slave::SlaveMachine;
use crate::coord::state::SlaveInputState;

/// Identity of a restartable task in the supervisor registry.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    StatusObservation,
    InputBridge,
}

/// Factory recreating one registered task. Returning `Err` models a failed
/// spawn, which the supervisor treats as fatal for the restart in progress.
pub type TaskFactory = Box<dyn Fn() -> Result<JoinHandle<()>, CoordError> + Send + Sync>;

/// One slot in the supervisor registry: task metadata, the factory used to
/// recreate it, and the live handle once a task is bound or spawned.
pub struct TaskEntry {
    pub id: TaskId,
    pub name: &'static str,
    /// Scheduling priority, recorded and logged only; the tokio scheduler
    /// has no priority lanes.
    pub priority: u8,
    factory: TaskFactory,
    handle: Option<JoinHandle<()>>,
}

impl TaskEntry {
    pub fn new(id: TaskId, name: &'static str, priority: u8, factory: TaskFactory) -> Self {
        TaskEntry {
            id,
            name,
            priority,
            factory,
            handle: None,
        }
    }

    pub fn has_live_handle(&self) -> bool {
        self.handle.is_some()
    }
}

impl fmt::Debug for TaskEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("handle", &self.handle.as_ref().map(|_| "live"))
            .finish()
    }
}

/// Supervisor over a fixed set of restartable tasks.
///
/// The registry is a fixed-order sequence built once at startup and never
/// resized. Handles are bound by name through
/// [`TaskSupervisor::bind_handle`]; the restart path is the only mutation
/// after that. Concurrent restarts are not supported and are serialized by
/// having exactly one restart-listener task.
pub struct TaskSupervisor {
    entries: Mutex<Vec<TaskEntry>>,
    slave: Arc<SlaveMachine>,
}

impl fmt::Debug for TaskSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSupervisor").finish_non_exhaustive()
    }
}

impl TaskSupervisor {
    pub fn new(slave: Arc<SlaveMachine>, entries: Vec<TaskEntry>) -> Self {
        TaskSupervisor {
            entries: Mutex::new(entries),
            slave,
        }
    }

    /// Bind a live handle to the registry slot with the given id.
    ///
    /// Registration is by name, so callers cannot silently bind a handle to
    /// the wrong slot by passing handles in the wrong order.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Supervision`] if no slot carries the id.
    pub async fn bind_handle(&self, id: TaskId, handle: JoinHandle<()>) -> Result<(), CoordError> {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Err(CoordError::Supervision(format!(
                "no registry slot for task {id:?}"
            )));
        };
        entry.handle = Some(handle);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            component = "SlaveRestart",
            task = entry.name,
            "task handle bound"
        );
        Ok(())
    }

    /// Which slots currently hold a live handle, in registry order.
    pub async fn handle_snapshot(&self) -> Vec<(TaskId, bool)> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|entry| (entry.id, entry.has_live_handle()))
            .collect()
    }

    /// Tear down and recreate every registered task.
    ///
    /// Live tasks are aborted without quiescing; they lose all local state,
    /// which is safe because authoritative state lives in the shared state
    /// machines. Recreation walks the registry in order and fails fast: on
    /// the first factory error the function returns immediately, entries
    /// recreated so far keep running, and nothing is rolled back or
    /// retried. On full success the slave machine is forced to its `Sleep`
    /// baseline; if that fails the restart is reported failed even though
    /// all tasks are running.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Supervision`] on the first recreation failure
    /// or if the post-restart baseline cannot be set.
    pub async fn restart_all_tasks(&self) -> Result<(), CoordError> {
        #[cfg(feature = "tracing")]
        tracing::info!(component = "SlaveRestart", "restarting all tasks");

        let mut entries = self.entries.lock().await;

        for entry in entries.iter_mut() {
            if let Some(handle) = entry.handle.take() {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    component = "SlaveRestart",
                    task = entry.name,
                    "terminating task"
                );
                handle.abort();
            }
        }

        for entry in entries.iter_mut() {
            #[cfg(feature = "tracing")]
            tracing::info!(
                component = "SlaveRestart",
                task = entry.name,
                priority = entry.priority,
                "recreating task"
            );
            match (entry.factory)() {
                Ok(handle) => {
                    entry.handle = Some(handle);
                }
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(
                        component = "SlaveRestart",
                        task = entry.name,
                        error = %err,
                        "failed to recreate task"
                    );
                    return Err(CoordError::Supervision(format!(
                        "failed to recreate task {}: {err}",
                        entry.name
                    )));
                }
            }
        }
        drop(entries);

        self.slave
            .handle_status(SlaveInputState::IdleOrSleep)
            .await
            .map_err(|err| {
                CoordError::Supervision(format!("post-restart baseline failed: {err}"))
            })?;
        Ok(())
    }
}
