//! # tandem-coord
//!
//! Coordination core for a pair of cooperating control loops - a master
//! supervisor and a slave controller - running as independent tasks on one
//! tokio runtime. The two sides keep their state machines consistent
//! through bounded FIFO channels, and a task supervisor can tear down and
//! recreate the restartable task set to recover from a declared fault.
//!
//! ## Pieces
//!
//! - **State machines**: [`coord::master::MasterMachine`] (Idle /
//!   Processing / Error, bounded-wait gate) and
//!   [`coord::slave::SlaveMachine`] (Sleep / Active / Fault / transient
//!   Reset, unbounded mutex). Cross-machine coordination is message
//!   passing only; neither side ever touches the other's lock.
//! - **Comm channels**: bounded send with a fixed wait budget and settle
//!   delay, blocking receive, strict FIFO per direction
//!   ([`coord::comm`]).
//! - **Task supervisor**: a fixed registry of restartable tasks with
//!   named handle binding and a fail-fast, no-rollback restart path
//!   ([`coord::supervisor`]).
//! - **Input bridge**: a TCP echo server that parses `ID=<int>;DATA=<int>`
//!   commands into slave transition requests ([`coord::bridge`]).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tandem_coord::coord::bootstrap::Coordinator;
//! use tandem_coord::coord::config::CoordConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tandem_coord::coord::error::CoordError> {
//!     let config = CoordConfig::default().bind_addr("127.0.0.1:7070");
//!     let mut coordinator = Coordinator::init(config)?;
//!     let handles = coordinator.start().await?;
//!
//!     // The core runs until the process is stopped.
//!     for handle in handles {
//!         let _ = handle.await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Optional features
//!
//! - `tracing` (default): structured logging for every state transition,
//!   dropped message, and restart.
//! - `serde`: serialization support for the state and message vocabulary.

pub mod coord;
pub mod helper;
