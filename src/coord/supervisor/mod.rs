pub mod registry;

pub use registry::{TaskEntry, TaskFactory, TaskId, TaskSupervisor};

#[cfg(test)]
mod unit_tests;
