pub mod bootstrap;
pub mod bridge;
pub mod comm;
pub mod config;
pub mod error;
pub mod master;
pub mod message;
pub mod slave;
pub mod state;
pub mod supervisor;

#[cfg(test)]
mod unit_tests;

#[cfg(test)]
mod integration_tests;
