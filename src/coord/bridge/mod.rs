pub mod server;

pub use server::TcpBridge;

#[cfg(test)]
mod unit_tests;
