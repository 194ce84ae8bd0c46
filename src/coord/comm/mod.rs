pub mod channel;

pub use channel::{CommEndpoint, CommReceiver, CommSender, CommTiming, channel, duplex};

#[cfg(test)]
mod unit_tests;
