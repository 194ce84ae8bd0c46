pub mod handler;
pub mod machine;

pub use machine::SlaveMachine;
