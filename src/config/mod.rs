pub mod machine;

pub use machine::MachineConfig;
