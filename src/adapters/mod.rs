// Adapters layer: concrete implementations of the domain ports for the host system.

pub mod process;
