// Domain layer: workload models and ports (interfaces). No process or filesystem access here.

pub mod model;
pub mod ports;
