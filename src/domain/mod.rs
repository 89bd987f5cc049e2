// Domain layer: engine data types and the ports the shell plugs into.

pub mod model;
pub mod ports;
