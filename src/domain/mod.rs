// Domain layer: marketplace models and the ports every collaborator implements.

pub mod model;
pub mod ports;
