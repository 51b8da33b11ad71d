// Domain layer: request/response types, models and ports (interfaces).

pub mod gateway;
pub mod model;
pub mod ports;
