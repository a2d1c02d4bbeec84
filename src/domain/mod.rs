// Domain layer: Firehose/flow-log models and ports (interfaces).

pub mod model;
pub mod ports;
