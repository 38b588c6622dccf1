// Domain layer: core models, site markup contract and ports (interfaces).

pub mod markup;
pub mod model;
pub mod ports;
