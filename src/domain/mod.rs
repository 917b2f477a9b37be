// Domain layer: recipe data, derived render types and the ports the core talks through.

pub mod catalog;
pub mod model;
pub mod ports;
