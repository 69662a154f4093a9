// Domain layer: pricing data model and the listing-source port.

pub mod model;
pub mod ports;
