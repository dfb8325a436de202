pub mod factory;
pub mod model;
