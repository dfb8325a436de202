pub mod audio;
pub mod controller;
pub mod input;
#[allow(clippy::module_inception)]
pub mod stage;
