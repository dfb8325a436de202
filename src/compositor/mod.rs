pub mod arena;
#[allow(clippy::module_inception)]
pub mod compositor;
pub mod layer;
