pub mod ease;
pub mod engine;
