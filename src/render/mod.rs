pub mod cpu;
pub mod recording;
pub mod surface;
