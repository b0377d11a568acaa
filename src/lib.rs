pub mod app;
pub mod buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod hadamard;
pub mod macropixel;
pub mod padding;
pub mod prefs;
pub mod primitives;
pub mod render;
pub mod sink;
pub mod slm;
pub mod terminal;
pub mod zernike;

pub use buffer::{Canvas, PixelBuffer};
pub use error::PatternError;
pub use slm::Slm;
