pub mod image;
pub mod message;
pub mod stats;
pub mod validation;

pub use image::*;
pub use message::*;
pub use stats::*;
pub use validation::*;
