pub mod caption;
pub mod image;
pub mod journal;
pub mod settings;

pub use caption::*;
pub use image::*;
pub use journal::*;
pub use settings::*;
