pub mod audio;
pub mod midi;
pub mod render;
pub mod storage;
pub mod types;

pub use audio::*;
pub use midi::*;
pub use render::*;
pub use storage::*;
pub use types::*;
