pub mod index;
pub mod intervals;
pub mod midi_import;
pub mod model;
pub mod tempo;

pub use index::*;
pub use intervals::*;
pub use midi_import::*;
pub use model::*;
pub use tempo::*;
