pub mod clock;
pub mod ipc;
pub mod lod;
pub mod recents;
pub mod renderer;
pub mod session;
pub mod ticker;

pub use clock::*;
pub use ipc::*;
pub use lod::*;
pub use recents::*;
pub use renderer::*;
pub use session::*;
pub use ticker::*;
