pub mod protocol;
pub mod entities;
pub mod items;
pub mod stats;
pub mod difficulty;

pub use protocol::*;
pub use entities::*;
pub use items::*;
pub use stats::*;
pub use difficulty::*;
