mod macros;

pub mod attendance;
pub mod goal;
pub mod lineup;
pub mod matches;
pub mod mvp;
pub mod schedule;
pub mod team;

// Re-export all models for easy importing
pub use attendance::*;
pub use goal::*;
pub use lineup::*;
pub use matches::*;
pub use mvp::*;
pub use schedule::*;
pub use team::*;
