pub mod attendance;
pub mod matches;
pub mod mvp;
pub mod shared;
