pub mod attendance;
pub mod auth;
pub mod cache;
pub mod changes;
pub mod directory;
pub mod lineup;
pub mod matches;
pub mod mvp;
pub mod permissions;
pub mod score;

pub use auth::Claims;
pub use cache::ReadCache;
pub use changes::{ChangeSet, Mutation};
pub use directory::{
    AuthorizationProvider, InMemoryTeamDirectory, PgTeamDirectory, TeamDirectory,
    TeamRosterProvider,
};
