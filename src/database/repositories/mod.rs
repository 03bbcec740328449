//! Per-table SQL for [`PgUnit`](crate::database::postgres::PgUnit). Every
//! function runs on the connection of the caller's transaction.

pub mod attendance;
pub mod goal;
pub mod lineup;
pub mod matches;
pub mod schedule;
