//! SeaORM entity definitions for the persisted tables.

pub mod post;
pub mod user;
