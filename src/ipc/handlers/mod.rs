pub mod auth;
pub mod core;
pub mod roster;
pub mod submissions;
pub mod tasks;
