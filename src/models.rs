pub mod assistant;
pub mod attendance;
pub mod auth;
pub mod business;
pub mod clock;
pub mod hours;
pub mod schedule;
