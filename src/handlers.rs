pub mod assistant;
pub mod auth;
pub mod business;
pub mod clock;
pub mod reports;
pub mod shifts;
