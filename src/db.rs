pub mod user_repo;
pub use user_repo::UserRepository;
pub mod business_repo;
pub use business_repo::BusinessRepository;
pub mod shift_repo;
pub use shift_repo::ShiftRepository;
pub mod clock_repo;
pub use clock_repo::ClockRepository;
