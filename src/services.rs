pub mod assistant_service;
pub mod attendance_service;
pub mod auth;
pub mod business_service;
pub mod clock_service;
pub mod extraction;
pub mod hours_service;
pub mod mailer;
pub mod membership_service;
pub mod shift_service;
pub mod temporal;
