pub mod auth;
pub mod bookings;
pub mod faqs;
pub mod feedback;
pub mod health;
pub mod notifications;
pub mod payments;
pub mod schedules;
pub mod studios;
