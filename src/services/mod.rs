pub mod auth;
pub mod bookings;
pub mod email;
pub mod faqs;
pub mod feedback;
pub mod notifications;
pub mod payments;
pub mod push;
pub mod schedules;
pub mod studios;
