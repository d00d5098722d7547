pub mod auth;
pub mod booking;
pub mod faq;
pub mod feedback;
pub mod notification;
pub mod payment;
pub mod schedule;
pub mod studio;
