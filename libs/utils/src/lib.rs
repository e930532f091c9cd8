pub mod calendar;
pub mod token;
