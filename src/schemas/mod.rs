//! Request and response bodies of the HTTP api

pub mod calendar;
pub mod reservation;
