#[macro_use]
extern crate tracing;

use deadpool_diesel::sqlite::{Object, Pool};

mod error;

pub use error::*;

/// An entire database pool
pub type DbPool = Pool;

/// A single database connection
pub type DbConn = Object;
