//! Collection of general utilities shared by the services.
//!
//! Time source, token codec and password hashing live here; none of them
//! touch the database.

pub mod clock;
pub mod jwt;
pub mod password;
