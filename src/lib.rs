//! askcache library
//!
//! Client-side answer cache and URL submitter for the analysis gateway. The
//! binary wraps these modules in a small chat CLI; integration tests use them
//! directly.

pub mod cache;
pub mod cli;
pub mod logging;
pub mod remote;
pub mod session;
