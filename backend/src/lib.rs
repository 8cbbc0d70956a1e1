//! Regauth Backend Library
//!
//! Registration, login and password reset over HTTP. This library exposes
//! the backend modules for use in tests and the server binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod notify;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
