//! Server-side services

pub mod bootstrap;
