//! Server-side services.

pub mod moments;
