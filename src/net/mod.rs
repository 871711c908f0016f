//! Network access to the remote moments collection.

pub mod api;
