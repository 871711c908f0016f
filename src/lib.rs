//! Moments: a shared memory album.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two halves share the `moment` model:
//! - the server (`routes`, `services`, `db`, `state`) exposes the moments
//!   collection over HTTP, backed by Postgres or memory;
//! - the client (`net`, `album`, `display`, `image`) mirrors that
//!   collection locally and drives presentation state.

pub mod album;
pub mod config;
pub mod db;
pub mod display;
pub mod image;
pub mod moment;
pub mod net;
pub mod routes;
pub mod services;
pub mod state;
