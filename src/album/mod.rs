//! Client side of the album.
//!
//! DESIGN
//! ======
//! `store` mirrors the remote collection and owns all network intents.
//! `view` holds presentation state and reacts to store results. The split
//! keeps the store free of dialog/toast concerns.

pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
