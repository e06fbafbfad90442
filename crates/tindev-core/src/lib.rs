//! Core types, traits and screen state machines for the tindev client.
//!
//! This crate is deliberately free of HTTP, terminal and database
//! dependencies. The remote service is reached through [`api::DevApi`] and the
//! logged-in identifier is kept in a [`store::SessionStore`]; both are
//! implemented elsewhere and injected.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod api;
pub mod deck;
pub mod dev;
pub mod error;
pub mod login;
pub mod session;
pub mod store;

pub use error::{Error, Result};
