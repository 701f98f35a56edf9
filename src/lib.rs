//! Data-access and pagination engine for a conversational-text API.
//!
//! Users own custom *moods* (eyes and tongue for the cow) and *conversations*
//! made of ordered *lines*. This crate stores them in SQLite and serves them
//! to an HTTP layer as plain, serializable values. Routing, authentication,
//! and rendering lines as ASCII art live elsewhere.
//!
//! # Architecture
//!
//! - **Catalog**: eight built-in moods, fixed at compile time and reserved
//!   for every owner
//! - **Store**: per-owner rows behind a pool of SQLite connections with cached
//!   prepared statements
//! - **Pagination**: user moods and the catalog are concatenated into one
//!   list that can be walked forwards with `after` or backwards with `before`
//! - **Public ids**: random base-36 ids, retried on collision against the
//!   store's `UNIQUE` constraint
//! - **Deletes**: "not found" and "still referenced" are reported separately,
//!   the latter with the referencing line ids
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: Connection pool and schema initialization
//! - [`say`]: Moods, conversations, lines, and the [`say::Repository`] façade

pub mod config;
pub mod db;
pub mod say;
