//! Cartline storefront library.
//!
//! REST API for customer accounts, the product catalog and shopping carts.
//! The binary in `main.rs` wires this library to `PostgreSQL`; tests drive
//! [`routes::app`] in-process over a [`db::MemoryStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
