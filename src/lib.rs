//! Client core for the DATUS sales analytics service.
//!
//! The remote API owns all business logic; this crate implements the
//! session store, the typed API client, the route guard and the form
//! view models that a UI shell (currently the CLI in `main.rs`) drives.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod routes;
pub mod session;
pub mod storage;
pub mod views;
