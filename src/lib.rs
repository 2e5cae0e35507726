//! Restaurant Menu API Library
//!
//! Scrapes a restaurant's public website and re-exposes its menu, item details,
//! restaurant information and daily specials as JSON. Modules are public for
//! use in integration tests.

pub mod api;
pub mod cache;
pub mod cli;
pub mod data;
