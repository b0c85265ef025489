//! Paginated terminal table viewer.
//!
//! The core is [`table::PaginatedTable`], a table component that pages rows
//! either itself (client-driven) or through a caller that fetches one page at
//! a time (server-driven). The remaining modules wire it into the `ptp`
//! terminal application.

pub mod app;
pub mod column;
pub mod config;
pub mod db;
pub mod export;
pub mod handlers;
pub mod notify;
pub mod pagination;
pub mod parser;
pub mod render;
pub mod source;
pub mod state;
pub mod streaming;
pub mod table;
