// SQLite module - reference backend over rusqlite
//
// - config: connection options and builder
// - params: conversion from middleware values to SQLite values
// - query: result extraction and building
// - backend: the `Backend` implementation, running rusqlite calls on the blocking pool

pub mod backend;
pub mod config;
pub mod params;
pub mod query;

pub use backend::SqliteBackend;
pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use params::Params;
pub use query::build_result_set;
