// PostgreSQL module - reference backend over tokio-postgres
//
// - config: connection options, validation and builder
// - params: `ToSql` for middleware values
// - query: result extraction and building
// - backend: the `Backend` implementation

pub mod backend;
pub mod config;
pub mod params;
pub mod query;

pub use backend::PostgresBackend;
pub use config::{PostgresOptions, PostgresOptionsBuilder};
pub use params::Params;
pub use query::build_result_set_from_statement;
