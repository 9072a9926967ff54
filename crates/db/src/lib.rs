//! PostgreSQL access for bookshelf: connection pool, error type, module
//! migration runner, and the `db` lifecycle module.

pub mod error;
pub mod migrations;
pub mod module;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use module::DbModule;
pub use pool::DbPool;
