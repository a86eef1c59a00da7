/// Database layer for TaskFlow
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Collection bootstrap
///
/// The document store built on top of the pool lives in
/// `crate::repository::pg`.

pub mod migrations;
pub mod pool;
