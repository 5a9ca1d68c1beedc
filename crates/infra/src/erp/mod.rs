//! ERP database adapters

pub mod postgres;

pub use postgres::PostgresErpRepository;
