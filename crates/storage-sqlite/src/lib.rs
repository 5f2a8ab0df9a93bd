//! SQLite storage implementation for Investfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the storage traits defined in `investfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor every ledger action commits through
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod investments;
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use investments::{SqliteInvestmentStore, SqliteLedgerExecutor};
pub use wallets::WalletRepository;

// Re-export from investfolio-core for convenience
pub use investfolio_core::errors::{DatabaseError, Error, Result};
