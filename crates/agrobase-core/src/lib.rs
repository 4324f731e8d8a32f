pub mod builders;
pub mod company;
pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod guard;
pub mod ids;
pub mod memory;
pub mod plan;
pub mod postgres;
pub mod rows;
pub mod seed;
pub mod store;
