pub mod catalog;
pub mod config;
pub mod error;
pub mod links;
pub mod logging;
pub mod publish;
pub mod translation;
