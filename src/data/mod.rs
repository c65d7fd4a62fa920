pub mod bootstrap;
pub mod models;
pub mod repositories;
