pub mod bonus;
pub mod db;
pub mod gateway;
pub mod models;
pub mod reports;
