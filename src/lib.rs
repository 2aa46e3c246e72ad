pub mod db;
pub mod errors;
pub mod handlers;
pub mod moc;
pub mod models;
