pub mod models;
pub mod render;
