//! Browser client for the DataLab analysis service.

pub mod api;
pub mod app;
pub mod components;
pub mod models;
pub mod session;
