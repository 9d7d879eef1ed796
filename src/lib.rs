pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod optimizer;
pub mod scorer;
pub mod shapes;
