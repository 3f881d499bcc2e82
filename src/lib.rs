//! Movie picker client: pages through a recommendation backend's catalog,
//! fetches recommendations for a chosen title and decorates titles with
//! TMDB poster artwork.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{Session, SessionSettings};
