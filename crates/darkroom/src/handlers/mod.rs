pub mod carousel;
pub mod error;
pub mod health;
pub mod images;
pub mod projects;

pub use error::AppError;
