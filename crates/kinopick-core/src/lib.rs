pub mod domain;
pub mod errors;
pub mod ports;
pub mod selection;
pub mod services;

pub use errors::CoreError;
