pub mod pick_service;

pub use pick_service::PickService;
