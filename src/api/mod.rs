pub mod client;
pub mod error;
pub mod observer;

pub use client::ApiClient;
pub use error::ApiError;
pub use observer::{ClearSessionOnReject, ObserverRegistry, SessionObserver};
