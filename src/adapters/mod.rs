// Adapters layer: concrete implementations of the domain ports.

pub mod encoder;
pub mod storage;

pub use encoder::{Transport, XhmEncoder};
pub use storage::LocalStorage;
