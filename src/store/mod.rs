//! Local persistence for the best time

pub mod best_time;
pub mod local;

pub use best_time::BestTimeStore;
pub use local::{LocalStorage, StoreError};
