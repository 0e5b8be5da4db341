#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod navigation;

pub use catalog::{Arcana, Rank, Suit};
pub use navigation::{NavigationError, NavigationState, Screen};
