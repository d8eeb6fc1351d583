//! ユースケース層（ツアー進行のオーケストレーション）

pub mod tour;

pub use tour::{StartOptions, TourEngine, TourHandle};
