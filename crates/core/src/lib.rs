//! Single-owner face unlock: capture, match against one enrolled face,
//! and render an unlocked / denied / locked status every cycle.

pub mod access;
pub mod camera;
pub mod detection;
pub mod display;
pub mod enrollment;
pub mod imaging;
pub mod pipeline;
pub mod rendering;
pub mod shared;
