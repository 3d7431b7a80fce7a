//! Shared domain - cross-cutting эффекты
//!
//! - Camera shake (CameraShakeRequested → CameraShake offset)

pub mod camera;

pub use camera::*;
