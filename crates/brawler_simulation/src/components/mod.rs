//! ECS Components общие для нескольких доменов
//!
//! Организация:
//! - physics: PhysicsBody (velocity + impulses)
//! - world: ColliderTag, SurfaceMaterial
//! - animation: AnimationFlags + события для animation sink хоста
//! - player: player control marker (Player)

pub mod animation;
pub mod physics;
pub mod player;
pub mod world;

// Re-exports для удобного импорта
pub use animation::*;
pub use physics::*;
pub use player::*;
pub use world::*;
