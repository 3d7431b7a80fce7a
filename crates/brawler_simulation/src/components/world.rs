//! World-level collider metadata: tags и материал поверхности

use bevy::prelude::*;

/// Тег коллайдера, по которому combat фильтрует цели
pub const DESTRUCTIBLE_TAG: &str = "Destructible";

/// Тег коллайдера (строковый, как в level data)
///
/// Коллайдеры без тега игнорируются overlap детектором.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ColliderTag(pub String);

impl ColliderTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn destructible() -> Self {
        Self::new(DESTRUCTIBLE_TAG)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }
}

/// Материал поверхности (имя ассета у хоста)
///
/// Осколки наследуют материал источника.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct SurfaceMaterial {
    pub name: String,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
        }
    }
}

impl SurfaceMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
