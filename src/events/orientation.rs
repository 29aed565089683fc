use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Четыре канонические ориентации экрана
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationType {
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
}

/// Отображение легаси-угла window.orientation в тип ориентации
static ANGLE_MAP: Lazy<HashMap<i32, OrientationType>> = Lazy::new(|| {
    HashMap::from([
        (90, OrientationType::LandscapePrimary),
        (-90, OrientationType::LandscapeSecondary),
        (0, OrientationType::PortraitPrimary),
        (180, OrientationType::PortraitSecondary),
    ])
});

impl OrientationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationType::PortraitPrimary => "portrait-primary",
            OrientationType::PortraitSecondary => "portrait-secondary",
            OrientationType::LandscapePrimary => "landscape-primary",
            OrientationType::LandscapeSecondary => "landscape-secondary",
        }
    }

    pub fn from_angle(angle: i32) -> Option<Self> {
        ANGLE_MAP.get(&angle).copied()
    }

    /// Легаси-угол, которым хост объявил бы эту ориентацию
    pub fn to_angle(&self) -> i32 {
        match self {
            OrientationType::PortraitPrimary => 0,
            OrientationType::PortraitSecondary => 180,
            OrientationType::LandscapePrimary => 90,
            OrientationType::LandscapeSecondary => -90,
        }
    }

    pub fn is_landscape(&self) -> bool {
        matches!(
            self,
            OrientationType::LandscapePrimary | OrientationType::LandscapeSecondary
        )
    }
}

impl fmt::Display for OrientationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Значения lockType по словарю W3C Screen Orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockType {
    Any,
    Natural,
    Landscape,
    Portrait,
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Any => "any",
            LockType::Natural => "natural",
            LockType::Landscape => "landscape",
            LockType::Portrait => "portrait",
            LockType::PortraitPrimary => "portrait-primary",
            LockType::PortraitSecondary => "portrait-secondary",
            LockType::LandscapePrimary => "landscape-primary",
            LockType::LandscapeSecondary => "landscape-secondary",
        }
    }
}

impl fmt::Display for LockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
