//! Shared wire-schema enumerations.
//!
//! These are the closed sets of tags the canonical document is written
//! against. Numeric values and string spellings here are load-bearing: they
//! are what downstream playback code matches on.

use serde_json::Value;

/// Item type tags. Historical documents spell most of these as numeric
/// strings; named variants were added later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemType {
    Base,
    Sprite,
    Particle,
    Null,
    Interact,
    Plugin,
    Camera,
    /// Legacy filter/distortion layers, dropped during migration.
    Filter,
    Mesh,
    Light,
    Skybox,
    Tree,
    Text,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "0",
            Self::Sprite => "1",
            Self::Particle => "2",
            Self::Null => "3",
            Self::Interact => "4",
            Self::Plugin => "5",
            Self::Camera => "6",
            Self::Filter => "8",
            Self::Mesh => "mesh",
            Self::Light => "light",
            Self::Skybox => "skybox",
            Self::Tree => "tree",
            Self::Text => "text",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "0" => Self::Base,
            "1" => Self::Sprite,
            "2" => Self::Particle,
            "3" => Self::Null,
            "4" => Self::Interact,
            "5" => Self::Plugin,
            "6" => Self::Camera,
            "8" => Self::Filter,
            "mesh" => Self::Mesh,
            "light" => Self::Light,
            "skybox" => Self::Skybox,
            "tree" => Self::Tree,
            "text" => Self::Text,
            _ => return None,
        })
    }

    /// Type tag of a JSON item record, if it carries a recognized one.
    pub fn of(item: &Value) -> Option<Self> {
        item.get("type").and_then(Value::as_str).and_then(Self::from_tag)
    }
}

/// End behavior wire constants, shared by items and compositions.
pub mod end_behavior {
    pub const DESTROY: i64 = 0;
    pub const PAUSE: i64 = 1;
    pub const RESTART: i64 = 2;
    pub const PAUSE_AND_DESTROY: i64 = 3;
    pub const FREEZE: i64 = 4;
    pub const LOOP: i64 = 5;
}

/// Tag half of the `[kind, payload]` value-expression pair.
pub mod value_type {
    pub const CONSTANT: i64 = 0;
    pub const LINE: i64 = 1;
    pub const CURVE: i64 = 2;
    pub const CONSTANT_VEC3: i64 = 3;
    pub const RANDOM: i64 = 4;
    pub const LINEAR_PATH: i64 = 6;
    pub const BEZIER_PATH: i64 = 7;
    pub const RGBA_COLOR: i64 = 8;
    pub const GRADIENT_COLOR: i64 = 9;
    pub const COLORS: i64 = 13;
    pub const BEZIER_CURVE: i64 = 21;
    pub const BEZIER_CURVE_PATH: i64 = 22;
}

/// Keyframe tags on converted Bezier curves.
pub mod keyframe_type {
    pub const LINE: i64 = 0;
    pub const EASE_OUT: i64 = 1;
    pub const EASE_IN: i64 = 2;
    pub const EASE: i64 = 3;
    pub const HOLD: i64 = 4;
}

/// `dataType` tags on canonical (3.0) records.
pub mod data_type {
    pub const VFX_ITEM: &str = "VFXItemData";
    pub const SPRITE_COMPONENT: &str = "SpriteComponent";
    pub const PARTICLE_SYSTEM: &str = "ParticleSystem";
    pub const INTERACT_COMPONENT: &str = "InteractComponent";
    pub const CAMERA_CONTROLLER: &str = "CameraController";
    pub const TEXT_COMPONENT: &str = "TextComponent";
    pub const TEXTURE: &str = "Texture";
    pub const TRANSFORM_CLIP: &str = "TransformAnimationPlayableAsset";
    pub const SPRITE_COLOR_CLIP: &str = "SpriteColorAnimationPlayableAsset";
}

/// Canonical value tag for any legacy spelling of an animatable-value kind.
///
/// Consulted before any semantic branching so that `'static'` and the numeric
/// `CONSTANT` tag (etc.) take exactly the same path.
pub fn canonical_value_tag(tag: &Value) -> Option<i64> {
    match tag {
        Value::String(s) => Some(match s.as_str() {
            "static" => value_type::CONSTANT,
            "lines" => value_type::LINE,
            "curve" => value_type::CURVE,
            "random" => value_type::RANDOM,
            "color" => value_type::RGBA_COLOR,
            "colors" => value_type::COLORS,
            "gradient" => value_type::GRADIENT_COLOR,
            "path" => value_type::LINEAR_PATH,
            "bezier" => value_type::BEZIER_PATH,
            _ => return None,
        }),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Named particle origins and their pivot offsets.
///
/// Offsets are expressed in the anchor space of the structured transform:
/// `(0, 0)` is the center, x grows right, y grows up, and each component
/// stays within `[-0.5, 0.5]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleOrigin {
    Center,
    CenterTop,
    CenterBottom,
    LeftCenter,
    LeftTop,
    LeftBottom,
    RightCenter,
    RightTop,
    RightBottom,
}

impl ParticleOrigin {
    pub fn from_wire(v: i64) -> Option<Self> {
        Some(match v {
            0 => Self::Center,
            1 => Self::CenterTop,
            2 => Self::CenterBottom,
            3 => Self::LeftCenter,
            4 => Self::LeftTop,
            5 => Self::LeftBottom,
            6 => Self::RightCenter,
            7 => Self::RightTop,
            8 => Self::RightBottom,
            _ => return None,
        })
    }

    pub fn offset(self) -> (f64, f64) {
        match self {
            Self::Center => (0.0, 0.0),
            Self::CenterTop => (0.0, 0.5),
            Self::CenterBottom => (0.0, -0.5),
            Self::LeftCenter => (-0.5, 0.0),
            Self::LeftTop => (-0.5, 0.5),
            Self::LeftBottom => (-0.5, -0.5),
            Self::RightCenter => (0.5, 0.0),
            Self::RightTop => (0.5, 0.5),
            Self::RightBottom => (0.5, -0.5),
        }
    }
}
