//! Overlay kinds and the static resources attached to each.

use serde::{Deserialize, Serialize};

const ELEVATION_VERT: &str = include_str!("../shaders/elevation.vert.glsl");
const SLOPE_VERT: &str = include_str!("../shaders/slope.vert.glsl");
const ASPECT_VERT: &str = include_str!("../shaders/aspect.vert.glsl");
const DEFAULT_FRAG: &str = include_str!("../shaders/default.frag.glsl");

const GREEN: [u8; 3] = [34, 197, 94];
const CYAN: [u8; 3] = [6, 182, 212];
const BLUE: [u8; 3] = [59, 130, 246];
const PURPLE: [u8; 3] = [168, 85, 247];
const PINK: [u8; 3] = [236, 72, 153];
const RED: [u8; 3] = [239, 68, 68];
const ORANGE: [u8; 3] = [249, 115, 22];
const YELLOW: [u8; 3] = [234, 179, 8];

/// One swatch of an overlay's color scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: [u8; 3],
}

const fn entry(label: &'static str, color: [u8; 3]) -> LegendEntry {
    LegendEntry { label, color }
}

const ELEVATION_LEGEND: &[LegendEntry] = &[
    entry("1750m", GREEN),
    entry("2000m", CYAN),
    entry("2250m", PURPLE),
    entry("2500m", PINK),
    entry("2750m", ORANGE),
    entry("3000m", YELLOW),
    entry("3250m", GREEN),
];

const SLOPE_LEGEND: &[LegendEntry] = &[
    entry("<20°", GREEN),
    entry("20-35°", YELLOW),
    entry("35-45°", ORANGE),
    entry("45-60°", RED),
    entry(">60°", PURPLE),
];

const ASPECT_LEGEND: &[LegendEntry] = &[
    entry("North", CYAN),
    entry("Northeast", BLUE),
    entry("East", PURPLE),
    entry("Southeast", PINK),
    entry("South", RED),
    entry("Southwest", ORANGE),
    entry("West", YELLOW),
    entry("Northwest", GREEN),
];

/// Terrain-derived quantity drawn by the overlay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    #[default]
    Elevation,
    Slope,
    Aspect,
    None,
}

impl OverlayKind {
    pub fn label(&self) -> &'static str {
        match self {
            OverlayKind::Elevation => "Elevation",
            OverlayKind::Slope => "Slope Angle",
            OverlayKind::Aspect => "Aspect",
            OverlayKind::None => "None",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OverlayKind::Elevation => "This overlay visualizes the elevation of the terrain.",
            OverlayKind::Slope => "This overlay visualizes the slope angle of the terrain.",
            OverlayKind::Aspect => "This overlay visualizes the aspect of the terrain.",
            OverlayKind::None => "Select an overlay to see its legend.",
        }
    }

    pub fn legend(&self) -> &'static [LegendEntry] {
        match self {
            OverlayKind::Elevation => ELEVATION_LEGEND,
            OverlayKind::Slope => SLOPE_LEGEND,
            OverlayKind::Aspect => ASPECT_LEGEND,
            OverlayKind::None => &[],
        }
    }

    pub fn all() -> &'static [OverlayKind] {
        &[
            OverlayKind::Elevation,
            OverlayKind::Slope,
            OverlayKind::Aspect,
            OverlayKind::None,
        ]
    }

    /// Vertex stage for this kind, `None` when nothing is drawn.
    pub fn vertex_source(&self) -> Option<&'static str> {
        match self {
            OverlayKind::Elevation => Some(ELEVATION_VERT),
            OverlayKind::Slope => Some(SLOPE_VERT),
            OverlayKind::Aspect => Some(ASPECT_VERT),
            OverlayKind::None => None,
        }
    }

    /// Fragment stage shared by every kind.
    pub fn fragment_source() -> &'static str {
        DEFAULT_FRAG
    }
}
