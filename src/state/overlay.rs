//! Overlay selection written by the sidebar and read every frame.

use crate::overlay::OverlayKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    kind: OverlayKind,
    opacity: f32,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new(OverlayKind::default(), 0.2)
    }
}

impl OverlayState {
    pub fn new(kind: OverlayKind, opacity: f32) -> Self {
        let mut state = Self { kind, opacity: 0.0 };
        state.set_opacity(opacity);
        state
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: OverlayKind) {
        self.kind = kind;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets the opacity, clamped to `[0, 1]`. NaN is treated as 0.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = OverlayState::default();
        assert_eq!(state.kind(), OverlayKind::Elevation);
        assert_eq!(state.opacity(), 0.2);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut state = OverlayState::new(OverlayKind::Slope, 3.0);
        assert_eq!(state.opacity(), 1.0);
        state.set_opacity(-0.5);
        assert_eq!(state.opacity(), 0.0);
        state.set_opacity(f32::NAN);
        assert_eq!(state.opacity(), 0.0);
        state.set_opacity(0.35);
        assert_eq!(state.opacity(), 0.35);
    }
}
