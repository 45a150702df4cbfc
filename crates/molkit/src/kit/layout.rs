use crate::api::config::KitSetup;
use crate::core::bounds::Bounds;

/// The two regions a kit works in: the strip holding the buckets and the area where
/// molecules are built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBounds {
    pub available_kit_bounds: Bounds,
    pub available_play_area_bounds: Bounds,
}

impl LayoutBounds {
    pub fn new(available_kit_bounds: Bounds, available_play_area_bounds: Bounds) -> Self {
        Self {
            available_kit_bounds,
            available_play_area_bounds,
        }
    }

    /// Read the `[x, y, width, height]` rectangles of a setup.
    pub fn from_setup(setup: &KitSetup) -> Self {
        let [kx, ky, kw, kh] = setup.kit_bounds;
        let [px, py, pw, ph] = setup.play_area_bounds;
        Self::new(Bounds::from_rect(kx, ky, kw, kh), Bounds::from_rect(px, py, pw, ph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn rectangles_from_setup() {
        let setup = KitSetup::from_json(
            r#"{ "kit_bounds": [0, 0, 1000, 200], "play_area_bounds": [0, 200, 1000, 800], "buckets": [] }"#,
        )
        .unwrap();
        let layout = LayoutBounds::from_setup(&setup);
        assert_eq!(layout.available_kit_bounds.center(), Vec2::new(500.0, 100.0));
        assert_eq!(layout.available_play_area_bounds.max, Vec2::new(1000.0, 1000.0));
    }
}
