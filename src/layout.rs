//! Fixed fractional panel layout.
//!
//! ```text
//! +-----------------------------------------------+
//! | menu                                          |
//! +-----------+-------------------+---------------+
//! | nav hdr   | info block        | viz header    |
//! |-----------|-------------------|  viewport     |
//! | nav list  | [tab][tab][tab].. |  (3D)         |
//! |           | tab content       |---------------|
//! |           |                   | analysis      |
//! +-----------+-------------------+---------------+
//! | status                                        |
//! +-----------------------------------------------+
//! ```
//!
//! Every rectangle is a pure function of the window size. Hit-testing works in
//! normalized coordinates (`x` in `[0, 1]` left to right, `y` in `[0, 1]`
//! bottom to top) and derives its bands from the same constants as the
//! pixel rectangles, so drawn regions and clickable regions cannot drift apart.

use vello::kurbo::Rect;

pub const MENU_FRAC: f64 = 0.125;
pub const STATUS_FRAC: f64 = 0.125;
pub const NAV_WIDTH_FRAC: f64 = 0.25;
pub const DETAIL_WIDTH_FRAC: f64 = 0.42;
/// Left edge of the visualization panel; it spans to the right window edge.
pub const VIZ_LEFT_FRAC: f64 = NAV_WIDTH_FRAC + DETAIL_WIDTH_FRAC;

pub const PANEL_HEADER_FRAC: f64 = 0.0375;
pub const DETAIL_INFO_FRAC: f64 = 0.125;

pub const TAB_COUNT: usize = 4;
pub const TAB_ROW_TOP_FRAC: f64 = 0.30;
pub const TAB_ROW_HEIGHT_FRAC: f64 = 0.03;
pub const TAB_STRIP_LEFT_FRAC: f64 = 0.28;
pub const TAB_STRIP_WIDTH_FRAC: f64 = 0.25;
pub const TAB_CONTENT_TOP_FRAC: f64 = 0.36;

pub const VIEWPORT_TOP_FRAC: f64 = 0.1875;
pub const VIEWPORT_HEIGHT_FRAC: f64 = 0.35;
const VIEWPORT_INSET: f64 = 5.0;

/// A point in normalized window coordinates, `y` pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

/// A vertical interval in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormBand {
    pub top: f64,
    pub bottom: f64,
}

impl NormBand {
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    fn contains(&self, y: f64) -> bool {
        y > self.bottom && y < self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub width: f64,
    pub height: f64,
    pub menu: Rect,
    pub status: Rect,
    pub navigation: Rect,
    pub detail: Rect,
    pub visualization: Rect,
    pub nav_header: Rect,
    pub nav_list: Rect,
    pub detail_info: Rect,
    pub tab_strip: Rect,
    pub tab_content: Rect,
    pub viz_header: Rect,
    pub viewport: Rect,
    pub analysis: Rect,
}

impl PanelLayout {
    pub fn compute(width: f64, height: f64) -> Self {
        let w = width.max(1.0);
        let h = height.max(1.0);

        let band_top = h * MENU_FRAC;
        let band_bottom = h * (1.0 - STATUS_FRAC);
        let nav_right = w * NAV_WIDTH_FRAC;
        let viz_left = w * VIZ_LEFT_FRAC;
        let header_bottom = h * (MENU_FRAC + PANEL_HEADER_FRAC);

        let navigation = Rect::new(0.0, band_top, nav_right, band_bottom);
        let detail = Rect::new(nav_right, band_top, viz_left, band_bottom);
        let visualization = Rect::new(viz_left, band_top, w, band_bottom);

        let tab_top = h * TAB_ROW_TOP_FRAC;
        let tab_left = w * TAB_STRIP_LEFT_FRAC;
        let viewport_top = h * VIEWPORT_TOP_FRAC;
        let viewport_bottom = h * (VIEWPORT_TOP_FRAC + VIEWPORT_HEIGHT_FRAC);

        Self {
            width: w,
            height: h,
            menu: Rect::new(0.0, 0.0, w, band_top),
            status: Rect::new(0.0, band_bottom, w, h),
            navigation,
            detail,
            visualization,
            nav_header: Rect::new(0.0, band_top, nav_right, header_bottom),
            nav_list: Rect::new(0.0, header_bottom, nav_right, band_bottom),
            detail_info: Rect::new(nav_right, band_top, viz_left, h * (MENU_FRAC + DETAIL_INFO_FRAC)),
            tab_strip: Rect::new(
                tab_left,
                tab_top,
                tab_left + w * TAB_STRIP_WIDTH_FRAC,
                tab_top + h * TAB_ROW_HEIGHT_FRAC,
            ),
            tab_content: Rect::new(nav_right, h * TAB_CONTENT_TOP_FRAC, viz_left, band_bottom),
            viz_header: Rect::new(viz_left, band_top, w, header_bottom),
            viewport: Rect::new(
                viz_left + VIEWPORT_INSET,
                viewport_top,
                (w - VIEWPORT_INSET).max(viz_left + VIEWPORT_INSET),
                viewport_bottom,
            ),
            analysis: Rect::new(viz_left, viewport_bottom, w, band_bottom),
        }
    }

    /// The five top-level regions: menu, navigation, detail, visualization, status.
    pub fn regions(&self) -> [Rect; 5] {
        [self.menu, self.navigation, self.detail, self.visualization, self.status]
    }

    /// Pixel rectangle of tab slot `index`, or `None` past the last tab.
    pub fn tab_slot(&self, index: usize) -> Option<Rect> {
        if index >= TAB_COUNT {
            return None;
        }
        let slot_w = self.tab_strip.width() / TAB_COUNT as f64;
        let x0 = self.tab_strip.x0 + index as f64 * slot_w;
        Some(Rect::new(x0, self.tab_strip.y0, x0 + slot_w, self.tab_strip.y1))
    }

    /// Convert a window pixel position (origin top-left) to normalized
    /// coordinates with `y` flipped so 0 is the bottom edge.
    pub fn normalize(&self, x: f64, y: f64) -> NormPoint {
        NormPoint {
            x: x / self.width,
            y: 1.0 - y / self.height,
        }
    }

    /// Normalized band of the navigation list (below the panel header).
    pub fn nav_band() -> NormBand {
        NormBand {
            top: 1.0 - (MENU_FRAC + PANEL_HEADER_FRAC),
            bottom: STATUS_FRAC,
        }
    }

    pub fn tab_band() -> NormBand {
        NormBand {
            top: 1.0 - TAB_ROW_TOP_FRAC,
            bottom: 1.0 - (TAB_ROW_TOP_FRAC + TAB_ROW_HEIGHT_FRAC),
        }
    }

    /// Map a click to a record index:
    /// `index = (band_top - y) * count / band_height`.
    pub fn record_at(p: NormPoint, count: usize) -> Option<usize> {
        let band = Self::nav_band();
        if p.x >= NAV_WIDTH_FRAC || !band.contains(p.y) {
            return None;
        }
        let index = ((band.top - p.y) * count as f64 / band.height()).floor();
        (index >= 0.0 && index < count as f64).then_some(index as usize)
    }

    /// Map a click to a tab slot:
    /// `tab = (x - strip_left) * TAB_COUNT / strip_width`.
    pub fn tab_at(p: NormPoint) -> Option<usize> {
        if p.x <= NAV_WIDTH_FRAC || p.x >= VIZ_LEFT_FRAC || !Self::tab_band().contains(p.y) {
            return None;
        }
        let slot = ((p.x - TAB_STRIP_LEFT_FRAC) * TAB_COUNT as f64 / TAB_STRIP_WIDTH_FRAC).floor();
        (slot >= 0.0 && slot < TAB_COUNT as f64).then_some(slot as usize)
    }

    /// Whether a point lies in the visualization panel's horizontal band.
    pub fn in_visualization(p: NormPoint) -> bool {
        p.x > VIZ_LEFT_FRAC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn center(r: Rect) -> (f64, f64) {
        ((r.x0 + r.x1) / 2.0, (r.y0 + r.y1) / 2.0)
    }

    #[test]
    fn default_window_regions() {
        let l = PanelLayout::compute(1200.0, 800.0);
        assert_eq!(l.menu, Rect::new(0.0, 0.0, 1200.0, 100.0));
        assert_eq!(l.status, Rect::new(0.0, 700.0, 1200.0, 800.0));
        assert_eq!(l.navigation.x1, 300.0);
        assert!((l.detail.x1 - 804.0).abs() < 1e-9);
        assert_eq!(l.visualization.x1, 1200.0);
    }

    #[test]
    fn viewport_lies_inside_visualization_panel() {
        let l = PanelLayout::compute(1200.0, 800.0);
        assert_eq!(l.visualization.intersect(l.viewport), l.viewport);
        assert!(l.viewport.y1 <= l.analysis.y0 + 1e-9);
    }

    #[test]
    fn drawn_tab_slots_hit_test_to_their_index() {
        let l = PanelLayout::compute(1200.0, 800.0);
        for i in 0..TAB_COUNT {
            let (cx, cy) = center(l.tab_slot(i).unwrap());
            assert_eq!(PanelLayout::tab_at(l.normalize(cx, cy)), Some(i));
        }
        assert!(l.tab_slot(TAB_COUNT).is_none());
    }

    #[test]
    fn tab_row_outside_strip_is_ignored() {
        let l = PanelLayout::compute(1200.0, 800.0);
        let (_, cy) = center(l.tab_strip);
        // Between the detail panel's left edge and the strip start.
        assert_eq!(PanelLayout::tab_at(l.normalize(l.detail.x0 + 5.0, cy)), None);
        assert_eq!(PanelLayout::tab_at(l.normalize(l.tab_strip.x1 + 5.0, cy)), None);
    }

    #[test]
    fn nav_click_uses_linear_mapping() {
        let band = PanelLayout::nav_band();
        // 45% of the way down the band on a 10-record list.
        let p = NormPoint { x: 0.1, y: band.top - 0.45 * band.height() };
        assert_eq!(PanelLayout::record_at(p, 10), Some(4));
        let top = NormPoint { x: 0.1, y: band.top - 1e-6 };
        assert_eq!(PanelLayout::record_at(top, 10), Some(0));
        let bottom = NormPoint { x: 0.1, y: band.bottom + 1e-6 };
        assert_eq!(PanelLayout::record_at(bottom, 10), Some(9));
    }

    #[test]
    fn nav_click_outside_band_is_ignored() {
        assert_eq!(PanelLayout::record_at(NormPoint { x: 0.1, y: 0.95 }, 10), None);
        assert_eq!(PanelLayout::record_at(NormPoint { x: 0.1, y: 0.05 }, 10), None);
        assert_eq!(PanelLayout::record_at(NormPoint { x: 0.5, y: 0.5 }, 10), None);
        assert_eq!(PanelLayout::record_at(NormPoint { x: 0.1, y: 0.5 }, 0), None);
    }

    #[test]
    fn normalize_flips_vertical_axis() {
        let l = PanelLayout::compute(1000.0, 500.0);
        assert_eq!(l.normalize(0.0, 500.0), NormPoint { x: 0.0, y: 0.0 });
        assert_eq!(l.normalize(1000.0, 0.0), NormPoint { x: 1.0, y: 1.0 });
    }

    proptest! {
        #[test]
        fn panels_tile_the_band_between_strips(w in 1.0f64..5000.0, h in 1.0f64..5000.0) {
            let l = PanelLayout::compute(w, h);
            let regions = l.regions();
            for (i, a) in regions.iter().enumerate() {
                for b in regions.iter().skip(i + 1) {
                    prop_assert!(a.intersect(*b).area() <= 1e-6);
                }
            }
            let panels = l.navigation.area() + l.detail.area() + l.visualization.area();
            let band = w * h - l.menu.area() - l.status.area();
            prop_assert!((panels - band).abs() <= 1e-6 * w * h);
            prop_assert!((regions.iter().map(|r| r.area()).sum::<f64>() - w * h).abs() <= 1e-6 * w * h);
        }

        #[test]
        fn layout_is_idempotent(w in 1.0f64..5000.0, h in 1.0f64..5000.0) {
            prop_assert_eq!(PanelLayout::compute(w, h), PanelLayout::compute(w, h));
        }
    }
}
