//! Coordinate mapping and canvas sizing math.
//!
//! Pure functions only — the DOM shell feeds in bounding rects, client
//! coordinates, and the device pixel ratio, and applies the results to the
//! canvas element. Keeping the math DOM-free lets it run under native
//! `cargo test`.
//!
//! All gameplay happens in logical CSS pixels: the backing buffer is scaled
//! by the device pixel ratio and the draw context gets a matching
//! `scale(dpr, dpr)`, so draw calls never see physical pixels.

/// A display surface's bounding rectangle in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map client coordinates to logical game-space coordinates relative to the
/// surface's top-left corner. DPR never enters here — it only affects the
/// backing buffer, not logical positions.
pub fn to_logical(rect: &SurfaceRect, client_x: f64, client_y: f64) -> (f64, f64) {
    (client_x - rect.left, client_y - rect.top)
}

/// Logical width/height for a surface. A degenerate rect (zero-sized on first
/// paint, before layout settles) falls back to a fraction of the viewport.
pub fn logical_size(rect: &SurfaceRect, viewport_w: f64, viewport_h: f64) -> (f64, f64) {
    let w = if rect.width > 0.0 { rect.width } else { viewport_w * 0.9 };
    let h = if rect.height > 0.0 { rect.height } else { viewport_h * 0.8 };
    (w, h)
}

/// Physical backing-buffer dimensions for a logical size at the given device
/// pixel ratio.
pub fn backing_size(logical_w: f64, logical_h: f64, dpr: f64) -> (u32, u32) {
    ((logical_w * dpr) as u32, (logical_h * dpr) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: SurfaceRect = SurfaceRect {
        left: 100.0,
        top: 50.0,
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn maps_relative_to_surface_origin() {
        assert_eq!(to_logical(&RECT, 100.0, 50.0), (0.0, 0.0));
        assert_eq!(to_logical(&RECT, 350.5, 412.0), (250.5, 362.0));
    }

    #[test]
    fn mapping_ignores_device_pixel_ratio() {
        // Same rect, any DPR: logical output is identical. DPR only changes
        // the backing buffer.
        let logical = to_logical(&RECT, 300.0, 200.0);
        for dpr in [1.0, 1.5, 2.0, 3.0] {
            assert_eq!(to_logical(&RECT, 300.0, 200.0), logical);
            let (bw, bh) = backing_size(RECT.width, RECT.height, dpr);
            assert_eq!(bw, (800.0 * dpr) as u32);
            assert_eq!(bh, (600.0 * dpr) as u32);
        }
    }

    #[test]
    fn logical_size_uses_rect_when_valid() {
        assert_eq!(logical_size(&RECT, 1920.0, 1080.0), (800.0, 600.0));
    }

    #[test]
    fn degenerate_rect_falls_back_to_viewport_fraction() {
        let zero = SurfaceRect { left: 0.0, top: 0.0, width: 0.0, height: 0.0 };
        assert_eq!(logical_size(&zero, 1000.0, 500.0), (900.0, 400.0));
    }

    #[test]
    fn sizing_is_idempotent() {
        let (w, h) = logical_size(&RECT, 1920.0, 1080.0);
        let again = logical_size(
            &SurfaceRect { left: RECT.left, top: RECT.top, width: w, height: h },
            1920.0,
            1080.0,
        );
        assert_eq!(again, (w, h));
        assert_eq!(backing_size(w, h, 2.0), backing_size(w, h, 2.0));
    }
}
