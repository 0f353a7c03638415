//! The on-screen rectangle the cube texture is shown in.
//!
//! The panel may hang partly outside the window. wgpu viewports must lie
//! inside the render target, so only the visible part is drawn and the
//! cropped-quad pipeline is told which part of the texture that is.

use cubeview_gpu::VisibleRect;

/// Panel position and size, in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub origin: (f32, f32),
    pub size: (f32, f32),
}

/// Where to draw a panel in a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// `x, y, width, height` in physical pixels, for `RenderPass::set_viewport`.
    pub viewport: [f32; 4],
    /// Part of the panel texture that falls inside `viewport`.
    pub visible: VisibleRect,
}

impl Panel {
    /// Panel of `size` centered in a window of `window` logical points.
    pub fn centered(size: (f32, f32), window: (f32, f32)) -> Self {
        Self {
            origin: ((window.0 - size.0) / 2.0, (window.1 - size.1) / 2.0),
            size,
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }

    /// `[min_x, min_y, max_x, max_y]` in physical pixels.
    pub fn rect_px(&self, scale: f32) -> [f32; 4] {
        [
            self.origin.0 * scale,
            self.origin.1 * scale,
            (self.origin.0 + self.size.0) * scale,
            (self.origin.1 + self.size.1) * scale,
        ]
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.origin.0
            && point.1 >= self.origin.1
            && point.0 < self.origin.0 + self.size.0
            && point.1 < self.origin.1 + self.size.1
    }

    /// Visible part of the panel in a window of `window_px` physical pixels,
    /// or `None` when nothing of it is on screen.
    pub fn placement(&self, window_px: (u32, u32), scale: f32) -> Option<Placement> {
        let rect = self.rect_px(scale);
        let window = [0.0, 0.0, window_px.0 as f32, window_px.1 as f32];

        let x0 = rect[0].max(window[0]);
        let y0 = rect[1].max(window[1]);
        let x1 = rect[2].min(window[2]);
        let y1 = rect[3].min(window[3]);
        // Also rejects inverted and NaN rects.
        if !(x1 > x0 && y1 > y0) {
            return None;
        }

        let visible = VisibleRect::from_rects(rect, window);
        Some(Placement {
            viewport: [x0, y0, x1 - x0, y1 - y0],
            visible,
        })
    }
}
