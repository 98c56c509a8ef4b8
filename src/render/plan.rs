use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use kurbo::Shape;

/// Direction along which a [`DrawCmd::Gradient`] interpolates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientAxis {
    /// `from` at the top edge, `to` at the bottom edge.
    Vertical,
    /// `from` at the left edge, `to` at the right edge.
    Horizontal,
}

/// One backend-agnostic draw operation in canvas pixel space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Solid axis-aligned rectangle.
    FillRect {
        /// Rectangle to fill.
        rect: Rect,
        /// Paint color.
        color: Rgba8,
    },
    /// Solid disc.
    FillCircle {
        /// Disc center.
        center: Point,
        /// Disc radius in pixels.
        radius: f64,
        /// Paint color.
        color: Rgba8,
    },
    /// Straight segment with square caps.
    Line {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
        /// Segment thickness in pixels.
        width: f64,
        /// Paint color.
        color: Rgba8,
    },
    /// Arbitrary filled outline.
    FillPath {
        /// Outline to fill (non-zero winding).
        path: BezPath,
        /// Paint color.
        color: Rgba8,
    },
    /// Soft radial glow, strongest at the center and fading to nothing at `radius`.
    Glow {
        /// Glow center.
        center: Point,
        /// Outer radius in pixels.
        radius: f64,
        /// Color at the center.
        color: Rgba8,
    },
    /// Two-stop linear gradient clipped to `rect`.
    Gradient {
        /// Area covered by the gradient.
        rect: Rect,
        /// Color at the leading edge.
        from: Rgba8,
        /// Color at the trailing edge.
        to: Rgba8,
        /// Interpolation direction.
        axis: GradientAxis,
    },
}

impl DrawCmd {
    /// Conservative pixel-space bounds of the painted area.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::FillRect { rect, .. } | Self::Gradient { rect, .. } => *rect,
            Self::FillCircle { center, radius, .. } | Self::Glow { center, radius, .. } => {
                Rect::new(
                    center.x - radius,
                    center.y - radius,
                    center.x + radius,
                    center.y + radius,
                )
            }
            Self::Line {
                from, to, width, ..
            } => {
                let hw = width * 0.5;
                Rect::from_points(*from, *to).inflate(hw, hw)
            }
            Self::FillPath { path, .. } => path.bounding_box(),
        }
    }

    fn has_paint(&self) -> bool {
        match self {
            Self::FillRect { color, .. } | Self::FillPath { color, .. } => !color.is_invisible(),
            Self::FillCircle { radius, color, .. } | Self::Glow { radius, color, .. } => {
                *radius > 0.0 && !color.is_invisible()
            }
            Self::Line { width, color, .. } => *width > 0.0 && !color.is_invisible(),
            Self::Gradient { from, to, .. } => !(from.is_invisible() && to.is_invisible()),
        }
    }

    /// Return `true` when the command would touch at least one pixel of `view`.
    pub fn is_visible_in(&self, view: Rect) -> bool {
        if !self.has_paint() {
            return false;
        }
        let b = self.bounds();
        let finite = [b.x0, b.y0, b.x1, b.y1].iter().all(|v| v.is_finite());
        finite && b.x0 < view.x1 && b.x1 > view.x0 && b.y0 < view.y1 && b.y1 > view.y0
    }
}

/// Ordered display list produced by effect generators.
///
/// Commands are kept back-to-front. Anything that would land fully outside the canvas, or paints
/// with zero alpha, is dropped at push time instead of being clipped during rasterization.
#[derive(Clone, Debug)]
pub struct DrawList {
    canvas: Canvas,
    view: Rect,
    cmds: Vec<DrawCmd>,
    culled: usize,
}

impl DrawList {
    /// Create an empty list for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            view: canvas.rect(),
            cmds: Vec::new(),
            culled: 0,
        }
    }

    /// Canvas the list was built for.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Recorded commands, back-to-front.
    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    /// Return `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Number of commands dropped by culling.
    pub fn culled(&self) -> usize {
        self.culled
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.cmds.clear();
        self.culled = 0;
    }

    /// Fill an axis-aligned rectangle.
    pub fn rect(&mut self, rect: Rect, color: Rgba8) {
        self.push(DrawCmd::FillRect { rect, color });
    }

    /// Fill the whole canvas.
    pub fn wash(&mut self, color: Rgba8) {
        let rect = self.view;
        self.push(DrawCmd::FillRect { rect, color });
    }

    /// Fill a disc.
    pub fn circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
        });
    }

    /// Draw a thick segment.
    pub fn line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        self.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    /// Fill an outline.
    pub fn path(&mut self, path: BezPath, color: Rgba8) {
        self.push(DrawCmd::FillPath { path, color });
    }

    /// Paint a soft radial glow.
    pub fn glow(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.push(DrawCmd::Glow {
            center,
            radius,
            color,
        });
    }

    /// Paint a two-stop linear gradient.
    pub fn gradient(&mut self, rect: Rect, from: Rgba8, to: Rgba8, axis: GradientAxis) {
        self.push(DrawCmd::Gradient {
            rect,
            from,
            to,
            axis,
        });
    }

    fn push(&mut self, cmd: DrawCmd) {
        if cmd.is_visible_in(self.view) {
            self.cmds.push(cmd);
        } else {
            self.culled += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
