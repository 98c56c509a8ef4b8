use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Rgba8Premul, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;
use crate::render::plan::{DrawCmd, DrawList, GradientAxis};
use crate::render::text::{FontBytes, TextBrushRgba8, TextLayout, TextLayoutEngine};
use crate::timeline::{RasterId, RasterImage};
use kurbo::Shape;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

const IMAGE_CACHE_CAPACITY: usize = 64;
const GRADIENT_CACHE_CAPACITY: usize = 128;
const GLOW_RINGS: u32 = 5;
const MAX_GRADIENT_STEPS: u32 = 1024;

/// Decoded rasters converted to `vello_cpu` paints, evicted least-recently-used first.
struct ImagePaintCache {
    paints: HashMap<RasterId, vello_cpu::Image>,
    lru: VecDeque<RasterId>,
    capacity: usize,
}

impl ImagePaintCache {
    fn new(capacity: usize) -> Self {
        Self {
            paints: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
        }
    }

    fn paint_for(&mut self, img: &RasterImage) -> ReelResult<vello_cpu::Image> {
        let key = img.id();
        if let Some(p) = self.paints.get(&key).cloned() {
            self.touch(key);
            return Ok(p);
        }
        let paint = rgba_premul_to_image(img.data(), img.width(), img.height())?;
        self.paints.insert(key, paint.clone());
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.paints.remove(&old);
            }
        }
        Ok(paint)
    }

    fn touch(&mut self, key: RasterId) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    from: [u8; 4],
    to: [u8; 4],
    steps: u32,
}

/// CPU raster backend powered by `vello_cpu`.
///
/// Keeps one render context sized to the last canvas plus paint caches, so consecutive frames of
/// the same timeline reuse converted images and shaped text.
pub(crate) struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
    images: ImagePaintCache,
    gradients: HashMap<GradientKey, vello_cpu::Image>,
    text: TextLayoutEngine,
    font: Option<(u64, vello_cpu::peniko::FontData)>,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    pub(crate) fn new() -> Self {
        Self {
            ctx: None,
            images: ImagePaintCache::new(IMAGE_CACHE_CAPACITY),
            gradients: HashMap::new(),
            text: TextLayoutEngine::new(),
            font: None,
        }
    }

    /// Select the font used by text draws; `None` disables text.
    pub(crate) fn use_font(&mut self, font: Option<&FontBytes>) -> ReelResult<()> {
        let Some(font) = font else {
            self.font = None;
            return Ok(());
        };
        if matches!(&self.font, Some((key, _)) if *key == font.key()) {
            return Ok(());
        }
        self.font = None;
        self.text.use_font(font)?;
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.as_bytes().to_vec()),
            0,
        );
        self.font = Some((font.key(), data));
        Ok(())
    }

    /// Paint one frame of `canvas` size and read it back.
    pub(crate) fn render(
        &mut self,
        canvas: Canvas,
        draw: impl FnOnce(&mut CpuPainter<'_>),
    ) -> ReelResult<FrameRGBA> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::evaluation("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::evaluation("canvas height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        {
            let mut painter = CpuPainter {
                ctx: &mut ctx,
                images: &mut self.images,
                gradients: &mut self.gradients,
                text: &mut self.text,
                font: self.font.as_ref().map(|(_, f)| f),
            };
            draw(&mut painter);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Drawing surface handed to the compositor for the duration of one frame.
pub(crate) struct CpuPainter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    images: &'a mut ImagePaintCache,
    gradients: &'a mut HashMap<GradientKey, vello_cpu::Image>,
    text: &'a mut TextLayoutEngine,
    font: Option<&'a vello_cpu::peniko::FontData>,
}

impl CpuPainter<'_> {
    fn reset_state(&mut self, transform: Affine) {
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
    }

    fn set_color(&mut self, c: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }

    /// Fill `rect` with a solid color.
    pub(crate) fn fill(&mut self, rect: Rect, color: Rgba8) {
        self.reset_state(Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Draw `img` with its pixel grid mapped through `transform`.
    pub(crate) fn draw_image(
        &mut self,
        img: &RasterImage,
        transform: Affine,
        opacity: f64,
    ) -> ReelResult<()> {
        let opacity = sanitize_opacity(opacity);
        if opacity <= 0.0 {
            return Ok(());
        }
        let paint = self.images.paint_for(img)?;
        self.reset_state(transform);
        self.ctx.set_paint(paint);
        self.with_opacity(opacity, |ctx| {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(img.width()),
                f64::from(img.height()),
            ));
        });
        Ok(())
    }

    /// Replay a display list back-to-front.
    pub(crate) fn draw_list(&mut self, list: &DrawList) -> ReelResult<()> {
        for cmd in list.cmds() {
            self.draw_cmd(cmd)?;
        }
        Ok(())
    }

    fn draw_cmd(&mut self, cmd: &DrawCmd) -> ReelResult<()> {
        match cmd {
            DrawCmd::FillRect { rect, color } => self.fill(*rect, *color),
            DrawCmd::FillCircle {
                center,
                radius,
                color,
            } => self.fill_circle(*center, *radius, *color),
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => {
                let quad = segment_quad(*from, *to, *width);
                self.fill_path(&quad, *color);
            }
            DrawCmd::FillPath { path, color } => self.fill_path(path, *color),
            DrawCmd::Glow {
                center,
                radius,
                color,
            } => {
                let ring = color.fade(1.0 / f64::from(GLOW_RINGS));
                if ring.is_invisible() {
                    return Ok(());
                }
                for k in 0..GLOW_RINGS {
                    let r = radius * f64::from(GLOW_RINGS - k) / f64::from(GLOW_RINGS);
                    self.fill_circle(*center, r, ring);
                }
            }
            DrawCmd::Gradient {
                rect,
                from,
                to,
                axis,
            } => self.fill_gradient(*rect, *from, *to, *axis)?,
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.reset_state(Affine::IDENTITY);
        self.set_color(color);
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in kurbo::Circle::new(center, radius).path_elements(0.1) {
            p.push(el);
        }
        self.ctx.fill_path(&p);
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.reset_state(Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn fill_gradient(
        &mut self,
        rect: Rect,
        from: Rgba8,
        to: Rgba8,
        axis: GradientAxis,
    ) -> ReelResult<()> {
        let extent = match axis {
            GradientAxis::Vertical => rect.height(),
            GradientAxis::Horizontal => rect.width(),
        };
        if !(extent > 0.0) || !(rect.width() > 0.0) || !(rect.height() > 0.0) {
            return Ok(());
        }
        let steps = (extent.ceil() as u32).clamp(1, MAX_GRADIENT_STEPS);
        let key = GradientKey {
            from: [from.r, from.g, from.b, from.a],
            to: [to.r, to.g, to.b, to.a],
            steps,
        };
        let paint = match self.gradients.get(&key).cloned() {
            Some(p) => p,
            None => {
                let p = gradient_strip(from, to, steps)?;
                if self.gradients.len() >= GRADIENT_CACHE_CAPACITY {
                    self.gradients.clear();
                }
                self.gradients.insert(key, p.clone());
                p
            }
        };

        // The strip is `1 x steps`; horizontal gradients rotate it onto the x axis.
        let steps_f = f64::from(steps);
        let transform = match axis {
            GradientAxis::Vertical => {
                Affine::translate(Vec2::new(rect.x0, rect.y0))
                    * Affine::scale_non_uniform(rect.width(), rect.height() / steps_f)
            }
            GradientAxis::Horizontal => {
                Affine::translate(Vec2::new(rect.x0, rect.y0))
                    * Affine::scale_non_uniform(rect.width() / steps_f, rect.height())
                    * Affine::new([0.0, 1.0, 1.0, 0.0, 0.0, 0.0])
            }
        };
        self.reset_state(transform);
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 1.0, steps_f));
        Ok(())
    }

    /// Shape `text` with the active font.
    pub(crate) fn layout_text(
        &mut self,
        text: &str,
        size_px: f64,
        color: Rgba8,
    ) -> ReelResult<Arc<TextLayout>> {
        if self.font.is_none() {
            return Err(ReelError::evaluation("no font loaded for text layout"));
        }
        self.text
            .layout_line(text, size_px as f32, TextBrushRgba8::from(color))
    }

    /// Paint a shaped layout with its top-left corner at `origin`.
    pub(crate) fn draw_text(
        &mut self,
        layout: &TextLayout,
        origin: Point,
        opacity: f64,
    ) -> ReelResult<()> {
        let font = self
            .font
            .ok_or_else(|| ReelError::evaluation("no font loaded for text draw"))?;
        let opacity = sanitize_opacity(opacity);
        if opacity <= 0.0 {
            return Ok(());
        }
        self.reset_state(Affine::translate(origin.to_vec2()));
        let ctx = &mut *self.ctx;
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity as f32);
        }
        for line in layout.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let mut x = run.offset();
                let y = run.baseline();
                let glyphs = run.glyphs().map(|g| {
                    let out = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    };
                    x += g.advance;
                    out
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn with_opacity(&mut self, opacity: f64, f: impl FnOnce(&mut vello_cpu::RenderContext)) {
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity as f32);
        }
        f(&mut *self.ctx);
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }
}

fn sanitize_opacity(opacity: f64) -> f64 {
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rectangle covering a thick segment with square caps.
fn segment_quad(from: Point, to: Point, width: f64) -> BezPath {
    let d = to - from;
    let len = d.hypot();
    let dir = if len > 1e-9 {
        d / len
    } else {
        Vec2::new(1.0, 0.0)
    };
    let hw = width * 0.5;
    let along = dir * hw;
    let across = Vec2::new(-dir.y, dir.x) * hw;
    let a = from - along;
    let b = to + along;

    let mut p = BezPath::new();
    p.move_to(a + across);
    p.line_to(b + across);
    p.line_to(b - across);
    p.line_to(a - across);
    p.close_path();
    p
}

fn gradient_strip(from: Rgba8, to: Rgba8, steps: u32) -> ReelResult<vello_cpu::Image> {
    let mut bytes = Vec::with_capacity((steps as usize) * 4);
    let last = steps.saturating_sub(1).max(1);
    for i in 0..steps {
        let t = f64::from(i) / f64::from(last);
        let c = Rgba8Premul::from(from.mix(to, t));
        bytes.extend_from_slice(&[c.r, c.g, c.b, c.a]);
    }
    rgba_premul_to_image(&bytes, 1, steps)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::evaluation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::evaluation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::evaluation("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(bytes_premul: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
