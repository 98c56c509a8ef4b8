use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::Fnv1a64;
use std::collections::HashMap;
use std::sync::Arc;

/// Raw font file bytes (TTF/OTF) used for captions and the watermark.
#[derive(Clone, Debug)]
pub struct FontBytes {
    bytes: Arc<Vec<u8>>,
    key: u64,
}

impl FontBytes {
    /// Wrap font file contents.
    pub fn new(bytes: Vec<u8>) -> ReelResult<Self> {
        if bytes.is_empty() {
            return Err(ReelError::validation("font bytes must be non-empty"));
        }
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&bytes);
        Ok(Self {
            key: h.finish(),
            bytes: Arc::new(bytes),
        })
    }

    /// Font file contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn key(&self) -> u64 {
        self.key
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Shaped single-run text ready to be painted.
pub(crate) struct TextLayout {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
}

impl TextLayout {
    pub(crate) fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    text: String,
    size_bits: u32,
    brush: TextBrushRgba8,
}

const LAYOUT_CACHE_CAPACITY: usize = 32;

/// Parley contexts plus the one registered font family.
///
/// Registering a font is done once per distinct font; layouts are memoized because captions
/// and watermarks are re-laid out for every frame with the same inputs.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: Option<(u64, String)>,
    layouts: HashMap<LayoutKey, Arc<TextLayout>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family: None,
            layouts: HashMap::new(),
        }
    }

    /// Make `font` the family used by subsequent layouts.
    pub(crate) fn use_font(&mut self, font: &FontBytes) -> ReelResult<()> {
        if matches!(&self.family, Some((key, _)) if *key == font.key()) {
            return Ok(());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.as_bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::validation("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        self.family = Some((font.key(), family_name));
        self.layouts.clear();
        Ok(())
    }

    /// Shape `text` on a single line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> ReelResult<Arc<TextLayout>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some((_, family_name)) = &self.family else {
            return Err(ReelError::evaluation("no font loaded for text layout"));
        };

        let key = LayoutKey {
            text: text.to_owned(),
            size_bits: size_px.to_bits(),
            brush,
        };
        if let Some(l) = self.layouts.get(&key) {
            return Ok(Arc::clone(l));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        if self.layouts.len() >= LAYOUT_CACHE_CAPACITY {
            self.layouts.clear();
        }
        let out = Arc::new(TextLayout { layout });
        self.layouts.insert(key, Arc::clone(&out));
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
pub(crate) mod tests;
