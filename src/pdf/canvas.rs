//! A drawing surface over `pdf-writer`.
//!
//! Objects are written as soon as they are known: fonts and images when they
//! are registered, content streams when a page ends. Page objects come last,
//! in [`Canvas::finish`], because every page shares one resource dictionary
//! naming all fonts, images and opacity states.
//!
//! Coordinates are PDF points with the origin at the bottom-left.

use crate::config::Rgb;
use crate::fonts::{Font, TrueTypeFont};
use crate::imaging::PreparedImage;
use crate::layout::Rect;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, TextRenderingMode};
use pdf_writer::{Content, Filter, Name, Pdf, Ref, Str, TextStr};

const COMPRESSION_LEVEL: u8 = 6;

/// Handle to a registered font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontId(usize);

/// Handle to an embedded image plus its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId {
    index: usize,
    pub width: u32,
    pub height: u32,
}

impl ImageId {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// How text glyphs are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPaint {
    Fill(Rgb),
    /// Outline only, `width` points.
    Stroke { color: Rgb, width: f32 },
}

struct Resource {
    name: String,
    id: Ref,
}

struct RegisteredFont {
    font: Font,
    resource: Resource,
}

pub struct Canvas {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    page_size: (f32, f32),
    /// Finished pages: (page object, content stream).
    pages: Vec<(Ref, Ref)>,
    current: Option<Content>,
    fonts: Vec<RegisteredFont>,
    images: Vec<Resource>,
    /// Fill opacity states keyed by the alpha's bit pattern.
    alphas: Vec<(u32, Resource)>,
    #[cfg(test)]
    raw_pages: Vec<Vec<u8>>,
}

impl Canvas {
    pub fn new(page_width: f32, page_height: f32) -> Self {
        let mut canvas = Self {
            pdf: Pdf::new(),
            next_id: 1,
            catalog_id: Ref::new(1),
            pages_id: Ref::new(1),
            page_size: (page_width, page_height),
            pages: Vec::new(),
            current: None,
            fonts: Vec::new(),
            images: Vec::new(),
            alphas: Vec::new(),
            #[cfg(test)]
            raw_pages: Vec::new(),
        };
        canvas.catalog_id = canvas.alloc();
        canvas.pages_id = canvas.alloc();
        canvas
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    pub fn set_title(&mut self, title: &str) {
        let id = self.alloc();
        self.pdf
            .document_info(id)
            .title(TextStr(title))
            .creator(TextStr(env!("CARGO_PKG_NAME")));
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Register a font, reusing an earlier registration with the same name.
    pub fn add_font(&mut self, font: &Font) -> FontId {
        if let Some(index) = self.fonts.iter().position(|f| f.font.name() == font.name()) {
            return FontId(index);
        }
        let id = self.alloc();
        match font {
            Font::Standard(standard) => {
                self.pdf
                    .type1_font(id)
                    .base_font(Name(standard.base_font().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            Font::TrueType(truetype) => self.write_truetype(id, truetype),
        }
        let name = format!("F{}", self.fonts.len() + 1);
        self.fonts.push(RegisteredFont {
            font: font.clone(),
            resource: Resource { name, id },
        });
        FontId(self.fonts.len() - 1)
    }

    pub fn font(&self, id: FontId) -> &Font {
        &self.fonts[id.0].font
    }

    fn write_truetype(&mut self, type0_id: Ref, font: &TrueTypeFont) {
        let cid_id = self.alloc();
        let descriptor_id = self.alloc();
        let file_id = self.alloc();
        let base_font = postscript_name(&font.name);
        let base_font = Name(base_font.as_bytes());

        self.pdf
            .type0_font(type0_id)
            .base_font(base_font)
            .encoding_predefined(Name(b"Identity-H"))
            .descendant_font(cid_id);

        let mut cid = self.pdf.cid_font(cid_id);
        cid.subtype(CidFontType::Type2)
            .base_font(base_font)
            .system_info(SystemInfo {
                registry: Str(b"Adobe"),
                ordering: Str(b"Identity"),
                supplement: 0,
            })
            .font_descriptor(descriptor_id)
            .default_width(0.0)
            .cid_to_gid_map_predefined(Name(b"Identity"));
        cid.widths().consecutive(0, font.pdf_widths());
        drop(cid);

        let units = |v: i16| font.to_pdf_units(v as f32);
        let [x_min, y_min, x_max, y_max] = font.bbox;
        self.pdf
            .font_descriptor(descriptor_id)
            .name(base_font)
            .flags(FontFlags::NON_SYMBOLIC)
            .bbox(pdf_writer::Rect::new(
                units(x_min),
                units(y_min),
                units(x_max),
                units(y_max),
            ))
            .italic_angle(font.italic_angle)
            .ascent(units(font.ascender))
            .descent(units(font.descender))
            .cap_height(units(font.cap_height))
            .stem_v(80.0)
            .font_file2(file_id);

        let compressed = compress_to_vec_zlib(&font.data, COMPRESSION_LEVEL);
        self.pdf
            .stream(file_id, &compressed)
            .filter(Filter::FlateDecode)
            .pair(Name(b"Length1"), font.data.len() as i32);
    }

    /// Embed decoded pixels as an image XObject (with a soft mask when the
    /// image has an alpha plane).
    pub fn add_image(&mut self, image: &PreparedImage) -> ImageId {
        let id = self.alloc();
        let (w, h) = (image.width as i32, image.height as i32);

        let mask_id = image.alpha.as_ref().map(|alpha| {
            let mask_id = self.alloc();
            let compressed = compress_to_vec_zlib(alpha, COMPRESSION_LEVEL);
            let mut mask = self.pdf.image_xobject(mask_id, &compressed);
            mask.filter(Filter::FlateDecode);
            mask.width(w);
            mask.height(h);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
            mask_id
        });

        let compressed = compress_to_vec_zlib(&image.rgb, COMPRESSION_LEVEL);
        let mut xobj = self.pdf.image_xobject(id, &compressed);
        xobj.filter(Filter::FlateDecode);
        xobj.width(w);
        xobj.height(h);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            xobj.s_mask(mask_id);
        }
        drop(xobj);

        let name = format!("Im{}", self.images.len() + 1);
        self.images.push(Resource { name, id });
        ImageId {
            index: self.images.len() - 1,
            width: image.width,
            height: image.height,
        }
    }

    /// Graphics state name for a fill opacity.
    fn alpha_state(&mut self, alpha: f32) -> String {
        let key = alpha.to_bits();
        if let Some((_, res)) = self.alphas.iter().find(|(k, _)| *k == key) {
            return res.name.clone();
        }
        let id = self.alloc();
        self.pdf.ext_graphics(id).non_stroking_alpha(alpha);
        let name = format!("GS{}", self.alphas.len() + 1);
        self.alphas.push((key, Resource { name: name.clone(), id }));
        name
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Start a new page, finishing the current one if any.
    pub fn begin_page(&mut self) {
        self.end_page();
        self.current = Some(Content::new());
    }

    /// Finish the current page. No-op when no page is open.
    pub fn end_page(&mut self) {
        let Some(content) = self.current.take() else {
            return;
        };
        let page_id = self.alloc();
        let content_id = self.alloc();
        let raw = content.finish();
        let compressed = compress_to_vec_zlib(raw.as_slice(), COMPRESSION_LEVEL);
        self.pdf
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);
        #[cfg(test)]
        self.raw_pages.push(raw.as_slice().to_vec());
        self.pages.push((page_id, content_id));
    }

    fn content(&mut self) -> &mut Content {
        self.current.get_or_insert_with(Content::new)
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let c = self.content();
        c.save_state();
        c.set_fill_rgb(color.r(), color.g(), color.b());
        c.rect(rect.x, rect.y, rect.width, rect.height);
        c.fill_nonzero();
        c.restore_state();
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgb, width: f32) {
        let c = self.content();
        c.save_state();
        c.set_stroke_rgb(color.r(), color.g(), color.b());
        c.set_line_width(width);
        c.rect(rect.x, rect.y, rect.width, rect.height);
        c.stroke();
        c.restore_state();
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32) {
        let c = self.content();
        c.save_state();
        c.set_stroke_rgb(color.r(), color.g(), color.b());
        c.set_line_width(width);
        c.move_to(from.0, from.1);
        c.line_to(to.0, to.1);
        c.stroke();
        c.restore_state();
    }

    /// Run `draw` with everything outside `clip` masked off.
    pub fn clipped(&mut self, clip: Rect, draw: impl FnOnce(&mut Canvas)) {
        let c = self.content();
        c.save_state();
        c.rect(clip.x, clip.y, clip.width, clip.height);
        c.clip_nonzero();
        c.end_path();
        draw(self);
        self.content().restore_state();
    }

    /// Paint an image stretched over `target`.
    pub fn draw_image(&mut self, image: ImageId, target: Rect) {
        let name = self.images[image.index].name.clone();
        let c = self.content();
        c.save_state();
        c.transform([target.width, 0.0, 0.0, target.height, target.x, target.y]);
        c.x_object(Name(name.as_bytes()));
        c.restore_state();
    }

    /// Show `text` with its baseline starting at `(x, y)`.
    pub fn text(&mut self, font: FontId, size: f32, x: f32, y: f32, text: &str, paint: TextPaint) {
        let bytes = self.fonts[font.0].font.encode(text);
        let name = self.fonts[font.0].resource.name.clone();
        let c = self.content();
        c.save_state();
        match paint {
            TextPaint::Fill(color) => {
                c.set_fill_rgb(color.r(), color.g(), color.b());
            }
            TextPaint::Stroke { color, width } => {
                c.set_stroke_rgb(color.r(), color.g(), color.b());
                c.set_line_width(width);
            }
        }
        c.begin_text();
        if matches!(paint, TextPaint::Stroke { .. }) {
            c.set_text_rendering_mode(TextRenderingMode::Stroke);
        }
        c.set_font(Name(name.as_bytes()), size);
        c.next_line(x, y);
        c.show(Str(&bytes));
        c.end_text();
        c.restore_state();
    }

    /// Show `text` centered on `center` after rotating by `degrees`
    /// counter-clockwise, filled at `alpha` opacity.
    #[allow(clippy::too_many_arguments)]
    pub fn rotated_text(
        &mut self,
        font: FontId,
        size: f32,
        center: (f32, f32),
        degrees: f32,
        text: &str,
        color: Rgb,
        alpha: f32,
    ) {
        let width = self.fonts[font.0].font.text_width(text, size);
        let bytes = self.fonts[font.0].font.encode(text);
        let name = self.fonts[font.0].resource.name.clone();
        let state = (alpha < 1.0).then(|| self.alpha_state(alpha));
        let (sin, cos) = degrees.to_radians().sin_cos();

        let c = self.content();
        c.save_state();
        if let Some(state) = &state {
            c.set_parameters(Name(state.as_bytes()));
        }
        c.transform([cos, sin, -sin, cos, center.0, center.1]);
        c.set_fill_rgb(color.r(), color.g(), color.b());
        c.begin_text();
        c.set_font(Name(name.as_bytes()), size);
        c.next_line(-width / 2.0, -size / 3.0);
        c.show(Str(&bytes));
        c.end_text();
        c.restore_state();
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Write the page tree and catalog and return the file bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.end_page();
        let (width, height) = self.page_size;

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(self.pages.iter().map(|(page, _)| *page))
            .count(self.pages.len() as i32);

        for (page_id, content_id) in &self.pages {
            let mut page = self.pdf.page(*page_id);
            page.media_box(pdf_writer::Rect::new(0.0, 0.0, width, height))
                .parent(self.pages_id)
                .contents(*content_id);
            let mut resources = page.resources();
            if !self.fonts.is_empty() {
                let mut fonts = resources.fonts();
                for f in &self.fonts {
                    fonts.pair(Name(f.resource.name.as_bytes()), f.resource.id);
                }
            }
            if !self.images.is_empty() {
                let mut xobjects = resources.x_objects();
                for img in &self.images {
                    xobjects.pair(Name(img.name.as_bytes()), img.id);
                }
            }
            if !self.alphas.is_empty() {
                let mut states = resources.ext_g_states();
                for (_, gs) in &self.alphas {
                    states.pair(Name(gs.name.as_bytes()), gs.id);
                }
            }
        }

        self.pdf.finish()
    }

    #[cfg(test)]
    pub(crate) fn raw_page(&self, index: usize) -> &[u8] {
        &self.raw_pages[index]
    }
}

/// Font names in PDF must not contain spaces or delimiters.
fn postscript_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect()
}
