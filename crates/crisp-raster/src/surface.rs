//! `tiny-skia` backed surfaces and drawing contexts.
//!
//! Behaves like a Canvas2D element: a context keeps its own stroke/fill
//! state, transform, blend mode, and current path, and several contexts may
//! point at the same pixels.

use crisp_core::kurbo::Affine;
use crisp_core::{Color, CompositeMode, DrawingContext, HostError, Surface};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tiny_skia::{
    BlendMode, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// Size of a freshly created surface, matching an unsized `<canvas>`.
pub const DEFAULT_SIZE: (u32, u32) = (300, 150);

pub(crate) struct Backing {
    pixmap: Pixmap,
    /// Opaque surfaces read as black where nothing has been drawn.
    opaque: bool,
}

impl Backing {
    fn clear(&mut self) {
        let base = if self.opaque {
            tiny_skia::Color::BLACK
        } else {
            tiny_skia::Color::TRANSPARENT
        };
        self.pixmap.fill(base);
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, HostError> {
    Pixmap::new(width, height).ok_or(HostError::Allocation { width, height })
}

/// A CPU raster. Clones share the same pixels.
#[derive(Clone)]
pub struct RasterSurface {
    backing: Rc<RefCell<Backing>>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, HostError> {
        let pixmap = allocate(width, height)?;
        Ok(Self {
            backing: Rc::new(RefCell::new(Backing {
                pixmap,
                opaque: false,
            })),
        })
    }

    /// Un-premultiplied color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let backing = self.backing.borrow();
        let c = backing.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgb(c.red(), c.green(), c.blue()))
    }

    /// Raw premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> Vec<u8> {
        self.backing.borrow().pixmap.data().to_vec()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), HostError> {
        self.backing
            .borrow()
            .pixmap
            .save_png(path)
            .map_err(|e| HostError::Draw {
                op: "save_png",
                reason: e.to_string(),
            })
    }
}

impl Surface for RasterSurface {
    type Context = RasterContext;

    fn size(&self) -> (u32, u32) {
        let backing = self.backing.borrow();
        (backing.pixmap.width(), backing.pixmap.height())
    }

    fn set_size(&self, width: u32, height: u32) -> Result<(), HostError> {
        let mut backing = self.backing.borrow_mut();
        backing.pixmap = allocate(width, height)?;
        backing.clear();
        Ok(())
    }

    fn context(&self, opaque: bool) -> Result<RasterContext, HostError> {
        let mut backing = self.backing.borrow_mut();
        if opaque && !backing.opaque {
            backing.opaque = true;
            backing.clear();
        }
        Ok(RasterContext::new(Rc::clone(&self.backing)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Move(f32, f32),
    Line(f32, f32),
}

pub struct RasterContext {
    target: Rc<RefCell<Backing>>,
    stroke_color: tiny_skia::Color,
    fill_color: tiny_skia::Color,
    line_width: f32,
    transform: Transform,
    blend_mode: BlendMode,
    path: Vec<Verb>,
}

impl RasterContext {
    fn new(target: Rc<RefCell<Backing>>) -> Self {
        Self {
            target,
            stroke_color: tiny_skia::Color::BLACK,
            fill_color: tiny_skia::Color::BLACK,
            line_width: 1.0,
            transform: Transform::identity(),
            blend_mode: BlendMode::SourceOver,
            path: Vec::new(),
        }
    }

    fn paint(&self, color: tiny_skia::Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        paint.blend_mode = self.blend_mode;
        paint
    }

    fn build_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for verb in &self.path {
            match *verb {
                Verb::Move(x, y) => pb.move_to(x, y),
                Verb::Line(x, y) => pb.line_to(x, y),
            }
        }
        pb.finish()
    }
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, 0xFF)
}

fn blend_mode(mode: CompositeMode) -> BlendMode {
    match mode {
        CompositeMode::SourceOver => BlendMode::SourceOver,
        CompositeMode::Copy => BlendMode::Source,
        CompositeMode::Lighter => BlendMode::Plus,
        CompositeMode::Lighten => BlendMode::Lighten,
    }
}

impl DrawingContext for RasterContext {
    type Surface = RasterSurface;

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = skia_color(color);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = skia_color(color);
    }

    fn set_line_width(&mut self, width: f64) {
        // Canvas ignores non-positive widths.
        if width > 0.0 {
            self.line_width = width as f32;
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(Verb::Move(x as f32, y as f32));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let verb = if self.path.is_empty() {
            Verb::Move(x as f32, y as f32)
        } else {
            Verb::Line(x as f32, y as f32)
        };
        self.path.push(verb);
    }

    fn stroke(&mut self) {
        let Some(path) = self.build_path() else {
            return;
        };
        let stroke = Stroke {
            width: self.line_width,
            ..Stroke::default()
        };
        let paint = self.paint(self.stroke_color);
        self.target
            .borrow_mut()
            .pixmap
            .stroke_path(&path, &paint, &stroke, self.transform, None);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let paint = self.paint(self.fill_color);
        self.target
            .borrow_mut()
            .pixmap
            .fill_rect(rect, &paint, self.transform, None);
    }

    fn set_transform(&mut self, transform: Affine) -> Result<(), HostError> {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        self.transform =
            Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32);
        Ok(())
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) -> Result<(), HostError> {
        self.blend_mode = blend_mode(mode);
        Ok(())
    }

    fn draw_image(&mut self, source: &RasterSurface, x: f64, y: f64) -> Result<(), HostError> {
        if Rc::ptr_eq(&self.target, &source.backing) {
            return Err(HostError::Draw {
                op: "draw_image",
                reason: "source and target are the same surface".to_string(),
            });
        }
        let src = source.backing.borrow();
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: self.blend_mode,
            quality: FilterQuality::Nearest,
        };
        log::trace!(
            "draw_image {}x{} at ({x}, {y}) {:?}",
            src.pixmap.width(),
            src.pixmap.height(),
            self.blend_mode
        );
        self.target.borrow_mut().pixmap.draw_pixmap(
            x as i32,
            y as i32,
            src.pixmap.as_ref(),
            &paint,
            self.transform,
            None,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_context_starts_black() {
        let surface = RasterSurface::new(4, 4).unwrap();
        let _ctx = surface.context(true).unwrap();
        assert_eq!(surface.pixel(3, 3), Some(Color::BLACK));
    }

    #[test]
    fn resize_discards_content() {
        let surface = RasterSurface::new(4, 4).unwrap();
        let mut ctx = surface.context(true).unwrap();
        ctx.set_fill_color(Color::WHITE);
        ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(surface.pixel(0, 0), Some(Color::WHITE));

        surface.set_size(8, 2).unwrap();
        assert_eq!(surface.size(), (8, 2));
        assert_eq!(surface.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn zero_area_is_an_allocation_error() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(HostError::Allocation {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn drawing_onto_itself_fails() {
        let surface = RasterSurface::new(4, 4).unwrap();
        let mut ctx = surface.context(true).unwrap();
        assert!(ctx.draw_image(&surface, 0.0, 0.0).is_err());
    }

    #[test]
    fn lighter_adds_and_lighten_keeps_max() {
        let grey = Color::rgb(0x40, 0x40, 0x40);
        let source = RasterSurface::new(1, 1).unwrap();
        let mut src_ctx = source.context(true).unwrap();
        src_ctx.set_fill_color(grey);
        src_ctx.fill_rect(0.0, 0.0, 1.0, 1.0);

        for (mode, expected) in [
            (CompositeMode::Lighter, Color::rgb(0x80, 0x80, 0x80)),
            (CompositeMode::Lighten, grey),
            (CompositeMode::Copy, grey),
        ] {
            let target = RasterSurface::new(1, 1).unwrap();
            let mut ctx = target.context(true).unwrap();
            ctx.set_fill_color(grey);
            ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
            ctx.set_composite_mode(mode).unwrap();
            ctx.draw_image(&source, 0.0, 0.0).unwrap();
            assert_eq!(target.pixel(0, 0), Some(expected), "{mode:?}");
        }
    }
}
