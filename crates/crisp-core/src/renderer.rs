//! Layered renderer: a static background, a per-event foreground, and the
//! on-screen surface they are composited onto.

use crate::align::{ScaleFactor, draw_aligned_line};
use crate::config::{FOREGROUND_FILL, SceneConfig};
use crate::error::{HostError, SetupError};
use crate::events::PointerMove;
use crate::surface::{CompositeMode, DrawingContext, Host, Surface};
use kurbo::Point;

/// Owns the three surfaces and the scale factor for the life of the page.
///
/// Both off-screen layers are sized in device pixels and drawn opaque. The
/// on-screen context carries a `1 / scale` transform, so compositing a
/// layer at the origin reproduces it at logical size.
pub struct Renderer<H: Host> {
    scale: ScaleFactor,
    logical_size: (u32, u32),
    config: SceneConfig,

    background: H::Surface,
    background_ctx: H::Context,
    foreground: H::Surface,
    foreground_ctx: H::Context,
    onscreen: H::Surface,
    onscreen_ctx: H::Context,
}

impl<H: Host> Renderer<H> {
    /// Look up the on-screen surface, size the off-screen layers, and set
    /// the on-screen transform.
    pub fn new(host: &H, surface_id: &str, config: SceneConfig) -> Result<Self, SetupError> {
        let onscreen = host
            .surface_by_id(surface_id)
            .ok_or_else(|| SetupError::SurfaceNotFound(surface_id.to_string()))?;
        let logical_size = onscreen.size();

        let ratio = host.device_scale_factor();
        let scale = ScaleFactor::new(ratio).ok_or(SetupError::InvalidScaleFactor(ratio))?;

        let device_size = (
            scale.device_len(logical_size.0),
            scale.device_len(logical_size.1),
        );
        let background = offscreen_layer(host, device_size)?;
        let foreground = offscreen_layer(host, device_size)?;

        let background_ctx = background.context(true)?;
        let foreground_ctx = foreground.context(true)?;
        let mut onscreen_ctx = onscreen.context(true)?;
        onscreen_ctx.set_transform(scale.compensating_transform())?;

        log::info!(
            "renderer on `{surface_id}`: scale {}, logical {}x{}, layers {}x{}",
            scale.get(),
            logical_size.0,
            logical_size.1,
            device_size.0,
            device_size.1
        );
        if !scale.is_integral() {
            log::warn!(
                "fractional scale factor {}: nudged strokes may straddle device pixels",
                scale.get()
            );
        }

        Ok(Self {
            scale,
            logical_size,
            config,
            background,
            background_ctx,
            foreground,
            foreground_ctx,
            onscreen,
            onscreen_ctx,
        })
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    pub fn logical_size(&self) -> (u32, u32) {
        self.logical_size
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Device-pixel line width for a logical thickness.
    pub fn scaled_line_width(&self, logical_thickness: f64) -> u32 {
        self.scale.line_width(logical_thickness)
    }

    pub fn background(&self) -> &H::Surface {
        &self.background
    }

    pub fn foreground(&self) -> &H::Surface {
        &self.foreground
    }

    pub fn onscreen(&self) -> &H::Surface {
        &self.onscreen
    }

    /// Stroke the static frame into the background layer. Called once at
    /// startup; the layer is never touched again.
    pub fn paint_background(&mut self) {
        let width = self.scaled_line_width(self.config.line_thickness);
        let ctx = &mut self.background_ctx;

        ctx.set_stroke_color(self.config.line_color);
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        for (from, to) in self.config.background_segments() {
            draw_aligned_line(ctx, self.scale, width, from, to);
        }
        ctx.stroke();
    }

    /// Repaint the foreground layer from scratch with the cursor stroke
    /// centered on `at` (logical units).
    pub fn paint_foreground(&mut self, at: Point) {
        let width = self.scaled_line_width(self.config.line_thickness);
        let (device_w, device_h) = self.foreground.size();
        let ctx = &mut self.foreground_ctx;

        ctx.set_fill_color(FOREGROUND_FILL);
        ctx.fill_rect(0.0, 0.0, device_w as f64, device_h as f64);

        ctx.set_stroke_color(self.config.accent_color);
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        let (from, to) = self.config.cursor_segment(at);
        draw_aligned_line(ctx, self.scale, width, from, to);
        ctx.stroke();
    }

    /// Copy the background onto the screen, then add the foreground on top.
    ///
    /// The foreground is black except for its stroke, and `lighter` leaves
    /// the destination unchanged under black source pixels.
    pub fn composite(&mut self) -> Result<(), HostError> {
        let ctx = &mut self.onscreen_ctx;
        ctx.set_composite_mode(CompositeMode::Copy)?;
        ctx.draw_image(&self.background, 0.0, 0.0)?;
        ctx.set_composite_mode(CompositeMode::Lighter)?;
        ctx.draw_image(&self.foreground, 0.0, 0.0)?;
        Ok(())
    }

    pub fn handle_pointer_move(&mut self, event: PointerMove) -> Result<(), HostError> {
        log::debug!("pointer move ({}, {})", event.x, event.y);
        self.paint_foreground(event.position());
        self.composite()
    }
}

fn offscreen_layer<H: Host>(host: &H, (width, height): (u32, u32)) -> Result<H::Surface, HostError> {
    let surface = host.create_surface()?;
    surface.set_size(width, height)?;
    Ok(surface)
}
