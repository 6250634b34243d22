//! Host drawing capability.
//!
//! The renderer never rasterizes anything itself. It drives whatever 2D
//! surface the host provides (an HTML `<canvas>` in the browser, a
//! `tiny-skia` pixmap in tests and the snapshot tool) through these traits,
//! which mirror the subset of `CanvasRenderingContext2d` the technique needs.

use crate::config::Color;
use crate::error::HostError;
use kurbo::Affine;

/// Access to the host environment: surface lookup, creation, and the
/// device pixel ratio.
pub trait Host {
    type Surface: Surface<Context = Self::Context>;
    type Context: DrawingContext<Surface = Self::Surface>;

    /// Look up an existing surface by its element id.
    fn surface_by_id(&self, id: &str) -> Option<Self::Surface>;

    /// Create a new invisible surface. Its size is set separately.
    fn create_surface(&self) -> Result<Self::Surface, HostError>;

    /// Device pixels per logical pixel (`window.devicePixelRatio`).
    fn device_scale_factor(&self) -> f64;
}

/// A 2D raster addressed in raw pixel units.
pub trait Surface {
    type Context;

    /// Current `(width, height)` in raw pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the backing raster. Existing content is discarded.
    fn set_size(&self, width: u32, height: u32) -> Result<(), HostError>;

    /// Acquire a drawing context. `opaque` surfaces have no alpha channel.
    fn context(&self, opaque: bool) -> Result<Self::Context, HostError>;
}

/// Path, fill, and compositing operations on one surface.
pub trait DrawingContext {
    type Surface;

    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Replace the current transform. Applies to every later draw call.
    fn set_transform(&mut self, transform: Affine) -> Result<(), HostError>;

    fn set_composite_mode(&mut self, mode: CompositeMode) -> Result<(), HostError>;

    /// Draw `source` with its top-left corner at `(x, y)`, through the
    /// current transform and composite mode.
    fn draw_image(&mut self, source: &Self::Surface, x: f64, y: f64) -> Result<(), HostError>;
}

/// How source pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Ordinary alpha blending.
    #[default]
    SourceOver,
    /// Replace the destination outright.
    Copy,
    /// Add source and destination per channel, saturating.
    Lighter,
    /// Keep the per-channel maximum of source and destination.
    Lighten,
}

impl CompositeMode {
    /// The matching `globalCompositeOperation` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::Copy => "copy",
            Self::Lighter => "lighter",
            Self::Lighten => "lighten",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_modes_map_to_canvas_names() {
        assert_eq!(CompositeMode::default().as_css(), "source-over");
        assert_eq!(CompositeMode::Copy.as_css(), "copy");
        assert_eq!(CompositeMode::Lighter.as_css(), "lighter");
        assert_eq!(CompositeMode::Lighten.as_css(), "lighten");
    }
}
