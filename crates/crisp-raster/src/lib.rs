//! CPU raster host for Crisp Lines.
//!
//! Implements the host capability on top of `tiny-skia` pixmaps so the
//! renderer can run without a browser: pixel-exact tests and the
//! `crisp-snapshot` tool both drive it.

mod surface;

pub use surface::{DEFAULT_SIZE, RasterContext, RasterSurface};

use crisp_core::{EventSource, Host, HostError, PointerMove};
use std::cell::RefCell;
use std::collections::HashMap;

type PointerHandler = Box<dyn FnMut(PointerMove)>;

/// In-memory stand-in for a browser page: named on-screen surfaces, a
/// fixed device pixel ratio, and a pointer-move queue fed by the caller.
pub struct RasterHost {
    scale: f64,
    surfaces: RefCell<HashMap<String, RasterSurface>>,
    handlers: RefCell<Vec<PointerHandler>>,
}

impl RasterHost {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            surfaces: RefCell::default(),
            handlers: RefCell::default(),
        }
    }

    /// Register an on-screen surface of `width × height` raw pixels.
    pub fn add_surface(&self, id: &str, width: u32, height: u32) -> Result<RasterSurface, HostError> {
        let surface = RasterSurface::new(width, height)?;
        self.surfaces
            .borrow_mut()
            .insert(id.to_string(), surface.clone());
        Ok(surface)
    }

    /// Deliver one pointer move to every registered handler, in
    /// registration order, before returning.
    pub fn dispatch_pointer_move(&self, event: PointerMove) {
        // Handlers may register more handlers; those see the next event.
        let mut active = std::mem::take(&mut *self.handlers.borrow_mut());
        for handler in active.iter_mut() {
            handler(event);
        }
        let mut handlers = self.handlers.borrow_mut();
        active.append(&mut handlers);
        *handlers = active;
    }
}

impl Host for RasterHost {
    type Surface = RasterSurface;
    type Context = RasterContext;

    fn surface_by_id(&self, id: &str) -> Option<RasterSurface> {
        self.surfaces.borrow().get(id).cloned()
    }

    fn create_surface(&self) -> Result<RasterSurface, HostError> {
        RasterSurface::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1)
    }

    fn device_scale_factor(&self) -> f64 {
        self.scale
    }
}

impl EventSource for RasterHost {
    fn on_pointer_move(&self, handler: Box<dyn FnMut(PointerMove)>) -> Result<(), HostError> {
        self.handlers.borrow_mut().push(handler);
        Ok(())
    }
}
