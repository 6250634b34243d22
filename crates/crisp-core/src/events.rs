//! Pointer input and the glue that binds a renderer to it.
//!
//! The host delivers events serially on one thread. Each delivery runs the
//! whole repaint-and-composite sequence before returning, so the shared
//! renderer needs a `RefCell`, not a lock. A host that re-enters the
//! handler breaks that model; such deliveries are dropped.

use crate::config::SceneConfig;
use crate::error::{HostError, SetupError};
use crate::renderer::Renderer;
use crate::surface::Host;
use kurbo::Point;
use std::cell::RefCell;
use std::rc::Rc;

/// Pointer position relative to the on-screen surface, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerMove {
    pub x: i32,
    pub y: i32,
}

impl PointerMove {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// Hosts that can deliver pointer-move events.
pub trait EventSource {
    /// Register `handler` for every later pointer move over the on-screen
    /// surface. Handlers stay registered for the life of the host.
    fn on_pointer_move(&self, handler: Box<dyn FnMut(PointerMove)>) -> Result<(), HostError>;
}

/// Shared handle to a renderer bound to an event source.
pub type SharedRenderer<H> = Rc<RefCell<Renderer<H>>>;

/// Move `renderer` behind a shared handle and route pointer moves to it.
pub fn attach<H>(host: &H, renderer: Renderer<H>) -> Result<SharedRenderer<H>, HostError>
where
    H: Host + EventSource + 'static,
{
    let shared = Rc::new(RefCell::new(renderer));
    let handle = Rc::clone(&shared);

    host.on_pointer_move(Box::new(move |event| {
        let Ok(mut renderer) = handle.try_borrow_mut() else {
            log::warn!("dropping re-entrant pointer move at ({}, {})", event.x, event.y);
            return;
        };
        // The next event repaints everything, so a failed frame is only logged.
        if let Err(err) = renderer.handle_pointer_move(event) {
            log::error!("frame skipped: {err}");
        }
    }))?;

    Ok(shared)
}

/// Build the renderer, paint and show the background, and start reacting
/// to pointer moves. Returns once the handler is registered; the host's
/// event loop drives everything after that.
pub fn start<H>(host: &H, surface_id: &str, config: SceneConfig) -> Result<SharedRenderer<H>, SetupError>
where
    H: Host + EventSource + 'static,
{
    let mut renderer = Renderer::new(host, surface_id, config)?;
    renderer.paint_background();
    renderer.composite()?;
    Ok(attach(host, renderer)?)
}
