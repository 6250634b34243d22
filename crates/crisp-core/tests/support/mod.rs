//! A host that records every drawing call instead of rasterizing.

#![allow(dead_code)]

use crisp_core::kurbo::Affine;
use crisp_core::{
    Color, CompositeMode, DrawingContext, EventSource, Host, HostError, PointerMove, Surface,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Id of the on-screen surface. Created layers count up from 1.
pub const SCREEN: usize = 0;
pub const SCREEN_ID: &str = "myCanvas";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSize { surface: usize, width: u32, height: u32 },
    Context { surface: usize, opaque: bool },
    StrokeColor(usize, Color),
    FillColor(usize, Color),
    LineWidth(usize, f64),
    BeginPath(usize),
    MoveTo(usize, f64, f64),
    LineTo(usize, f64, f64),
    Stroke(usize),
    FillRect(usize, f64, f64, f64, f64),
    Transform(usize, [f64; 6]),
    Composite(usize, CompositeMode),
    DrawImage { target: usize, source: usize, x: f64, y: f64 },
}

type Log = Rc<RefCell<Vec<Call>>>;

pub struct RecordingHost {
    scale: f64,
    screen_size: Rc<Cell<(u32, u32)>>,
    next_surface: Cell<usize>,
    log: Log,
    handlers: RefCell<Vec<Box<dyn FnMut(PointerMove)>>>,
}

impl RecordingHost {
    pub fn new(scale: f64, width: u32, height: u32) -> Self {
        Self {
            scale,
            screen_size: Rc::new(Cell::new((width, height))),
            next_surface: Cell::new(SCREEN + 1),
            log: Rc::default(),
            handlers: RefCell::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn dispatch(&self, event: PointerMove) {
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler(event);
        }
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl Host for RecordingHost {
    type Surface = RecordingSurface;
    type Context = RecordingContext;

    fn surface_by_id(&self, id: &str) -> Option<RecordingSurface> {
        (id == SCREEN_ID).then(|| RecordingSurface {
            id: SCREEN,
            size: Rc::clone(&self.screen_size),
            log: Rc::clone(&self.log),
        })
    }

    fn create_surface(&self) -> Result<RecordingSurface, HostError> {
        let id = self.next_surface.get();
        self.next_surface.set(id + 1);
        Ok(RecordingSurface {
            id,
            size: Rc::new(Cell::new((300, 150))),
            log: Rc::clone(&self.log),
        })
    }

    fn device_scale_factor(&self) -> f64 {
        self.scale
    }
}

impl EventSource for RecordingHost {
    fn on_pointer_move(&self, handler: Box<dyn FnMut(PointerMove)>) -> Result<(), HostError> {
        self.handlers.borrow_mut().push(handler);
        Ok(())
    }
}

#[derive(Clone)]
pub struct RecordingSurface {
    pub id: usize,
    size: Rc<Cell<(u32, u32)>>,
    log: Log,
}

impl Surface for RecordingSurface {
    type Context = RecordingContext;

    fn size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn set_size(&self, width: u32, height: u32) -> Result<(), HostError> {
        self.size.set((width, height));
        self.log.borrow_mut().push(Call::SetSize {
            surface: self.id,
            width,
            height,
        });
        Ok(())
    }

    fn context(&self, opaque: bool) -> Result<RecordingContext, HostError> {
        self.log.borrow_mut().push(Call::Context {
            surface: self.id,
            opaque,
        });
        Ok(RecordingContext {
            surface: self.id,
            log: Rc::clone(&self.log),
        })
    }
}

pub struct RecordingContext {
    surface: usize,
    log: Log,
}

impl RecordingContext {
    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl DrawingContext for RecordingContext {
    type Surface = RecordingSurface;

    fn set_stroke_color(&mut self, color: Color) {
        self.record(Call::StrokeColor(self.surface, color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.record(Call::FillColor(self.surface, color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.record(Call::LineWidth(self.surface, width));
    }

    fn begin_path(&mut self) {
        self.record(Call::BeginPath(self.surface));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(Call::MoveTo(self.surface, x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(Call::LineTo(self.surface, x, y));
    }

    fn stroke(&mut self) {
        self.record(Call::Stroke(self.surface));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::FillRect(self.surface, x, y, width, height));
    }

    fn set_transform(&mut self, transform: Affine) -> Result<(), HostError> {
        self.record(Call::Transform(self.surface, transform.as_coeffs()));
        Ok(())
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) -> Result<(), HostError> {
        self.record(Call::Composite(self.surface, mode));
        Ok(())
    }

    fn draw_image(&mut self, source: &RecordingSurface, x: f64, y: f64) -> Result<(), HostError> {
        self.record(Call::DrawImage {
            target: self.surface,
            source: source.id,
            x,
            y,
        });
        Ok(())
    }
}
