//! Crisp Lines: pixel-exact strokes on fractional-DPR displays.
//!
//! Two off-screen layers are drawn at device resolution (a static
//! background and a per-event foreground) and composited onto the visible
//! surface with `copy` followed by `lighter`, so the foreground never needs
//! per-pixel transparency and the background is never redrawn.

pub mod align;
pub mod config;
pub mod error;
pub mod events;
pub mod renderer;
pub mod surface;

pub use align::{ScaleFactor, aligned_segment, draw_aligned_line, nudge};
pub use config::{Color, SceneConfig};
pub use error::{ConfigError, HostError, SetupError};
pub use events::{EventSource, PointerMove, SharedRenderer, attach, start};
pub use renderer::Renderer;
pub use surface::{CompositeMode, DrawingContext, Host, Surface};

// Re-export kurbo geometry so hosts don't need a direct dependency
pub use kurbo;
