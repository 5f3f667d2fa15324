// Display module - host side of the compositor
//
// This module provides:
// - FrameSurface, a software PointRenderer drawing into an RGBA frame
// - A winit + pixels window that drives a Scene and forwards resizes

pub mod surface;
#[cfg(feature = "window")]
pub mod window;

pub use surface::FrameSurface;
#[cfg(feature = "window")]
pub use window::{run_window, GfxWindow, Scene};
