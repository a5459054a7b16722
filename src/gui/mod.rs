//! GUI module - Chart windows and display surfaces

mod chart_window;
mod surface;

pub use chart_window::ChartWindow;
pub use surface::{ChartSurface, HeadlessSurface, WindowSurface};
