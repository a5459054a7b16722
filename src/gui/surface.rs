//! Chart display surfaces.

use crate::charts::{Chart, StaticChartRenderer};
use crate::error::Result;
use crate::gui::ChartWindow;
use tracing::{debug, info};

/// Somewhere a chart can be shown.
///
/// `present` returns only once the chart's surface has been closed, so two
/// charts never share a surface.
pub trait ChartSurface {
    fn present(&mut self, chart: &Chart) -> Result<()>;
}

/// One native window per chart.
pub struct WindowSurface {
    size: (u32, u32),
}

impl WindowSurface {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }
}

impl ChartSurface for WindowSurface {
    fn present(&mut self, chart: &Chart) -> Result<()> {
        let frame = StaticChartRenderer::render(chart, self.size)?;
        info!("Showing chart: {}", chart.title());
        ChartWindow::show_blocking(chart.title(), &frame)
    }
}

/// Renders each chart into memory and drops the frame.
#[derive(Debug)]
pub struct HeadlessSurface {
    size: (u32, u32),
    rendered: usize,
}

impl HeadlessSurface {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size, rendered: 0 }
    }

    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

impl ChartSurface for HeadlessSurface {
    fn present(&mut self, chart: &Chart) -> Result<()> {
        let frame = StaticChartRenderer::render(chart, self.size)?;
        debug!(
            "Rendered '{}' ({}x{}) without a display",
            chart.title(),
            frame.width(),
            frame.height()
        );
        self.rendered += 1;
        Ok(())
    }
}
