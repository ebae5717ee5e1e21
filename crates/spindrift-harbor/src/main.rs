//! Harbour demo: a boat circling a harbour, drawn by the SDF batch renderer.
//!
//! `Esc` quits. Set `RUST_LOG=spindrift_engine=debug` to watch slot growth.

mod scene;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use spindrift_engine::core::{App, AppControl, FrameCtx};
use spindrift_engine::device::GpuInit;
use spindrift_engine::logging::{init_logging, LoggingConfig};
use spindrift_engine::paint::Color;
use spindrift_engine::render::{BatchError, BatchRenderer, FrameStats, SdfRenderer};
use spindrift_engine::window::{Runtime, RuntimeConfig};

use scene::Harbor;

const CLEAR: Color = Color::new(0.05, 0.12, 0.2, 1.0);
const STATS_INTERVAL: f64 = 5.0;

struct HarborApp {
    harbor: Harbor,
    sdf: SdfRenderer,
    batch: BatchRenderer,
    next_report: f64,
}

impl HarborApp {
    fn new() -> Result<Self> {
        let batch = BatchRenderer::new(SdfRenderer::batch_config())
            .context("invalid batch configuration")?;
        Ok(Self {
            harbor: Harbor::new(),
            sdf: SdfRenderer::new(),
            batch,
            next_report: STATS_INTERVAL,
        })
    }
}

impl App for HarborApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();
        self.harbor.update(ctx.time.dt, ctx.time.elapsed_f32(), viewport);

        let (harbor, sdf, batch) = (&mut self.harbor, &mut self.sdf, &mut self.batch);
        let mut outcome: Result<FrameStats, BatchError> = Ok(FrameStats::default());

        let control = ctx.render(CLEAR, |rctx, target| {
            let mut backend = sdf.backend(rctx, target);
            let mut pass = batch.begin(&mut backend);
            let drawn = harbor.draw(&mut pass);
            let stats = pass.finish();
            outcome = drawn.map(|()| stats);
        });

        match outcome {
            Ok(stats) if ctx.time.elapsed >= self.next_report => {
                self.next_report = ctx.time.elapsed + STATS_INTERVAL;
                log::info!(
                    "frame {}: {} draw call(s), {} vertices (batch holds {}), {} geometry slot(s)",
                    ctx.time.frame_index,
                    stats.flushes,
                    stats.vertices,
                    self.batch.capacity(),
                    self.batch.geometry_slots(),
                );
            }
            Ok(_) => {}
            Err(err) => log::error!("harbour draw failed: {err}"),
        }

        control
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let app = HarborApp::new()?;
    let config = RuntimeConfig {
        title: "spindrift harbour".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), app)
}
