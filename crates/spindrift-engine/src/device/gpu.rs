use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Surface options for the render window.
///
/// The SDF pipeline needs no optional features; the device is created with
/// WebGL2 downlevel limits raised to the adapter's texture resolution.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,
    /// FIFO paces animation to the display refresh rate.
    pub present_mode: wgpu::PresentMode,
    /// Frames the surface may queue ahead; a hint.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            frame_latency: 2,
        }
    }
}

/// Owns the wgpu device, queue and the window surface.
///
/// The surface borrows the window for `'w`; the window runtime keeps both in
/// one self-referencing entry so the window always outlives its `Gpu`.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

/// One acquired surface texture plus the encoder recording into it.
///
/// Submit promptly; holding the texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What the frame loop does after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Out of memory; the app should exit.
    Fatal,
}

impl From<&SurfaceError> for SurfaceErrorAction {
    fn from(err: &SurfaceError) -> Self {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => Self::Reconfigured,
            SurfaceError::OutOfMemory => Self::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => Self::SkipFrame,
        }
    }
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window. Block on it with `pollster`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("spindrift device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let config = surface_config(&surface.get_capabilities(&adapter), &init, size)
            .context("no supported surface formats")?;
        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), surface {:?} {}x{}",
            info.name,
            info.backend,
            config.format,
            config.width,
            config.height,
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    ///
    /// A 0x0 size (minimized window) is recorded but not configured.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            log::debug!("surface resize to zero deferred");
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spindrift frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    ///
    /// Staged `write_buffer` uploads land before the submitted commands run.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Recovers from a failed [`begin_frame`](Self::begin_frame) where
    /// possible and reports what the frame loop should do next.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::from(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                log::debug!("surface {err:?}, reconfiguring");
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
            }
            SurfaceErrorAction::Fatal => log::error!("surface out of memory"),
            SurfaceErrorAction::SkipFrame => {
                log::warn!("surface acquisition failed ({err:?}), skipping frame")
            }
        }
        action
    }
}

/// Surface configuration for a window of `size`, or `None` when the surface
/// offers no formats.
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: PhysicalSize<u32>,
) -> Option<wgpu::SurfaceConfiguration> {
    let format = choose_surface_format(caps, init.prefer_srgb)?;
    // Shader output is premultiplied.
    let alpha_mode = [wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PreMultiplied]
        .into_iter()
        .find(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Some(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: init.present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: init.frame_latency,
    })
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    caps.formats.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            ..Default::default()
        }
    }

    #[test]
    fn prefers_srgb_when_offered() {
        let c = caps(vec![
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_format() {
        let c = caps(vec![wgpu::TextureFormat::Rgba16Float]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Rgba16Float));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&caps(Vec::new()), true), None);
        let size = PhysicalSize::new(800, 600);
        assert!(surface_config(&caps(Vec::new()), &GpuInit::default(), size).is_none());
    }

    #[test]
    fn surface_config_uses_init_and_clamps_size() {
        let mut c = caps(vec![wgpu::TextureFormat::Rgba8UnormSrgb]);
        c.alpha_modes = vec![wgpu::CompositeAlphaMode::Inherit, wgpu::CompositeAlphaMode::Opaque];
        let init = GpuInit {
            present_mode: wgpu::PresentMode::Mailbox,
            frame_latency: 3,
            ..GpuInit::default()
        };

        let config = surface_config(&c, &init, PhysicalSize::new(0, 600)).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!((config.width, config.height), (1, 600));
        assert_eq!(config.present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
        assert_eq!(config.desired_maximum_frame_latency, 3);
    }

    #[test]
    fn alpha_mode_falls_back_to_first_supported() {
        let mut c = caps(vec![wgpu::TextureFormat::Bgra8Unorm]);
        c.alpha_modes = vec![wgpu::CompositeAlphaMode::Inherit];
        let config = surface_config(&c, &GpuInit::default(), PhysicalSize::new(8, 8)).unwrap();
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Inherit);
    }

    #[test]
    fn surface_errors_map_to_actions() {
        use SurfaceErrorAction as A;
        assert_eq!(A::from(&SurfaceError::Lost), A::Reconfigured);
        assert_eq!(A::from(&SurfaceError::Outdated), A::Reconfigured);
        assert_eq!(A::from(&SurfaceError::OutOfMemory), A::Fatal);
        assert_eq!(A::from(&SurfaceError::Timeout), A::SkipFrame);
        assert_eq!(A::from(&SurfaceError::Other), A::SkipFrame);
    }
}