use thiserror::Error;

use crate::data::Size;

use super::texture::Texture;

/// Display parameters sampled once per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportRequest {
    pub logical_width: f64,
    pub logical_height: f64,
    pub device_pixel_ratio: f64,
    pub max_surface_dimension: u32,
}

/// Physical pixel size for a viewport, uniformly scaled down so that neither
/// side exceeds the device maximum. Degenerate input gives a zero size.
pub fn clamp_physical_size(request: &ViewportRequest) -> Size<u32> {
    let raw_width = request.logical_width * request.device_pixel_ratio;
    let raw_height = request.logical_height * request.device_pixel_ratio;

    if !(raw_width > 0.0 && raw_height > 0.0) {
        return Size {
            width: 0,
            height: 0,
        };
    }

    let max = request.max_surface_dimension as f64;
    let scale = 1.0f64.min(max / raw_width).min(max / raw_height);

    Size {
        width: (scale * raw_width).round() as u32,
        height: (scale * raw_height).round() as u32,
    }
}

/// Whether the viewport is larger than the device allows, so the targets no
/// longer match the window.
pub fn exceeds_device_limit(request: &ViewportRequest) -> bool {
    let max = request.max_surface_dimension as f64;
    request.logical_width * request.device_pixel_ratio > max
        || request.logical_height * request.device_pixel_ratio > max
}

/// Creates and frees the size-dependent render targets.
pub trait TargetAllocator {
    type Targets;
    type Error;

    fn allocate(&mut self, size: Size<u32>) -> Result<Self::Targets, Self::Error>;

    fn release(&mut self, targets: Self::Targets);
}

pub struct SurfaceState<T> {
    pub size: Size<u32>,
    pub targets: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceChange {
    /// Zero-sized viewport, nothing to render into yet.
    Deferred,
    Unchanged,
    Reallocated(Size<u32>),
}

/// Keeps the render targets in step with the viewport, reallocating only when
/// the physical size changes.
pub struct SurfaceManager<A: TargetAllocator> {
    allocator: A,
    state: Option<SurfaceState<A::Targets>>,
    clamped: bool,
}

impl<A: TargetAllocator> SurfaceManager<A> {
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            state: None,
            clamped: false,
        }
    }

    pub fn state(&self) -> Option<&SurfaceState<A::Targets>> {
        self.state.as_ref()
    }

    pub fn size(&self) -> Option<Size<u32>> {
        self.state.as_ref().map(|state| state.size)
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Whether the current targets were scaled down to fit the device limit.
    pub fn is_clamped(&self) -> bool {
        self.clamped
    }

    pub fn reconcile(&mut self, request: ViewportRequest) -> Result<SurfaceChange, A::Error> {
        let size = clamp_physical_size(&request);

        if size.width == 0 || size.height == 0 {
            log::trace!("Viewport not ready: {request:?}");
            return Ok(SurfaceChange::Deferred);
        }

        let clamped = exceeds_device_limit(&request);
        if clamped && !self.clamped {
            log::warn!(
                "Viewport {}x{} at scale {} exceeds the device limit of {}, rendering at {}x{}",
                request.logical_width,
                request.logical_height,
                request.device_pixel_ratio,
                request.max_surface_dimension,
                size.width,
                size.height
            );
        }
        self.clamped = clamped;

        if self.size() == Some(size) {
            return Ok(SurfaceChange::Unchanged);
        }

        // The old targets go before the new ones are created, even if creation fails.
        if let Some(old) = self.state.take() {
            self.allocator.release(old.targets);
        }

        let targets = self.allocator.allocate(size)?;
        log::debug!("Allocated render targets: {}x{}", size.width, size.height);
        self.state = Some(SurfaceState { size, targets });

        Ok(SurfaceChange::Reallocated(size))
    }
}

impl<A: TargetAllocator> Drop for SurfaceManager<A> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            self.allocator.release(state.targets);
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TargetError {
    #[error("Render target {width}x{height} exceeds the device limit of {limit}")]
    ExceedsDeviceLimit { width: u32, height: u32, limit: u32 },
}

pub struct RenderTargets {
    /// Absent when rendering without multisampling.
    pub color: Option<Texture>,
    pub depth: Texture,
}

pub struct WgpuTargetAllocator {
    device: wgpu::Device,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl WgpuTargetAllocator {
    pub fn new(device: wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Self {
        Self {
            device,
            format,
            sample_count,
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn max_surface_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

impl TargetAllocator for WgpuTargetAllocator {
    type Targets = RenderTargets;
    type Error = TargetError;

    fn allocate(&mut self, size: Size<u32>) -> Result<RenderTargets, TargetError> {
        let limit = self.max_surface_dimension();
        if size.width > limit || size.height > limit {
            return Err(TargetError::ExceedsDeviceLimit {
                width: size.width,
                height: size.height,
                limit,
            });
        }

        let color = (self.sample_count > 1).then(|| {
            Texture::create_multisampled_texture(
                &self.device,
                self.format,
                size,
                self.sample_count,
                "multisampled_color_texture",
            )
        });
        let depth =
            Texture::create_depth_texture(&self.device, size, self.sample_count, "depth_texture");

        Ok(RenderTargets { color, depth })
    }

    fn release(&mut self, targets: RenderTargets) {
        if let Some(color) = targets.color {
            color.destroy();
        }
        targets.depth.destroy();
    }
}
