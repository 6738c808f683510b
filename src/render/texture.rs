use wgpu::TextureView;

use crate::data::Size;

pub struct Texture {
    texture: wgpu::Texture,
    view: TextureView,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn get_view(&self) -> &TextureView {
        &self.view
    }

    fn create(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size<u32>,
        sample_count: u32,
        label: &str,
    ) -> Self {
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Multisampled color target that gets resolved into the surface texture.
    pub fn create_multisampled_texture(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size<u32>,
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create(device, format, size, sample_count, label)
    }

    pub fn create_depth_texture(
        device: &wgpu::Device,
        size: Size<u32>,
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create(device, Self::DEPTH_FORMAT, size, sample_count, label)
    }

    /// Frees the GPU memory right away instead of waiting for the last handle to drop.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}
