use wgpu::util::DeviceExt;

// A GPU buffer that remembers the size of its contents.
pub struct Buffer {
    pub raw: wgpu::Buffer,
    size: u64,
}

impl Buffer {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            raw: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            }),
            size,
        }
    }

    pub fn new_init(
        device: &wgpu::Device,
        label: &'static str,
        data: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            raw: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage,
            }),
            size: data.len() as u64,
        }
    }

    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn write(&self, queue: &wgpu::Queue, offset: wgpu::BufferAddress, data: &[u8]) {
        debug_assert!(offset + data.len() as u64 <= self.size);
        queue.write_buffer(&self.raw, offset, data);
    }
}
