pub mod buffer;
pub mod data;
pub mod frame;
pub mod line_set;
pub mod pipeline;
pub mod render_engine;
pub mod surface;
pub mod texture;
