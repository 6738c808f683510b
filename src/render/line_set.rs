use itertools::Itertools;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{
    common::geodesy::{GeodeticPoint, project},
    data::vector_dataset::VectorDataset,
};

use super::{buffer::Buffer, data::LineVertex};

/// A straight line between two geodetic points, `height` above the ellipsoid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: GeodeticPoint,
    pub to: GeodeticPoint,
    pub height: f64,
}

impl Segment {
    pub fn new(from: GeodeticPoint, to: GeodeticPoint, height: f64) -> Self {
        Self { from, to, height }
    }
}

/// Line sets in the order they are drawn.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr,
)]
pub enum LineSetKind {
    Coastlines,
    Countries,
    DebugAxis,
    Graticule,
}

/// One segment per consecutive point pair of every record part.
pub fn dataset_segments(dataset: &VectorDataset) -> impl Iterator<Item = Segment> + '_ {
    dataset
        .records
        .iter()
        .flat_map(|record| record.part_ranges())
        .flat_map(|part| {
            part.iter()
                .tuple_windows()
                .map(|(&from, &to)| Segment::new(from, to, 0.0))
        })
}

/// Pole to pole, lifted off the surface so it stays visible.
pub fn debug_axis_segments() -> impl Iterator<Item = Segment> {
    std::iter::once(Segment::new(
        GeodeticPoint::NORTH_POLE,
        GeodeticPoint::SOUTH_POLE,
        1.0,
    ))
}

/// Spacing of the latitude/longitude grid in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraticuleSteps {
    /// Distance between neighbouring grid lines.
    pub line_step: f64,
    /// Length of the straight pieces each grid line is made of.
    pub subdivision_step: f64,
}

impl Default for GraticuleSteps {
    fn default() -> Self {
        Self {
            line_step: 15.0,
            subdivision_step: 1.0,
        }
    }
}

impl GraticuleSteps {
    pub const MIN_LINE_STEP: f64 = 1.0;
    pub const MIN_SUBDIVISION_STEP: f64 = 0.1;

    /// Raises positive steps below the minimums so the grid stays a bounded
    /// number of segments. Non-positive steps are kept and give an empty grid.
    pub fn floored(self) -> Self {
        let floor = |step: f64, min: f64| {
            if step > 0.0 && step < min {
                log::warn!("Graticule step {step}° is too fine, using {min}°");
                min
            } else {
                step
            }
        };

        Self {
            line_step: floor(self.line_step, Self::MIN_LINE_STEP),
            subdivision_step: floor(self.subdivision_step, Self::MIN_SUBDIVISION_STEP),
        }
    }
}

// Absorbs rounding when a step divides the span exactly.
const STEP_EPSILON: f64 = 1e-9;

// Number of `step`-long pieces needed to cover `span`; the last may be shorter.
fn piece_count(span: f64, step: f64) -> usize {
    if step.is_finite() && step > 0.0 {
        (span / step - STEP_EPSILON).ceil().max(0.0) as usize
    } else {
        0
    }
}

// Position `index` steps after `start`, clipped at `end`.
fn stepped(start: f64, end: f64, step: f64, index: usize) -> f64 {
    (start + step * index as f64).min(end)
}

/// Latitude circles every `line_step` degrees from the south pole, strictly
/// between the poles, and meridians every `line_step` degrees from -180 over
/// [-180, 180). Each line is made of `subdivision_step` long pieces, the last
/// one clipped at the end of the line.
pub fn graticule_segments(steps: GraticuleSteps) -> impl Iterator<Item = Segment> {
    let GraticuleSteps {
        line_step,
        subdivision_step,
    } = steps;
    let latitude_lines = piece_count(180.0, line_step);
    let longitude_lines = piece_count(360.0, line_step);
    let longitude_pieces = piece_count(360.0, subdivision_step);
    let latitude_pieces = piece_count(180.0, subdivision_step);

    let parallels = (1..latitude_lines)
        .cartesian_product(0..longitude_pieces)
        .map(move |(i, j)| {
            let latitude = stepped(-90.0, 90.0, line_step, i);
            Segment::new(
                GeodeticPoint::new(stepped(-180.0, 180.0, subdivision_step, j), latitude),
                GeodeticPoint::new(stepped(-180.0, 180.0, subdivision_step, j + 1), latitude),
                0.0,
            )
        });

    let meridians = (0..longitude_lines)
        .cartesian_product(0..latitude_pieces)
        .map(move |(i, j)| {
            let longitude = stepped(-180.0, 180.0, line_step, i);
            Segment::new(
                GeodeticPoint::new(longitude, stepped(-90.0, 90.0, subdivision_step, j)),
                GeodeticPoint::new(longitude, stepped(-90.0, 90.0, subdivision_step, j + 1)),
                0.0,
            )
        });

    parallels.chain(meridians)
}

/// Projected line list, two vertices per segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineVertices {
    vertices: Vec<LineVertex>,
}

impl LineVertices {
    pub fn build(segments: impl IntoIterator<Item = Segment>) -> Self {
        let vertices = segments
            .into_iter()
            .flat_map(|Segment { from, to, height }| {
                [
                    LineVertex::from_cartesian(project(from, height)),
                    LineVertex::from_cartesian(project(to, height)),
                ]
            })
            .collect();

        Self { vertices }
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        (self.as_bytes().len() as u64 / LineVertex::STRIDE) as u32
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Builds every line set in draw order. The datasets are consumed; only the
/// projected vertices outlive this call.
pub fn build_line_sets(
    coastlines: VectorDataset,
    countries: VectorDataset,
    steps: GraticuleSteps,
) -> Vec<(LineSetKind, LineVertices)> {
    LineSetKind::iter()
        .map(|kind| {
            let vertices = match kind {
                LineSetKind::Coastlines => LineVertices::build(dataset_segments(&coastlines)),
                LineSetKind::Countries => LineVertices::build(dataset_segments(&countries)),
                LineSetKind::DebugAxis => LineVertices::build(debug_axis_segments()),
                LineSetKind::Graticule => LineVertices::build(graticule_segments(steps)),
            };
            log::info!("Built {kind} line set: {} vertices", vertices.vertex_count());
            (kind, vertices)
        })
        .collect()
}

/// Immutable vertex buffer holding one line set.
pub struct LineVertexBuffer {
    kind: LineSetKind,
    buffer: Buffer,
}

impl LineVertexBuffer {
    pub fn upload(device: &wgpu::Device, kind: LineSetKind, vertices: &LineVertices) -> Self {
        let buffer = Buffer::new_init(
            device,
            kind.into(),
            vertices.as_bytes(),
            wgpu::BufferUsages::VERTEX,
        );
        Self { kind, buffer }
    }

    pub fn kind(&self) -> LineSetKind {
        self.kind
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer.raw
    }

    pub fn vertex_count(&self) -> u32 {
        (self.buffer.size() / LineVertex::STRIDE) as u32
    }
}

/// All line buffers, in draw order, for the lifetime of the renderer.
pub struct LineSets {
    buffers: Vec<LineVertexBuffer>,
}

impl LineSets {
    pub fn upload(device: &wgpu::Device, line_sets: &[(LineSetKind, LineVertices)]) -> Self {
        let buffers = line_sets
            .iter()
            .map(|(kind, vertices)| LineVertexBuffer::upload(device, *kind, vertices))
            .collect();
        Self { buffers }
    }

    pub fn get(&self, kind: LineSetKind) -> Option<&LineVertexBuffer> {
        self.buffers.iter().find(|buffer| buffer.kind() == kind)
    }

    pub fn vertex_counts(&self) -> impl Iterator<Item = (LineSetKind, u32)> + '_ {
        self.buffers
            .iter()
            .map(|buffer| (buffer.kind(), buffer.vertex_count()))
    }
}
