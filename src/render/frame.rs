use crate::data::{Size, camera::GlobeCamera};

use super::{data::TransformState, line_set::LineSetKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub kind: LineSetKind,
    pub vertex_count: u32,
}

/// Everything one frame needs: the uniforms to upload and the draws to issue,
/// in order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub transforms: TransformState,
    pub draws: Vec<DrawCommand>,
}

pub fn plan_frame(
    elapsed: f64,
    surface_size: Size<u32>,
    camera: &GlobeCamera,
    line_sets: impl IntoIterator<Item = (LineSetKind, u32)>,
) -> FramePlan {
    let transforms = camera.transform_state(elapsed, surface_size.aspect_ratio());
    let draws = line_sets
        .into_iter()
        .filter(|(_, vertex_count)| *vertex_count > 0)
        .map(|(kind, vertex_count)| DrawCommand { kind, vertex_count })
        .collect();

    FramePlan { transforms, draws }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn draws_follow_line_set_order() {
        let camera = GlobeCamera::default();
        let counts = LineSetKind::iter().zip([10, 20, 2, 30]);

        let plan = plan_frame(0.0, (800, 600).into(), &camera, counts);

        assert_eq!(
            plan.draws,
            vec![
                DrawCommand {
                    kind: LineSetKind::Coastlines,
                    vertex_count: 10
                },
                DrawCommand {
                    kind: LineSetKind::Countries,
                    vertex_count: 20
                },
                DrawCommand {
                    kind: LineSetKind::DebugAxis,
                    vertex_count: 2
                },
                DrawCommand {
                    kind: LineSetKind::Graticule,
                    vertex_count: 30
                },
            ]
        );
    }

    #[test]
    fn empty_line_sets_are_skipped() {
        let camera = GlobeCamera::default();
        let counts = LineSetKind::iter().zip([0, 4, 2, 0]);

        let plan = plan_frame(1.0, (100, 100).into(), &camera, counts);

        let kinds = plan.draws.iter().map(|draw| draw.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![LineSetKind::Countries, LineSetKind::DebugAxis]);
    }

    #[test]
    fn transforms_use_surface_aspect() {
        let camera = GlobeCamera::default();
        let plan = plan_frame(3.0, (1600, 800).into(), &camera, std::iter::empty());

        assert_eq!(plan.transforms, camera.transform_state(3.0, 2.0));
        assert_abs_diff_eq!(
            plan.transforms.projection.x_axis.x * 2.0,
            plan.transforms.projection.y_axis.y,
            epsilon = 1e-4
        );
        assert!(plan.draws.is_empty());
    }
}
