//! 3D structure preview.
//!
//! Records are laid out as cubes on a growing spiral, projected through the
//! orbit camera into the visualization viewport and painted back to front.
//! Every face polygon is clipped to the viewport so nothing spills into the
//! neighbouring 2D panels.

use glam::Vec3;
use vello::kurbo::{Point, Rect};
use vello::peniko::Color;

use crate::camera::{OrbitCamera, project_ndc};
use crate::config::SceneConfig;
use crate::draw::{Painter, brighten, clip_polygon, shade};
use crate::record::{FileKind, RecordStore};

const SELECTED_BOOST: f32 = 0.3;
const AMBIENT: f32 = 0.2;
const DIFFUSE: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct CubeInstance {
    pub center: Vec3,
    pub size: f32,
    pub color: Color,
    pub selected: bool,
}

/// Place up to `max_cubes` records on the spiral.
pub fn cube_layout(store: &RecordStore, selected: usize, scene: &SceneConfig) -> Vec<CubeInstance> {
    store
        .iter()
        .take(scene.max_cubes)
        .enumerate()
        .map(|(i, record)| {
            let angle = i as f32 * scene.spiral_angle;
            let radius = scene.spiral_base + i as f32 * scene.spiral_step;
            let kind = if record.is_deleted { FileKind::Deleted } else { record.kind };
            let base = kind.style().color;
            CubeInstance {
                center: Vec3::new(
                    radius * angle.cos(),
                    record.depth as f32 * scene.depth_offset,
                    radius * angle.sin(),
                ),
                size: ((record.size_bytes as f64 + 1.0).log10() as f32) * scene.cube_scale,
                color: if i == selected { brighten(base, SELECTED_BOOST) } else { base },
                selected: i == selected,
            }
        })
        .collect()
}

// Unit cube faces: outward normal plus corners wound counter-clockwise
// when seen from outside.
const FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::Z,
        [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
        ],
    ),
    (
        Vec3::X,
        [
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ],
    ),
];

struct Face {
    depth: f32,
    corners: [Vec3; 4],
    color: Color,
}

/// Paint `cubes` into `viewport` as seen from `camera`.
pub fn render_cubes(
    painter: &mut dyn Painter,
    viewport: Rect,
    camera: &OrbitCamera,
    fov_deg: f32,
    cubes: &[CubeInstance],
) {
    if viewport.width() <= 0.0 || viewport.height() <= 0.0 {
        return;
    }
    let aspect = (viewport.width() / viewport.height()) as f32;
    let view_proj = camera.view_proj(fov_deg, aspect);
    let eye = camera.eye_position();
    let light = Vec3::ONE.normalize();

    let mut faces: Vec<Face> = Vec::with_capacity(cubes.len() * 3);
    for cube in cubes {
        for (normal, corners) in &FACES {
            let world = corners.map(|c| cube.center + c * cube.size);
            let face_center = cube.center + *normal * (cube.size * 0.5);
            if normal.dot(eye - face_center) <= 0.0 {
                continue;
            }
            let intensity = AMBIENT + DIFFUSE * normal.dot(light).max(0.0);
            faces.push(Face {
                depth: eye.distance_squared(face_center),
                corners: world,
                color: shade(cube.color, intensity),
            });
        }
    }
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    for face in &faces {
        let projected: Option<Vec<Point>> = face
            .corners
            .iter()
            .map(|c| project_ndc(&view_proj, *c).map(|ndc| to_viewport(viewport, ndc)))
            .collect();
        let Some(points) = projected else { continue };
        let clipped = clip_polygon(&points, viewport);
        if !clipped.is_empty() {
            painter.fill_polygon(&clipped, face.color);
        }
    }
}

fn to_viewport(viewport: Rect, ndc: Vec3) -> Point {
    Point::new(
        viewport.x0 + (ndc.x as f64 + 1.0) * 0.5 * viewport.width(),
        viewport.y0 + (1.0 - ndc.y as f64) * 0.5 * viewport.height(),
    )
}
