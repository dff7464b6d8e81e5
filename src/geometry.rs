use std::f32::consts::TAU;

use glam::Vec3;
use glium::{implement_vertex, index::PrimitiveType};
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::{
    load::Mesh,
    settings::{MaterialBands, Rgba},
};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}
implement_vertex!(ColoredVertex, position, normal, color);

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}
implement_vertex!(TexturedVertex, position, normal, tex_coords);

/// CPU side geometry, ready to be uploaded by `buffer::GpuShape`
#[derive(Clone, Debug)]
pub struct Shape<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
    pub primitive: PrimitiveType,
}

impl<V> Shape<V> {
    fn triangles() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            primitive: PrimitiveType::TrianglesList,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_index(&self) -> u32 {
        // meshes past u32::MAX vertices don't fit an index buffer anyway
        self.vertices.len() as u32
    }

    /// Append a convex polygon as a triangle fan around its first corner.
    fn push_fan(&mut self, corners: impl IntoIterator<Item = V>) {
        let first = self.next_index();
        self.vertices.extend(corners);
        let last = self.next_index();
        for i in first + 2..last {
            self.indices.extend([first, i - 1, i]);
        }
    }
}

/// Triangulate every face of `mesh`, colouring each by the band its group falls in.
///
/// Corners that reuse a mesh index within one group share a vertex. Across groups they are
/// duplicated, since each group can carry a different colour.
#[must_use]
pub fn mesh_shape(mesh: &Mesh, bands: &MaterialBands) -> Shape<ColoredVertex> {
    let mut shape = Shape::triangles();
    let mut shared = FxHashMap::<(usize, usize), u32>::default();
    for face in mesh.faces() {
        let color = bands.color_for(face.group);
        let ids = face
            .corners
            .iter()
            .map(|corner| {
                *shared.entry((corner.index, face.group)).or_insert_with(|| {
                    let id = shape.next_index();
                    shape.vertices.push(ColoredVertex {
                        position: corner.position.into(),
                        normal: corner.normal.into(),
                        color,
                    });
                    id
                })
            })
            .collect::<Vec<u32>>();
        if let Some((&first, rest)) = ids.split_first() {
            for (&b, &c) in rest.iter().tuple_windows() {
                shape.indices.extend([first, b, c]);
            }
        }
    }
    shape
}

/// `size` x `size` unit squares on the y = 0 plane, centred on the origin
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid(size: u32, color: Rgba) -> Shape<ColoredVertex> {
    let mut shape = Shape::triangles();
    let half = size as f32 / 2.0;
    for (i, j) in (0..size).cartesian_product(0..size) {
        let (x, z) = (i as f32 - half, j as f32 - half);
        shape.push_fan(
            [[x, z], [x, z + 1.0], [x + 1.0, z + 1.0], [x + 1.0, z]].map(|[x, z]| {
                ColoredVertex {
                    position: [x, 0.0, z],
                    normal: [0.0, 1.0, 0.0],
                    color,
                }
            }),
        );
    }
    shape
}

/// Red, green and blue lines along +x, +y and +z
#[must_use]
pub fn axes(length: f32) -> Shape<ColoredVertex> {
    let vertices = [
        (Vec3::X, [1.0, 0.0, 0.0, 1.0]),
        (Vec3::Y, [0.0, 1.0, 0.0, 1.0]),
        (Vec3::Z, [0.0, 0.0, 1.0, 1.0]),
    ]
    .into_iter()
    .flat_map(|(axis, color)| {
        [Vec3::ZERO, axis * length].map(|p| ColoredVertex {
            position: p.into(),
            normal: [0.0, 1.0, 0.0],
            color,
        })
    })
    .collect::<Vec<_>>();

    #[allow(clippy::cast_possible_truncation)]
    let count = vertices.len() as u32;
    Shape {
        indices: (0..count).collect(),
        vertices,
        primitive: PrimitiveType::LinesList,
    }
}

#[allow(clippy::cast_precision_loss)]
fn ring(segments: u32) -> impl Iterator<Item = (f32, f32, f32)> {
    (0..=segments).map(move |i| {
        let t = i as f32 / segments as f32;
        let (sin, cos) = (t * TAU).sin_cos();
        (t, sin, cos)
    })
}

/// Flat disk on y = 0 facing up, the texture tiles `repeat` times across it
#[must_use]
pub fn disk(radius: f32, segments: u32, repeat: f32) -> Shape<TexturedVertex> {
    let mut shape = Shape::triangles();
    shape.push_fan(
        std::iter::once((0.0, 0.0)).chain(ring(segments).map(|(_, s, c)| (c, s))).map(
            |(c, s)| TexturedVertex {
                position: [c * radius, 0.0, -s * radius],
                normal: [0.0, 1.0, 0.0],
                tex_coords: [(c + 1.0) / 2.0 * repeat, (s + 1.0) / 2.0 * repeat],
            },
        ),
    );
    shape
}

/// Open cylinder standing on y = 0, normals facing in so it can be seen from inside
#[must_use]
pub fn cylinder(radius: f32, height: f32, segments: u32) -> Shape<TexturedVertex> {
    let mut shape = Shape::triangles();
    for ((t0, s0, c0), (t1, s1, c1)) in ring(segments).tuple_windows() {
        let quad = [
            (t0, s0, c0, 0.0),
            (t1, s1, c1, 0.0),
            (t1, s1, c1, 1.0),
            (t0, s0, c0, 1.0),
        ];
        shape.push_fan(quad.map(|(t, s, c, v)| TexturedVertex {
            position: [c * radius, v * height, s * radius],
            normal: [-c, 0.0, -s],
            tex_coords: [t, v],
        }));
    }
    shape
}

/// Cone with a unit base radius and unit height, apex on +y
#[must_use]
pub fn cone(segments: u32) -> Shape<TexturedVertex> {
    let mut shape = Shape::triangles();
    let slant = Vec3::new(1.0, 1.0, 0.0).normalize();
    for ((t0, s0, c0), (t1, s1, c1)) in ring(segments).tuple_windows() {
        let normal = |s: f32, c: f32| [c * slant.x, slant.y, s * slant.x];
        shape.push_fan([
            TexturedVertex {
                position: [c0, 0.0, s0],
                normal: normal(s0, c0),
                tex_coords: [t0, 0.0],
            },
            TexturedVertex {
                position: [0.0, 1.0, 0.0],
                normal: normal((s0 + s1) / 2.0, (c0 + c1) / 2.0),
                tex_coords: [(t0 + t1) / 2.0, 1.0],
            },
            TexturedVertex {
                position: [c1, 0.0, s1],
                normal: normal(s1, c1),
                tex_coords: [t1, 0.0],
            },
        ]);
    }
    shape
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        load::parse_mesh,
        settings::{MaterialBands, BLACK, YELLOW},
    };

    #[test]
    fn test_mesh_fan_triangulation() -> Result<(), crate::load::LoadError> {
        let mesh = parse_mesh(Cursor::new(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 2 0\n\
             n 0 0 1\nn 0 0 1\nn 0 0 1\nn 0 0 1\nn 0 0 1\n\
             g a\nf 1 2 3 4 5\ng b\ng c\ng d\ng e\nf 1 2 3\n",
        ))?;
        let shape = mesh_shape(&mesh, &MaterialBands::plane());

        assert_eq!(shape.vertices.len(), 8);
        assert_eq!(shape.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 5, 6, 7]);
        assert_eq!(shape.vertices[4].position, [0.0, 2.0, 0.0]);
        assert!(shape.vertices[..5].iter().all(|v| v.color == YELLOW));
        assert!(shape.vertices[5..].iter().all(|v| v.color == BLACK));
        Ok(())
    }

    #[test]
    fn test_mesh_shares_corners_within_group() -> Result<(), crate::load::LoadError> {
        let mesh = parse_mesh(Cursor::new(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             n 0 0 1\nn 0 0 1\nn 0 0 1\nn 0 0 1\n\
             g a\nf 1 2 3\nf 1 3 4\ng b\ng c\ng d\ng e\nf 1 3 4\n",
        ))?;
        let shape = mesh_shape(&mesh, &MaterialBands::plane());

        assert_eq!(shape.vertices.len(), 4 + 3);
        assert_eq!(shape.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6]);
        assert_eq!(shape.vertices[3].position, [0.0, 1.0, 0.0]);
        assert_eq!(shape.vertices[4].position, shape.vertices[0].position);
        assert_eq!(shape.vertices[4].color, BLACK);
        Ok(())
    }

    #[test]
    fn test_grid() {
        let shape = grid(4, YELLOW);
        assert_eq!(shape.vertices.len(), 4 * 4 * 4);
        assert_eq!(shape.indices.len(), 4 * 4 * 6);
        assert!(shape
            .vertices
            .iter()
            .all(|v| v.position[1] == 0.0 && (-2.0..=2.0).contains(&v.position[0])));
    }

    #[test]
    fn test_axes() {
        let shape = axes(2.0);
        assert_eq!(shape.primitive, PrimitiveType::LinesList);
        assert_eq!(shape.indices.len(), 6);
        assert_eq!(shape.vertices[3].position, [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_disk_and_cylinder() {
        let disk = disk(10.0, 8, 4.0);
        assert_eq!(disk.vertices.len(), 10);
        assert_eq!(disk.indices.len(), 8 * 3);
        assert_eq!(disk.vertices[0].position, [0.0, 0.0, 0.0]);

        let cylinder = cylinder(10.0, 5.0, 8);
        assert_eq!(cylinder.vertices.len(), 8 * 4);
        assert_eq!(cylinder.indices.len(), 8 * 6);
        for v in &cylinder.vertices {
            let r = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((r - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cone() {
        let shape = cone(16);
        assert_eq!(shape.indices.len(), 16 * 3);
        assert!(shape
            .vertices
            .iter()
            .all(|v| v.position[1] == 0.0 || v.position == [0.0, 1.0, 0.0]));
    }
}
