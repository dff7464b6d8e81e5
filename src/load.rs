use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use glam::Vec3;
use itertools::Itertools;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("asset not found: {}", path.display())]
    AssetNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read asset")]
    Io(#[from] io::Error),
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

/// One corner of a face, resolved against the vertex and normal arrays.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Corner {
    /// 0-based index shared by the vertex and normal arrays
    pub index: usize,
    pub position: Vec3,
    pub normal: Vec3,
}

/// A planar polygon with 3 or more corners, tagged with the group it was read in.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub group: usize,
    pub corners: Vec<Corner>,
}

/// Geometry read from a `v`/`n`/`g`/`f` text asset. Immutable once loaded.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
    group_count: usize,
}

impl Mesh {
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of `g` markers seen while parsing
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }
}

#[derive(Debug, Default)]
struct MeshBuilder {
    mesh: Mesh,
    // `None` until the first group marker, faces read before it land in group 0
    current_group: Option<usize>,
}

impl MeshBuilder {
    fn next_group(&mut self) {
        self.current_group = Some(self.current_group.map_or(0, |g| g + 1));
        self.mesh.group_count += 1;
    }

    fn push_vertex(&mut self, vertex: Vec3) {
        self.mesh.vertices.push(vertex);
    }

    fn push_normal(&mut self, normal: Vec3) {
        self.mesh.normals.push(normal);
    }

    /// Resolve 1-based indices against everything read so far and append the face.
    fn push_face(&mut self, indices: &[usize], line: usize) -> Result<(), LoadError> {
        if indices.len() < 3 {
            return Err(malformed(line, format!("face has {} indices", indices.len())));
        }

        let corners = indices
            .iter()
            .map(|&one_based| {
                let index = one_based
                    .checked_sub(1)
                    .ok_or_else(|| malformed(line, "face index 0".into()))?;
                match (self.mesh.vertices.get(index), self.mesh.normals.get(index)) {
                    (Some(&position), Some(&normal)) => Ok(Corner {
                        index,
                        position,
                        normal,
                    }),
                    _ => Err(malformed(
                        line,
                        format!(
                            "face index {one_based} out of range ({} vertices, {} normals)",
                            self.mesh.vertices.len(),
                            self.mesh.normals.len()
                        ),
                    )),
                }
            })
            .collect::<Result<Vec<Corner>, LoadError>>()?;

        self.mesh.faces.push(Face {
            group: self.current_group.unwrap_or(0),
            corners,
        });
        Ok(())
    }
}

fn malformed(line: usize, reason: String) -> LoadError {
    LoadError::MalformedLine { line, reason }
}

/// Open `path` and parse it into a `Mesh`.
///
/// A missing file is reported as `LoadError::AssetNotFound` so the caller can bail out before
/// any rendering starts.
///
/// # Errors
///
/// `LoadError::AssetNotFound` if `path` can't be opened, otherwise the same as [`parse_mesh`].
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::AssetNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loading mesh: {}", path.display());

    let mesh = parse_mesh(BufReader::new(file))?;
    log::info!(
        "Loaded {}: {} vertices, {} normals, {} faces, {} groups",
        path.display(),
        mesh.vertices().len(),
        mesh.normals().len(),
        mesh.faces().len(),
        mesh.group_count()
    );
    Ok(mesh)
}

/// Parse the line-oriented mesh format.
///
/// `v x y z` and `n x y z` append a vertex/normal, a line starting with `g` opens the next group
/// and `f i j k ...` adds a polygon whose 1-based indices address both arrays. Anything else is
/// skipped.
///
/// # Errors
///
/// `LoadError::MalformedLine` for a bad number, a face with fewer than 3 indices or an index
/// that doesn't address a vertex and normal read so far. `LoadError::Io` if reading fails.
pub fn parse_mesh<R: BufRead>(reader: R) -> Result<Mesh, LoadError> {
    let mut builder = MeshBuilder::default();

    for (line_idx, line) in reader.lines().enumerate() {
        parse_line(&line?, line_idx + 1, &mut builder)?;
    }

    Ok(builder.mesh)
}

fn parse_line(line: &str, line_no: usize, builder: &mut MeshBuilder) -> Result<(), LoadError> {
    let line = line.trim();
    if line.starts_with('g') {
        builder.next_group();
        return Ok(());
    }

    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("v") => builder.push_vertex(parse_vec3(tokens, line_no)?),
        Some("n") => builder.push_normal(parse_vec3(tokens, line_no)?),
        Some("f") => builder.push_face(&parse_indices(tokens, line_no)?, line_no)?,
        _ => log::trace!("Ignoring line {}: {:?}", line_no, line),
    }

    Ok(())
}

fn parse_vec3<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, LoadError> {
    let numbers = tokens
        .take(3)
        .map(str::parse::<f32>)
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|e| malformed(line, e.to_string()))?;

    numbers
        .into_iter()
        .collect_tuple()
        .map(|(x, y, z)| Vec3::new(x, y, z))
        .ok_or_else(|| malformed(line, "expected 3 components".into()))
}

fn parse_indices<'a>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Vec<usize>, LoadError> {
    tokens
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|e| malformed(line, format!("face index {token:?}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use glam::Vec3;

    use super::{load_mesh, parse_mesh, LoadError};

    const SQUARE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
n 0 0 1
n 0 0 1
n 0 0 1
n 0.5 0.5 0.5
g body
f 1 2 3 4
g wing
f 1 2 3
f 3 4 1
";

    #[test]
    fn test_counts_and_resolution() -> Result<(), LoadError> {
        let mesh = parse_mesh(Cursor::new(SQUARE))?;

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.normals().len(), 4);
        assert_eq!(mesh.faces().len(), 3);
        assert_eq!(mesh.group_count(), 2);

        for face in mesh.faces() {
            for corner in &face.corners {
                assert_eq!(corner.position, mesh.vertices()[corner.index]);
                assert_eq!(corner.normal, mesh.normals()[corner.index]);
            }
        }

        let quad = &mesh.faces()[0];
        assert_eq!(quad.corners.len(), 4);
        assert_eq!(quad.corners[3].position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(quad.corners[3].normal, Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(quad.group, 0);
        assert_eq!(mesh.faces()[1].group, 1);
        assert_eq!(mesh.faces()[2].group, 1);
        Ok(())
    }

    #[test]
    fn test_single_vertex_repeated() -> Result<(), LoadError> {
        let mesh = parse_mesh(Cursor::new("v 1 2 3\nn 0 1 0\nf 1 1 1\n"))?;

        let face = &mesh.faces()[0];
        assert_eq!(face.corners.len(), 3);
        for corner in &face.corners {
            assert_eq!(corner.position, Vec3::new(1.0, 2.0, 3.0));
            assert_eq!(corner.normal, Vec3::Y);
        }
        Ok(())
    }

    #[test]
    fn test_group_ids_are_zero_based() -> Result<(), LoadError> {
        let mesh = parse_mesh(Cursor::new("v 0 0 0\nn 0 0 1\ng a\ng b\ng c\nf 1 1 1\n"))?;
        assert_eq!(mesh.faces()[0].group, 2);

        let ungrouped = parse_mesh(Cursor::new("v 0 0 0\nn 0 0 1\nf 1 1 1\n"))?;
        assert_eq!(ungrouped.faces()[0].group, 0);
        assert_eq!(ungrouped.group_count(), 0);
        Ok(())
    }

    #[test]
    fn test_unknown_lines_ignored() -> Result<(), LoadError> {
        let mesh = parse_mesh(Cursor::new(
            "# comment\n\nvt 0 0\nusemtl x\nv 0 0 0\nn 0 0 1\nf 1 1 1\n",
        ))?;
        assert_eq!(mesh.vertices().len(), 1);
        assert_eq!(mesh.faces().len(), 1);
        Ok(())
    }

    #[test]
    fn test_bad_indices() {
        for (text, bad_line) in [
            ("v 0 0 0\nn 0 0 1\nf 0 1 1\n", 3),
            ("v 0 0 0\nn 0 0 1\nf 1 1 2\n", 3),
            ("v 0 0 0\nv 1 0 0\nn 0 0 1\nf 1 2 1\n", 4),
            ("v 0 0 0\nn 0 0 1\nf 1 -1 1\n", 3),
            ("v 0 0 0\nn 0 0 1\nf 1 1\n", 3),
            ("v 0 0\n", 1),
            ("n 0 x 1\n", 1),
        ] {
            match parse_mesh(Cursor::new(text)) {
                Err(LoadError::MalformedLine { line, .. }) => assert_eq!(line, bad_line),
                other => panic!("expected malformed line for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_index_must_be_read_before_face() {
        let result = parse_mesh(Cursor::new("f 1 1 1\nv 0 0 0\nn 0 0 1\n"));
        assert!(matches!(result, Err(LoadError::MalformedLine { line: 1, .. })));
    }

    #[test]
    fn test_load_from_path() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(SQUARE.as_bytes())?;

        let mesh = load_mesh(file.path())?;
        assert_eq!(mesh.faces().len(), 3);
        Ok(())
    }

    #[test]
    fn test_bundled_assets() -> Result<(), LoadError> {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let plane = load_mesh(dir.join("cessna.txt"))?;
        assert_eq!(plane.faces().len(), 6);
        assert_eq!(plane.group_count(), 3);
        assert_eq!(plane.faces()[4].corners.len(), 4);

        let propeller = load_mesh(dir.join("propeller.txt"))?;
        assert_eq!(propeller.faces().len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_mesh(dir.path().join("cessna.txt"));
        assert!(matches!(result, Err(LoadError::AssetNotFound { .. })));
    }
}
