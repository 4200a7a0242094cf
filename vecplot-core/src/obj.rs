/// Wavefront OBJ parser producing a single merged triangle mesh
use std::fs;
use std::path::Path;

use log::{debug, info};
use nalgebra::Point3;
use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::{Face, GeometryError, Mesh};

/// Errors raised while loading an OBJ mesh
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ file: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ data is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: face index {index} does not refer to a vertex ({vertex_count} defined)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },

    #[error("OBJ data contains no vertices")]
    Empty,

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// One meaningful statement of an OBJ file
#[derive(Debug, PartialEq)]
enum Statement {
    Vertex(Point3<f64>),
    Face(Vec<i64>),
    Ignored,
}

/// Parse OBJ bytes as uploaded, checking the encoding first
pub fn parse_obj_bytes(data: &[u8]) -> Result<Mesh, ObjError> {
    parse_obj(std::str::from_utf8(data)?)
}

/// Load an OBJ file from disk
pub fn load_obj_file<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let mesh = parse_obj_bytes(&data)?;
    info!(
        "Loaded {} ({} vertices, {} faces)",
        path.display(),
        mesh.vertices().len(),
        mesh.faces().len()
    );
    Ok(mesh)
}

/// Parse OBJ text into a single mesh.
///
/// All objects and groups are merged. Polygons are fan triangulated, and
/// statements other than `v` and `f` are skipped.
pub fn parse_obj(input: &str) -> Result<Mesh, ObjError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();
    let mut ignored = 0usize;

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        match parse_statement(content, line)? {
            Statement::Vertex(position) => {
                if !position.coords.iter().all(|c| c.is_finite()) {
                    return Err(ObjError::Syntax {
                        line,
                        message: "non-finite coordinate".to_string(),
                    });
                }
                vertices.push(position);
            }
            Statement::Face(refs) => {
                if refs.len() < 3 {
                    return Err(ObjError::Syntax {
                        line,
                        message: format!("face needs at least 3 vertices, found {}", refs.len()),
                    });
                }
                let indices = refs
                    .iter()
                    .map(|&r| resolve_index(r, vertices.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;
                for i in 1..indices.len() - 1 {
                    faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
            Statement::Ignored => ignored += 1,
        }
    }

    if vertices.is_empty() {
        return Err(ObjError::Empty);
    }
    debug!(
        "Parsed OBJ: {} vertices, {} triangles, {} statements ignored",
        vertices.len(),
        faces.len(),
        ignored
    );

    Ok(Mesh::new(vertices, faces)?)
}

/// Turn a 1-based or negative (relative) OBJ index into a 0-based one.
/// Only vertices defined before the face can be referenced.
fn resolve_index(index: i64, defined: usize, line: usize) -> Result<usize, ObjError> {
    let resolved = if index > 0 {
        Some(index - 1)
    } else if index < 0 {
        Some(defined as i64 + index)
    } else {
        None
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < defined => Ok(i as usize),
        _ => Err(ObjError::IndexOutOfRange {
            line,
            index,
            vertex_count: defined,
        }),
    }
}

fn parse_statement(content: &str, line: usize) -> Result<Statement, ObjError> {
    let (rest, keyword) = keyword(content).map_err(|e| ObjError::Syntax {
        line,
        message: e.to_string(),
    })?;

    let parsed = match keyword {
        "v" => all_consuming(vertex_body)(rest).map(|(_, p)| Statement::Vertex(p)),
        "f" => all_consuming(face_body)(rest).map(|(_, refs)| Statement::Face(refs)),
        _ => return Ok(Statement::Ignored),
    };

    parsed.map_err(|e| ObjError::Syntax {
        line,
        message: format!("invalid '{}' statement: {}", keyword, e),
    })
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// `x y z [w]`, where the optional weight is ignored
fn vertex_body(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, (x, y, z)) = tuple((
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    ))(input)?;
    let (input, _w) = opt(preceded(space1, double))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Whitespace separated vertex references
fn face_body(input: &str) -> IResult<&str, Vec<i64>> {
    delimited(space1, separated_list1(space1, face_ref), space0)(input)
}

fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

/// `i`, `i/t`, `i//n` or `i/t/n`; only the position index is kept
fn face_ref(input: &str) -> IResult<&str, i64> {
    terminated(
        integer,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::geometry::dimensions;

    const QUAD: &str = "\
# a unit square in the xy plane
o square
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0 1.0
vn 0 0 1
vt 0 0
usemtl plain
s off
f 1/1/1 2//1 3 4/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn test_scientific_notation_and_tabs() {
        let mesh = parse_obj("v\t-1e0 2.5E-1 .5\nv 1 1 1\n").unwrap();
        assert_relative_eq!(mesh.vertices()[0], Point3::new(-1.0, 0.25, 0.5));
    }

    #[test]
    fn test_box_dimensions() {
        let obj = "\
v -1 0 -3
v 1 0 -3
v 1 2 -3
v -1 2 3
f 1 2 3
f 1 3 4
";
        let mesh = parse_obj(obj).unwrap();
        assert_relative_eq!(dimensions(Some(&mesh)), Vector3::new(2.0, 2.0, 6.0));
    }

    #[test]
    fn test_bundled_assets() {
        let cuboid = parse_obj(include_str!("../../assets/box.obj")).unwrap();
        assert_eq!(cuboid.faces().len(), 12);
        assert_relative_eq!(dimensions(Some(&cuboid)), Vector3::new(2.0, 2.0, 6.0));

        let plate = parse_obj(include_str!("../../assets/plate.obj")).unwrap();
        assert_relative_eq!(dimensions(Some(&plate)), Vector3::new(4.0, 0.0, 2.0));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        for obj in ["v inf 0 0\n", "v 0 0 0\nv nan 1 1\n", "v 0 0 inf\n"] {
            assert!(matches!(parse_obj(obj), Err(ObjError::Syntax { .. })), "{}", obj);
        }
        match parse_obj("v 1 1 1\nv nan 0 0\n").unwrap_err() {
            ObjError::Syntax { line, message } => {
                assert_eq!(line, 2);
                assert_eq!(message, "non-finite coordinate");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let obj = "\u{feff}v -5 0 0\nv 1 1 1\nv 1 0 1\nf 1 2 3\n";
        let mesh = parse_obj(obj).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_relative_eq!(dimensions(Some(&mesh)), Vector3::new(6.0, 1.0, 1.0));

        let from_bytes = parse_obj_bytes(obj.as_bytes()).unwrap();
        assert_eq!(from_bytes, mesh);
    }

    #[test]
    fn test_invalid_vertex_reports_line() {
        let err = parse_obj("v 0 0 0\nv 1 nope 0\n").unwrap_err();
        match err {
            ObjError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_face_with_two_vertices() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, ObjError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_face_index_out_of_range() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert!(matches!(
            err,
            ObjError::IndexOutOfRange { line: 4, index: 4, vertex_count: 3 }
        ));

        let err = parse_obj("v 0 0 0\nf 0 1 1\n").unwrap_err();
        assert!(matches!(err, ObjError::IndexOutOfRange { index: 0, .. }));
    }

    #[test]
    fn test_no_vertices() {
        assert!(matches!(parse_obj("# nothing\n\n"), Err(ObjError::Empty)));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            parse_obj_bytes(&[b'v', b' ', 0xff, 0xfe]),
            Err(ObjError::Encoding(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let mesh = load_obj_file(file.path()).unwrap();
        assert_eq!(mesh.faces().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_obj_file(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }
}
