//! Wavefront OBJ parser producing flat, non-indexed vertex streams.
//!
//! Faces are fan-triangulated and every face vertex is expanded into the
//! streams of the geometry it belongs to. A new geometry starts whenever
//! `o`, `g` or `usemtl` changes state after some vertices were emitted.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    error::{ParseError, ParseResult},
    geometry::{Geometry, StreamBuilder},
    lexer::{self, Line},
};

/// Result of parsing one OBJ document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjData {
    pub geometries: Vec<Geometry>,
    /// `mtllib` filenames, verbatim and in order of appearance.
    pub material_libs: Vec<String>,
}

/// Load and parse an OBJ file.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<ObjData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    parse_obj(&text).with_context(|| format!("Failed to parse OBJ file: {}", path.display()))
}

/// Parse OBJ text.
pub fn parse_obj(text: &str) -> ParseResult<ObjData> {
    let mut state = ObjState::new();

    for line in lexer::lines(text) {
        match Directive::from_keyword(line.keyword) {
            Directive::Vertex => state.vertex(&line)?,
            Directive::Texcoord => state.texcoord(&line)?,
            Directive::Normal => state.normal(&line)?,
            Directive::Face => state.face(&line)?,
            Directive::Smoothing => {}
            Directive::MaterialLib => state.material_libs.push(line.unparsed_args.to_owned()),
            Directive::UseMaterial => {
                state.material = line.unparsed_args.to_owned();
                state.invalidate();
            }
            Directive::Group => {
                state.groups = line.parts().map(str::to_owned).collect();
                state.invalidate();
            }
            Directive::Object => {
                state.object = line.unparsed_args.to_owned();
                state.invalidate();
            }
            Directive::Unknown => {
                log::warn!(
                    "Unhandled OBJ keyword '{}' on line {}",
                    line.keyword,
                    line.number
                );
            }
        }
    }

    Ok(state.finish())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    Vertex,
    Texcoord,
    Normal,
    Face,
    Smoothing,
    MaterialLib,
    UseMaterial,
    Group,
    Object,
    Unknown,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "v" => Self::Vertex,
            "vt" => Self::Texcoord,
            "vn" => Self::Normal,
            "f" => Self::Face,
            "s" => Self::Smoothing,
            "mtllib" => Self::MaterialLib,
            "usemtl" => Self::UseMaterial,
            "g" => Self::Group,
            "o" => Self::Object,
            _ => Self::Unknown,
        }
    }
}

/// Append-only attribute pool addressed with OBJ's 1-based indices.
///
/// Behaves as if slot 0 held a sentinel: `len()` counts it, so a relative
/// index `-1` resolves to `len() - 1`, the last entry pushed.
#[derive(Debug)]
struct Pool<T> {
    entries: Vec<T>,
}

impl<T: Copy> Pool<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.entries.len() + 1
    }

    fn push(&mut self, value: T) {
        self.entries.push(value);
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Turn a raw face index into an absolute slot in `1..len()`.
    fn resolve(&self, raw: i64) -> Option<usize> {
        let len = self.len() as i64;
        let slot = if raw >= 0 { raw } else { len + raw };
        (1..len).contains(&slot).then_some(slot as usize)
    }

    fn get(&self, slot: usize) -> Option<T> {
        slot.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .copied()
    }
}

/// Object, groups and material captured when a geometry is allocated.
#[derive(Clone, Debug, PartialEq)]
struct Header {
    object: String,
    groups: Vec<String>,
    material: String,
}

#[derive(Clone, Debug, PartialEq)]
enum Current {
    /// Next emitted vertex allocates a fresh geometry.
    Pending,
    Active(Header),
}

struct ObjState {
    positions: Pool<[f32; 3]>,
    texcoords: Pool<[f32; 2]>,
    normals: Pool<[f32; 3]>,
    /// Indexed by position slot, not by its own order of declaration.
    colors: Pool<[f32; 3]>,

    material_libs: Vec<String>,
    finished: Vec<Geometry>,

    current: Current,
    streams: StreamBuilder,

    object: String,
    groups: Vec<String>,
    material: String,
}

impl ObjState {
    fn new() -> Self {
        Self {
            positions: Pool::new(),
            texcoords: Pool::new(),
            normals: Pool::new(),
            colors: Pool::new(),
            material_libs: Vec::new(),
            finished: Vec::new(),
            current: Current::Pending,
            streams: StreamBuilder::default(),
            object: "default".into(),
            groups: vec!["default".into()],
            material: "default".into(),
        }
    }

    fn vertex(&mut self, line: &Line<'_>) -> ParseResult<()> {
        let values = line.f32_all("vertex coordinate")?;
        let (position, color) = match values.len() {
            0..=2 => {
                return Err(ParseError::MissingField {
                    line: line.number,
                    field: "vertex coordinate",
                });
            }
            3 => (&values[..3], None),
            4 | 5 => {
                log::warn!(
                    "Ignoring {} value(s) after x y z on line {} (not a full RGB color)",
                    values.len() - 3,
                    line.number
                );
                (&values[..3], None)
            }
            _ => (&values[..3], Some(&values[3..6])),
        };

        self.positions.push([position[0], position[1], position[2]]);
        if let Some(&[r, g, b]) = color {
            // Colors are looked up by position slot, so every earlier
            // position must already carry one.
            if self.colors.len() != self.positions.len() - 1 {
                return Err(ParseError::MissingVertexColor {
                    line: line.number,
                    index: self.colors.len(),
                });
            }
            self.colors.push([r, g, b]);
        }
        Ok(())
    }

    fn texcoord(&mut self, line: &Line<'_>) -> ParseResult<()> {
        let u = line.f32_at(0, "u coordinate")?;
        let v = match line.parts().nth(1) {
            Some(token) => lexer::parse_f32(token, line.number, "v coordinate")?,
            None => 0.0,
        };
        self.texcoords.push([u, v]);
        Ok(())
    }

    fn normal(&mut self, line: &Line<'_>) -> ParseResult<()> {
        let nx = line.f32_at(0, "nx coordinate")?;
        let ny = line.f32_at(1, "ny coordinate")?;
        let nz = line.f32_at(2, "nz coordinate")?;
        self.normals.push([nx, ny, nz]);
        Ok(())
    }

    fn face(&mut self, line: &Line<'_>) -> ParseResult<()> {
        let verts: Vec<&str> = line.parts().collect();
        if verts.len() < 3 {
            log::warn!(
                "Skipping face with {} vertices on line {}",
                verts.len(),
                line.number
            );
            return Ok(());
        }

        self.ensure_geometry();
        for tri in 0..verts.len() - 2 {
            self.add_vertex(verts[0], line.number)?;
            self.add_vertex(verts[tri + 1], line.number)?;
            self.add_vertex(verts[tri + 2], line.number)?;
        }
        Ok(())
    }

    fn add_vertex(&mut self, token: &str, line_no: usize) -> ParseResult<()> {
        let mut split = token.split('/');

        if let Some(raw) = split.next().filter(|s| !s.is_empty()) {
            let slot = resolve_index(raw, token, &self.positions, line_no)?;
            self.streams.position.extend(self.positions.entries[slot - 1]);
            if !self.colors.is_empty() {
                let color = self.colors.get(slot).ok_or(ParseError::MissingVertexColor {
                    line: line_no,
                    index: slot,
                })?;
                self.streams.color.extend(color);
            }
        }

        if let Some(raw) = split.next().filter(|s| !s.is_empty()) {
            let slot = resolve_index(raw, token, &self.texcoords, line_no)?;
            self.streams.texcoord.extend(self.texcoords.entries[slot - 1]);
        }

        if let Some(raw) = split.next().filter(|s| !s.is_empty()) {
            let slot = resolve_index(raw, token, &self.normals, line_no)?;
            self.streams.normal.extend(self.normals.entries[slot - 1]);
        }

        if split.next().is_some() {
            return Err(ParseError::FaceIndex {
                line: line_no,
                token: token.to_owned(),
                reason: "more than three '/'-separated indices".into(),
            });
        }
        Ok(())
    }

    fn ensure_geometry(&mut self) {
        if let Current::Pending = self.current {
            self.current = Current::Active(Header {
                object: self.object.clone(),
                groups: self.groups.clone(),
                material: self.material.clone(),
            });
        }
    }

    /// Close the current geometry if it has received any position.
    /// Otherwise the active header stays stale on purpose: faces keep
    /// landing in the already allocated, still empty geometry.
    fn invalidate(&mut self) {
        if !self.streams.position.is_empty() {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let Current::Active(Header {
            object,
            groups,
            material,
        }) = std::mem::replace(&mut self.current, Current::Pending)
        else {
            return;
        };
        let data = std::mem::take(&mut self.streams).finish();
        if !data.is_lockstep() {
            log::warn!(
                "Geometry '{}' (material '{}') has attribute streams of differing vertex counts",
                object,
                material
            );
        }
        self.finished.push(Geometry {
            object,
            groups,
            material,
            data,
        });
    }

    fn finish(mut self) -> ObjData {
        self.flush();
        log::debug!(
            "Parsed OBJ: {} positions, {} texcoords, {} normals, {} colors -> {} geometries",
            self.positions.entries.len(),
            self.texcoords.entries.len(),
            self.normals.entries.len(),
            self.colors.entries.len(),
            self.finished.len()
        );
        ObjData {
            geometries: self.finished,
            material_libs: self.material_libs,
        }
    }
}

fn resolve_index<T: Copy>(
    raw: &str,
    token: &str,
    pool: &Pool<T>,
    line_no: usize,
) -> ParseResult<usize> {
    let index = raw.parse::<i64>().map_err(|_| ParseError::FaceIndex {
        line: line_no,
        token: token.to_owned(),
        reason: format!("'{raw}' is not an integer"),
    })?;
    pool.resolve(index).ok_or_else(|| ParseError::FaceIndex {
        line: line_no,
        token: token.to_owned(),
        reason: format!("index {index} out of range (pool holds {})", pool.len() - 1),
    })
}
