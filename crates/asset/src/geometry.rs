//! CPU-side geometry produced by the OBJ parser.
//!
//! Every stream is a flat `f32` array in face order, ready to be uploaded
//! as a non-indexed vertex buffer.

use corelib::Extents;

/// Vertex attribute streams a geometry can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Texcoord,
    Normal,
    Color,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Position,
        Attribute::Texcoord,
        Attribute::Normal,
        Attribute::Color,
    ];

    /// Attribute name as used by shaders / buffer layouts.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::Texcoord => "texcoord",
            Attribute::Normal => "normal",
            Attribute::Color => "color",
        }
    }

    /// Floats per vertex.
    pub fn components(self) -> usize {
        match self {
            Attribute::Texcoord => 2,
            Attribute::Position | Attribute::Normal | Attribute::Color => 3,
        }
    }
}

/// Flat per-vertex streams. A stream that never received data is `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryData {
    pub position: Option<Vec<f32>>,
    pub texcoord: Option<Vec<f32>>,
    pub normal: Option<Vec<f32>>,
    pub color: Option<Vec<f32>>,
}

impl GeometryData {
    pub fn get(&self, attr: Attribute) -> Option<&[f32]> {
        match attr {
            Attribute::Position => self.position.as_deref(),
            Attribute::Texcoord => self.texcoord.as_deref(),
            Attribute::Normal => self.normal.as_deref(),
            Attribute::Color => self.color.as_deref(),
        }
    }

    /// Raw bytes of one stream, for handing to a buffer upload.
    pub fn as_bytes(&self, attr: Attribute) -> Option<&[u8]> {
        self.get(attr).map(bytemuck::cast_slice)
    }

    /// Number of vertices, taken from the position stream.
    pub fn vertex_count(&self) -> usize {
        self.position
            .as_ref()
            .map_or(0, |p| p.len() / Attribute::Position.components())
    }

    /// Present streams in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &[f32])> {
        Attribute::ALL
            .into_iter()
            .filter_map(move |attr| self.get(attr).map(|data| (attr, data)))
    }

    /// `true` when every present stream holds the same number of vertices.
    pub fn is_lockstep(&self) -> bool {
        let mut counts = self
            .attributes()
            .map(|(attr, data)| data.len() / attr.components());
        match counts.next() {
            Some(first) => counts.all(|c| c == first),
            None => true,
        }
    }

    pub fn extents(&self) -> Option<Extents> {
        self.position.as_deref().and_then(Extents::from_positions)
    }
}

/// One run of triangles sharing object, groups and material.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub object: String,
    pub groups: Vec<String>,
    pub material: String,
    pub data: GeometryData,
}

/// Growing streams for the geometry currently receiving faces.
#[derive(Debug, Default)]
pub(crate) struct StreamBuilder {
    pub position: Vec<f32>,
    pub texcoord: Vec<f32>,
    pub normal: Vec<f32>,
    pub color: Vec<f32>,
}

impl StreamBuilder {
    pub fn finish(self) -> GeometryData {
        fn non_empty(v: Vec<f32>) -> Option<Vec<f32>> {
            (!v.is_empty()).then_some(v)
        }
        GeometryData {
            position: non_empty(self.position),
            texcoord: non_empty(self.texcoord),
            normal: non_empty(self.normal),
            color: non_empty(self.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_streams_are_dropped() {
        let builder = StreamBuilder {
            position: vec![0.0, 0.0, 0.0],
            normal: vec![0.0, 1.0, 0.0],
            ..Default::default()
        };
        let data = builder.finish();
        assert!(data.position.is_some());
        assert!(data.normal.is_some());
        assert!(data.texcoord.is_none());
        assert!(data.color.is_none());
        let names: Vec<_> = data.attributes().map(|(a, _)| a.name()).collect();
        assert_eq!(names, ["position", "normal"]);
    }

    #[test]
    fn lockstep_and_vertex_count() {
        let mut data = GeometryData {
            position: Some(vec![0.0; 9]),
            texcoord: Some(vec![0.0; 6]),
            ..Default::default()
        };
        assert_eq!(data.vertex_count(), 3);
        assert!(data.is_lockstep());

        data.texcoord = Some(vec![0.0; 4]);
        assert!(!data.is_lockstep());
    }

    #[test]
    fn byte_view_matches_stream_length() {
        let data = GeometryData {
            position: Some(vec![1.0, 2.0, 3.0]),
            ..Default::default()
        };
        assert_eq!(data.as_bytes(Attribute::Position).map(<[u8]>::len), Some(12));
        assert!(data.as_bytes(Attribute::Color).is_none());
    }
}
