//! Asset parsers for Wavefront models.
//! OBJ text -> flat per-geometry vertex streams, MTL text -> material records,
//! plus loading a model together with its material libraries from disk.

pub mod error;
pub mod geometry;
pub mod lexer;
pub mod material;
pub mod model;
pub mod mtl;
pub mod obj;

pub use error::{ParseError, ParseResult};
pub use geometry::{Attribute, Geometry, GeometryData};
pub use material::{Material, MaterialRecord};
pub use model::{Model, load_model_from_path};
pub use mtl::{MaterialLibrary, parse_mtl};
pub use obj::{ObjData, load_obj_from_path, parse_obj};
