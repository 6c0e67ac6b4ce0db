//! Model loading: an OBJ file together with the material libraries it names.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use corelib::Extents;

use crate::{
    geometry::Geometry,
    material::Material,
    mtl::{MaterialLibrary, parse_mtl},
    obj::{ObjData, load_obj_from_path},
};

/// Parsed OBJ geometry plus its materials.
#[derive(Clone, Debug)]
pub struct Model {
    pub obj: ObjData,
    pub materials: MaterialLibrary,
    /// Directory that `mtllib` and texture filenames are relative to.
    pub base_dir: PathBuf,
    pub default_material: Material,
}

/// Load an OBJ file and every material library it references.
///
/// Libraries are resolved relative to the OBJ file. A library that cannot
/// be read is skipped with a warning; geometries using its materials fall
/// back to [`Material::default`].
pub fn load_model_from_path(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    log::info!("Loading model from {:?}", path);

    let obj = load_obj_from_path(path)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut texts = Vec::with_capacity(obj.material_libs.len());
    for lib in &obj.material_libs {
        let lib_path = base_dir.join(lib);
        match fs::read_to_string(&lib_path) {
            Ok(text) => texts.push(text),
            Err(e) => log::warn!("Failed to read material library {:?}: {}", lib_path, e),
        }
    }

    let materials = parse_mtl(&texts.join("\n"))
        .with_context(|| format!("Failed to parse material libraries of {}", path.display()))?;

    log::info!(
        "Loaded model: {} geometries, {} materials from {} libraries",
        obj.geometries.len(),
        materials.len(),
        texts.len()
    );

    Ok(Model {
        obj,
        materials,
        base_dir,
        default_material: Material::default(),
    })
}

impl Model {
    /// Build a model from already parsed parts.
    pub fn new(obj: ObjData, materials: MaterialLibrary, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            obj,
            materials,
            base_dir: base_dir.into(),
            default_material: Material::default(),
        }
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.obj.geometries
    }

    /// Material for `name`, or the default material when the library lacks it.
    pub fn material(&self, name: &str) -> Material {
        match self.materials.get(name) {
            Some(record) => record.resolve(&self.default_material),
            None => self.default_material.clone(),
        }
    }

    /// Each geometry paired with its resolved material.
    pub fn parts(&self) -> impl Iterator<Item = (&Geometry, Material)> {
        self.obj
            .geometries
            .iter()
            .map(|g| (g, self.material(&g.material)))
    }

    /// Texture files used by the model's materials, joined onto `base_dir`,
    /// sorted and without duplicates.
    pub fn texture_paths(&self) -> Vec<PathBuf> {
        let mut names: Vec<&str> = self
            .materials
            .values()
            .flat_map(|m| m.texture_files())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter().map(|n| self.base_dir.join(n)).collect()
    }

    /// Bounds over all geometries, `None` if the model has no positions.
    pub fn extents(&self) -> Option<Extents> {
        self.obj
            .geometries
            .iter()
            .filter_map(|g| g.data.extents())
            .reduce(Extents::union)
    }
}
