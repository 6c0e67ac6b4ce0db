//! Material records as parsed, and fully resolved materials for rendering.

/// Material properties exactly as found in an MTL file; unset fields stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialRecord {
    pub shininess: Option<f32>,
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub emissive: Option<[f32; 3]>,
    pub optical_density: Option<f32>,
    pub opacity: Option<f32>,
    pub illum: Option<u32>,
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub normal_map: Option<String>,
}

impl MaterialRecord {
    /// Overlay the fields set here on top of `defaults`.
    pub fn resolve(&self, defaults: &Material) -> Material {
        Material {
            shininess: self.shininess.unwrap_or(defaults.shininess),
            ambient: self.ambient.unwrap_or(defaults.ambient),
            diffuse: self.diffuse.unwrap_or(defaults.diffuse),
            specular: self.specular.unwrap_or(defaults.specular),
            emissive: self.emissive.unwrap_or(defaults.emissive),
            optical_density: self.optical_density.unwrap_or(defaults.optical_density),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            illum: self.illum.unwrap_or(defaults.illum),
            diffuse_map: self.diffuse_map.clone().or_else(|| defaults.diffuse_map.clone()),
            specular_map: self
                .specular_map
                .clone()
                .or_else(|| defaults.specular_map.clone()),
            normal_map: self.normal_map.clone().or_else(|| defaults.normal_map.clone()),
        }
    }

    /// Texture filenames referenced by this material.
    pub fn texture_files(&self) -> impl Iterator<Item = &str> {
        [&self.diffuse_map, &self.specular_map, &self.normal_map]
            .into_iter()
            .filter_map(|m| m.as_deref())
    }
}

/// Material with every scalar and color filled in.
///
/// Maps stay optional: a renderer binds a 1x1 white texture where
/// `diffuse_map` is `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub shininess: f32,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub emissive: [f32; 3],
    pub optical_density: f32,
    pub opacity: f32,
    pub illum: u32,
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub normal_map: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shininess: 5.0,
            ambient: [0.0, 0.0, 0.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            optical_density: 1.0,
            opacity: 1.0,
            illum: 2,
            diffuse_map: None,
            specular_map: None,
            normal_map: None,
        }
    }
}

impl Material {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}
