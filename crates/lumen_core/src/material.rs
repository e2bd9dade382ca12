//! Surface materials and the id-indexed material table.

use lumen_math::DVec3;

use crate::color::Color;
use crate::error::{SceneError, SceneResult};

/// Index into a [`MaterialMap`].
pub type MaterialId = usize;

/// A plain colored surface that can reflect, refract and be bumped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffuseMaterial {
    /// Base surface color
    pub color: Color,

    /// Sampling frequency of the bump noise field
    pub bump_noise_frequency: f64,

    /// Strength of the normal perturbation (0 = smooth)
    pub bump_magnitude: f64,

    /// Values > 0 make the surface mirror the scene
    pub reflectivity: f64,

    /// Values > 0 let light through the surface
    pub transparency: f64,

    /// 1.0 matches the surrounding medium, i.e. no refraction
    pub refractive_index: f64,
}

impl Default for DiffuseMaterial {
    fn default() -> Self {
        Self {
            color: Color::GRAY,
            bump_noise_frequency: 1.0,
            bump_magnitude: 0.0,
            reflectivity: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl DiffuseMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_reflectivity(mut self, reflectivity: f64) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_refractive_index(mut self, refractive_index: f64) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    pub fn with_bump(mut self, frequency: f64, magnitude: f64) -> Self {
        self.bump_noise_frequency = frequency;
        self.bump_magnitude = magnitude;
        self
    }

    /// Check if light bends when passing through this material.
    pub fn has_refraction(&self) -> bool {
        self.refractive_index != 1.0
    }
}

/// Any material a scene element can be shaded with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    Diffuse(DiffuseMaterial),

    /// Alternating square tiles on the XY plane.
    Checkerboard { size: f64, color1: Color, color2: Color },

    /// Concentric rings around `center`.
    Target {
        center: DVec3,
        stripe_frequency: f64,
        color1: Color,
        color2: Color,
    },
}

impl Default for Material {
    fn default() -> Self {
        Material::Diffuse(DiffuseMaterial::default())
    }
}

impl Material {
    /// Opaque diffuse material of a single color.
    pub fn solid(color: Color) -> Self {
        Material::Diffuse(DiffuseMaterial::new(color))
    }

    /// Transparency of the material; procedural materials are opaque.
    pub fn transparency(&self) -> f64 {
        match self {
            Material::Diffuse(diffuse) => diffuse.transparency,
            _ => 0.0,
        }
    }

    /// Color of the material at a surface point, before shading.
    pub fn color_at(&self, point: DVec3) -> Color {
        match *self {
            Material::Diffuse(diffuse) => diffuse.color,
            Material::Checkerboard {
                size,
                color1,
                color2,
            } => checkerboard_color(point, size, color1, color2),
            Material::Target {
                center,
                stripe_frequency,
                color1,
                color2,
            } => {
                let phase = point.distance(center) % stripe_frequency;
                if phase < stripe_frequency / 2.0 {
                    color1
                } else {
                    color2
                }
            }
        }
    }

    fn validate(&self, id: MaterialId) -> SceneResult<()> {
        let invalid = |reason: &str| {
            Err(SceneError::InvalidMaterial {
                id,
                reason: reason.to_string(),
            })
        };

        match self {
            Material::Diffuse(diffuse) => {
                if diffuse.reflectivity < 0.0 {
                    return invalid("negative reflectivity");
                }
                if diffuse.transparency < 0.0 {
                    return invalid("negative transparency");
                }
                if diffuse.refractive_index <= 0.0 {
                    return invalid("refractive index must be positive");
                }
            }
            Material::Checkerboard { size, .. } if *size <= 0.0 => {
                return invalid("checkerboard size must be positive");
            }
            Material::Target {
                stripe_frequency, ..
            } if *stripe_frequency <= 0.0 => {
                return invalid("stripe frequency must be positive");
            }
            _ => {}
        }

        Ok(())
    }
}

fn checkerboard_color(point: DVec3, size: f64, color1: Color, color2: Color) -> Color {
    let phase_x = point.x.abs() % (size * 2.0);
    let phase_y = point.y.abs() % (size * 2.0);

    let mut is_color1 = (phase_x >= size) != (phase_y >= size);
    if point.x < 0.0 {
        is_color1 = !is_color1;
    }
    if point.y < 0.0 {
        is_color1 = !is_color1;
    }

    if is_color1 {
        color1
    } else {
        color2
    }
}

/// Dense id -> material table, built once per scene.
#[derive(Clone, Debug, Default)]
pub struct MaterialMap {
    materials: Vec<Option<Material>>,
}

impl MaterialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from explicit ids, rejecting duplicates and invalid
    /// material parameters.
    pub fn from_entries(entries: impl IntoIterator<Item = (MaterialId, Material)>) -> SceneResult<Self> {
        let mut map = Self::new();
        for (id, material) in entries {
            material.validate(id)?;
            if map.get(id).is_some() {
                return Err(SceneError::DuplicateMaterial(id));
            }
            if id >= map.materials.len() {
                map.materials.resize(id + 1, None);
            }
            map.materials[id] = Some(material);
        }
        Ok(map)
    }

    /// Append a material, returning its id.
    pub fn push(&mut self, material: Material) -> SceneResult<MaterialId> {
        let id = self.materials.len();
        material.validate(id)?;
        self.materials.push(Some(material));
        Ok(id)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id).and_then(Option::as_ref)
    }

    /// Number of defined materials.
    pub fn len(&self) -> usize {
        self.materials.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
