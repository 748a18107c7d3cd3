//! Model description format and compilation.
//!
//! A model is written in TOML (see `assets/arm26.toml`) and compiled into a
//! [`Model`]: flat arrays of bodies, joints, geoms, muscles, materials and
//! cameras addressed by index, with name lookup for each kind.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use nalgebra::{DVector, Vector2};
use serde::Deserialize;

use crate::dynamics;
use crate::error::PhysicsError;
use crate::kinematics;
use crate::muscle::{Muscle, MuscleParams};
use crate::resources::Assets;

const DEFAULT_TIMESTEP: f64 = 0.005;
const DEFAULT_DENSITY: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Description (deserialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelDesc {
    name: String,
    #[serde(default = "default_timestep")]
    timestep: f64,
    #[serde(default)]
    assets: Vec<String>,
    #[serde(default)]
    floor: Option<FloorDesc>,
    #[serde(default)]
    muscle_defaults: MuscleParams,
    #[serde(default, rename = "camera")]
    cameras: Vec<CameraDesc>,
    #[serde(rename = "body")]
    bodies: Vec<BodyDesc>,
    #[serde(default, rename = "muscle")]
    muscles: Vec<MuscleDesc>,
    #[serde(default, rename = "material")]
    materials: Vec<MaterialDesc>,
}

const fn default_timestep() -> f64 {
    DEFAULT_TIMESTEP
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssetDesc {
    #[serde(default, rename = "material")]
    materials: Vec<MaterialDesc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FloorDesc {
    name: String,
    half_extent: f64,
    grid: f64,
    material: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraDesc {
    name: String,
    center: [f64; 2],
    half_height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BodyDesc {
    name: String,
    parent: Option<String>,
    #[serde(default)]
    pos: [f64; 2],
    joint: Option<JointDesc>,
    #[serde(default, rename = "geom")]
    geoms: Vec<GeomDesc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JointDesc {
    name: String,
    kind: JointKind,
    /// Degrees for hinges, metres for slides.
    range: Option<[f64; 2]>,
    #[serde(default)]
    damping: f64,
    /// Slide direction in the parent frame.
    axis: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeomDesc {
    name: String,
    kind: GeomKind,
    fromto: Option<[f64; 4]>,
    pos: Option<[f64; 2]>,
    size: Vec<f64>,
    material: Option<String>,
    density: Option<f64>,
    #[serde(default)]
    massless: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MuscleDesc {
    name: String,
    moment_arms: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct MaterialDesc {
    name: String,
    rgba: [f32; 4],
}

// ---------------------------------------------------------------------------
// Compiled model
// ---------------------------------------------------------------------------

/// Joint type. Both move in the xy-plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointKind {
    /// Rotation about z.
    Hinge,
    /// Translation along an in-plane axis.
    Slide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeomKind {
    Capsule,
    Sphere,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub parent: Option<usize>,
    /// Offset from the parent frame origin, in the parent frame.
    pub pos: Vector2<f64>,
    pub joint: Option<usize>,
    pub mass: f64,
    /// Centre of mass in the body frame.
    pub com: Vector2<f64>,
    /// Rotational inertia about the centre of mass.
    pub inertia: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub kind: JointKind,
    pub body: usize,
    /// Radians for hinges. `None` when unlimited.
    pub range: Option<[f64; 2]>,
    pub damping: f64,
    /// Unit slide direction (ignored for hinges).
    pub axis: Vector2<f64>,
}

impl Joint {
    pub const fn limited(&self) -> bool {
        self.range.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geom {
    pub name: String,
    pub kind: GeomKind,
    pub body: usize,
    /// Centre in the body frame.
    pub pos: Vector2<f64>,
    /// Unit long axis in the body frame (capsules).
    pub axis: Vector2<f64>,
    /// `[radius, half_length, 0]`.
    pub size: [f64; 3],
    pub material: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub rgba: [f32; 4],
}

/// Orthographic top-down camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub name: String,
    pub center: Vector2<f64>,
    /// Half of the visible world height in metres.
    pub half_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    pub name: String,
    pub half_extent: f64,
    pub grid: f64,
    pub material: Option<usize>,
}

/// Compiled model. Geometry, materials and body offsets may be edited after
/// compilation; masses and muscle peak forces are fixed at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub timestep: f64,
    pub bodies: Vec<Body>,
    pub joints: Vec<Joint>,
    pub geoms: Vec<Geom>,
    pub muscles: Vec<Muscle>,
    pub materials: Vec<Material>,
    pub cameras: Vec<Camera>,
    pub floor: Option<Floor>,
}

macro_rules! id_lookup {
    ($fn_name:ident, $field:ident, $kind:literal) => {
        #[doc = concat!("Index of the ", $kind, " with the given name.")]
        pub fn $fn_name(&self, name: &str) -> Result<usize, PhysicsError> {
            self.$field
                .iter()
                .position(|item| item.name == name)
                .ok_or_else(|| PhysicsError::unknown($kind, name))
        }
    };
}

impl Model {
    id_lookup!(body_id, bodies, "body");
    id_lookup!(joint_id, joints, "joint");
    id_lookup!(geom_id, geoms, "geom");
    id_lookup!(muscle_id, muscles, "muscle");
    id_lookup!(material_id, materials, "material");
    id_lookup!(camera_id, cameras, "camera");

    /// Number of generalized coordinates.
    pub const fn nq(&self) -> usize {
        self.joints.len()
    }

    /// Number of actuators.
    pub const fn nu(&self) -> usize {
        self.muscles.len()
    }

    /// Reference configuration.
    pub fn qpos0(&self) -> DVector<f64> {
        DVector::zeros(self.nq())
    }

    /// Compile a TOML model description. Asset files named in the model's
    /// `assets` list are resolved against `assets`.
    pub fn from_toml(text: &str, assets: &Assets) -> Result<Self, PhysicsError> {
        let desc: ModelDesc = toml::from_str(text).map_err(|e| PhysicsError::Parse {
            source_name: "model".into(),
            message: e.to_string(),
        })?;

        let mut material_descs = Vec::new();
        for asset_name in &desc.assets {
            let asset_text = assets
                .get(asset_name)
                .ok_or_else(|| PhysicsError::ResourceNotFound(asset_name.clone()))?;
            let bundle: AssetDesc =
                toml::from_str(asset_text).map_err(|e| PhysicsError::Parse {
                    source_name: asset_name.clone(),
                    message: e.to_string(),
                })?;
            material_descs.extend(bundle.materials);
        }
        material_descs.extend(desc.materials.iter().cloned());

        compile(desc, material_descs)
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

fn compile(desc: ModelDesc, material_descs: Vec<MaterialDesc>) -> Result<Model, PhysicsError> {
    if !(desc.timestep.is_finite() && desc.timestep > 0.0) {
        return Err(PhysicsError::InvalidModel(format!(
            "timestep must be positive, got {}",
            desc.timestep
        )));
    }

    let mut materials: Vec<Material> = Vec::with_capacity(material_descs.len());
    for m in material_descs {
        if materials.iter().any(|existing| existing.name == m.name) {
            return Err(PhysicsError::InvalidModel(format!(
                "duplicate material '{}'",
                m.name
            )));
        }
        materials.push(Material {
            name: m.name,
            rgba: m.rgba,
        });
    }
    let material_index = |name: &Option<String>| -> Result<Option<usize>, PhysicsError> {
        name.as_ref()
            .map(|n| {
                materials
                    .iter()
                    .position(|m| &m.name == n)
                    .ok_or_else(|| PhysicsError::unknown("material", n))
            })
            .transpose()
    };

    let mut bodies: Vec<Body> = Vec::with_capacity(desc.bodies.len());
    let mut joints = Vec::new();
    let mut geoms = Vec::new();

    for body_desc in &desc.bodies {
        if bodies.iter().any(|b| b.name == body_desc.name) {
            return Err(PhysicsError::InvalidModel(format!(
                "duplicate body '{}'",
                body_desc.name
            )));
        }
        // Parents must be declared first so frames can be computed in order.
        let parent = body_desc
            .parent
            .as_ref()
            .map(|p| {
                bodies
                    .iter()
                    .position(|b| &b.name == p)
                    .ok_or_else(|| PhysicsError::unknown("body", p))
            })
            .transpose()?;
        let body_index = bodies.len();

        let joint = match &body_desc.joint {
            Some(j) => {
                joints.push(compile_joint(j, body_index)?);
                Some(joints.len() - 1)
            }
            None => None,
        };

        let mut mass_parts = Vec::new();
        for g in &body_desc.geoms {
            let geom = compile_geom(g, body_index, material_index(&g.material)?)?;
            if !g.massless {
                let density = g.density.unwrap_or(DEFAULT_DENSITY);
                mass_parts.push(geom_mass_properties(&geom, density));
            }
            geoms.push(geom);
        }
        let (mass, com, inertia) = combine_mass_properties(&mass_parts);

        bodies.push(Body {
            name: body_desc.name.clone(),
            parent,
            pos: Vector2::from(body_desc.pos),
            joint,
            mass,
            com,
            inertia,
        });
    }

    for (i, g) in geoms.iter().enumerate() {
        if geoms[..i].iter().any(|other| other.name == g.name) {
            return Err(PhysicsError::InvalidModel(format!(
                "duplicate geom '{}'",
                g.name
            )));
        }
    }

    let cameras = desc
        .cameras
        .iter()
        .map(|c| Camera {
            name: c.name.clone(),
            center: Vector2::from(c.center),
            half_height: c.half_height,
        })
        .collect();

    let floor = desc
        .floor
        .as_ref()
        .map(|f| -> Result<Floor, PhysicsError> {
            Ok(Floor {
                name: f.name.clone(),
                half_extent: f.half_extent,
                grid: f.grid,
                material: material_index(&f.material)?,
            })
        })
        .transpose()?;

    let mut model = Model {
        name: desc.name,
        timestep: desc.timestep,
        bodies,
        joints,
        geoms,
        muscles: Vec::new(),
        materials,
        cameras,
        floor,
    };

    let muscles = desc
        .muscles
        .iter()
        .map(|m| compile_muscle(m, desc.muscle_defaults, &model))
        .collect::<Result<Vec<_>, _>>()?;
    model.muscles = muscles;

    Ok(model)
}

fn compile_joint(j: &JointDesc, body: usize) -> Result<Joint, PhysicsError> {
    let range = match (j.kind, j.range) {
        (_, None) => None,
        (JointKind::Hinge, Some([lo, hi])) => Some([lo.to_radians(), hi.to_radians()]),
        (JointKind::Slide, Some(r)) => Some(r),
    };
    if let Some([lo, hi]) = range
        && lo >= hi
    {
        return Err(PhysicsError::InvalidModel(format!(
            "joint '{}' has empty range",
            j.name
        )));
    }
    let axis = Vector2::from(j.axis.unwrap_or([1.0, 0.0]));
    let axis = axis
        .try_normalize(f64::EPSILON)
        .ok_or_else(|| PhysicsError::InvalidModel(format!("joint '{}' has zero axis", j.name)))?;
    Ok(Joint {
        name: j.name.clone(),
        kind: j.kind,
        body,
        range,
        damping: j.damping.max(0.0),
        axis,
    })
}

fn compile_geom(
    g: &GeomDesc,
    body: usize,
    material: Option<usize>,
) -> Result<Geom, PhysicsError> {
    let radius = *g.size.first().ok_or_else(|| {
        PhysicsError::InvalidModel(format!("geom '{}' needs a radius in size[0]", g.name))
    })?;
    let (pos, axis, half_length) = match (g.kind, g.fromto, g.pos) {
        (GeomKind::Capsule, Some([x0, y0, x1, y1]), _) => {
            let from = Vector2::new(x0, y0);
            let to = Vector2::new(x1, y1);
            let d = to - from;
            let len = d.norm();
            let axis = d.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::x);
            ((from + to) * 0.5, axis, 0.5 * len)
        }
        (GeomKind::Capsule, None, _) => {
            return Err(PhysicsError::InvalidModel(format!(
                "capsule '{}' needs fromto",
                g.name
            )));
        }
        (GeomKind::Sphere, _, pos) => (Vector2::from(pos.unwrap_or_default()), Vector2::x(), 0.0),
    };
    Ok(Geom {
        name: g.name.clone(),
        kind: g.kind,
        body,
        pos,
        axis,
        size: [radius, half_length, 0.0],
        material,
    })
}

fn compile_muscle(
    m: &MuscleDesc,
    params: MuscleParams,
    model: &Model,
) -> Result<Muscle, PhysicsError> {
    let mut moment = vec![0.0; model.nq()];
    let mut tendon_range = [0.0, 0.0];
    for (joint_name, &arm) in &m.moment_arms {
        let j = model.joint_id(joint_name)?;
        let [lo, hi] = model.joints[j].range.ok_or_else(|| {
            PhysicsError::InvalidModel(format!(
                "muscle '{}' spans unlimited joint '{joint_name}'",
                m.name
            ))
        })?;
        moment[j] = arm;
        tendon_range[0] += (arm * lo).min(arm * hi);
        tendon_range[1] += (arm * lo).max(arm * hi);
    }
    if tendon_range[1] - tendon_range[0] <= 0.0 {
        return Err(PhysicsError::InvalidModel(format!(
            "muscle '{}' has no moment arm",
            m.name
        )));
    }

    // F0 = scale / |M^-1 r| at the reference pose.
    let qpos0 = model.qpos0();
    let frames = kinematics::body_frames(model, qpos0.as_slice());
    let mass = dynamics::mass_matrix(model, &frames);
    let chol = mass.cholesky().ok_or(PhysicsError::SingularMassMatrix)?;
    let acc0 = chol.solve(&DVector::from_column_slice(&moment)).norm();
    let f0 = params.scale / acc0.max(1e-10);

    Ok(Muscle {
        name: m.name.clone(),
        moment,
        params,
        tendon_range,
        f0,
    })
}

// ---------------------------------------------------------------------------
// Mass properties
// ---------------------------------------------------------------------------

/// `(mass, centre, inertia about centre)` of one geom.
fn geom_mass_properties(geom: &Geom, density: f64) -> (f64, Vector2<f64>, f64) {
    let r = geom.size[0];
    match geom.kind {
        GeomKind::Sphere => {
            let m = density * 4.0 / 3.0 * PI * r.powi(3);
            (m, geom.pos, 0.4 * m * r * r)
        }
        GeomKind::Capsule => {
            let len = 2.0 * geom.size[1];
            let m_cyl = density * PI * r * r * len;
            let m_caps = density * 4.0 / 3.0 * PI * r.powi(3);
            let i_cyl = m_cyl * (len * len / 12.0 + r * r / 4.0);
            let i_caps = m_caps * (0.4 * r * r + len * len / 4.0 + 3.0 * len * r / 8.0);
            (m_cyl + m_caps, geom.pos, i_cyl + i_caps)
        }
    }
}

fn combine_mass_properties(parts: &[(f64, Vector2<f64>, f64)]) -> (f64, Vector2<f64>, f64) {
    let mass: f64 = parts.iter().map(|(m, _, _)| m).sum();
    if mass <= 0.0 {
        return (0.0, Vector2::zeros(), 0.0);
    }
    let com = parts
        .iter()
        .fold(Vector2::zeros(), |acc, (m, c, _)| acc + c * *m)
        / mass;
    let inertia = parts
        .iter()
        .map(|(m, c, i)| i + m * (c - com).norm_squared())
        .sum();
    (mass, com, inertia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{ARM26_MODEL, get_model_and_assets, get_resource};

    fn arm26() -> Model {
        let (text, assets) = get_model_and_assets().unwrap();
        Model::from_toml(text, &assets).unwrap()
    }

    #[test]
    fn arm26_compiles() {
        let model = arm26();
        assert_eq!(model.name, "arm26");
        assert_eq!(model.nq(), 2);
        assert_eq!(model.nu(), 6);
        assert!((model.timestep - 0.005).abs() < f64::EPSILON);
        let names: Vec<_> = model.muscles.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["SF", "SE", "EF", "EE", "BF", "BE"]);
    }

    #[test]
    fn named_lookups() {
        let model = arm26();
        assert!(model.geom_id("target").is_ok());
        assert!(model.geom_id("finger").is_ok());
        assert!(model.body_id("target").is_ok());
        assert_eq!(model.camera_id("fixed").unwrap(), 0);
        assert!(model.material_id("self_highlight").is_ok());
        assert!(matches!(
            model.geom_id("nope"),
            Err(PhysicsError::UnknownName { kind: "geom", .. })
        ));
    }

    #[test]
    fn hinge_ranges_are_radians() {
        let model = arm26();
        let shoulder = &model.joints[model.joint_id("shoulder").unwrap()];
        let [lo, hi] = shoulder.range.unwrap();
        assert!(lo.abs() < 1e-12);
        assert!((hi - PI).abs() < 1e-12);
    }

    #[test]
    fn links_have_mass_and_target_does_not() {
        let model = arm26();
        let upper = &model.bodies[model.body_id("upper_arm").unwrap()];
        let target = &model.bodies[model.body_id("target").unwrap()];
        assert!(upper.mass > 1.0);
        assert!(upper.inertia > 0.0);
        assert!((upper.com.x - 0.25).abs() < 1e-9);
        assert_eq!(target.mass, 0.0);
    }

    #[test]
    fn muscles_have_positive_peak_force() {
        let model = arm26();
        for m in &model.muscles {
            assert!(m.f0.is_finite() && m.f0 > 0.0, "{} f0={}", m.name, m.f0);
            assert!(m.tendon_range[0] < m.tendon_range[1]);
        }
    }

    #[test]
    fn missing_asset_is_error() {
        let text = get_resource(ARM26_MODEL).unwrap();
        let err = Model::from_toml(text, &Assets::new()).unwrap_err();
        assert!(matches!(err, PhysicsError::ResourceNotFound(_)));
    }

    #[test]
    fn parent_must_be_declared_first() {
        let text = r#"
            name = "bad"
            [[body]]
            name = "child"
            parent = "later"
            [[body]]
            name = "later"
        "#;
        assert!(matches!(
            Model::from_toml(text, &Assets::new()),
            Err(PhysicsError::UnknownName { kind: "body", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            Model::from_toml("name = ", &Assets::new()),
            Err(PhysicsError::Parse { .. })
        ));
    }
}
