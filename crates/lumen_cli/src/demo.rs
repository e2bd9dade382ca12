//! The built-in demo scene.

use lumen_core::{Color, DiffuseMaterial, Element, Material, MaterialMap, Scene, SceneResult};
use lumen_math::{DMat3, DVec3};

const INDIAN_RED: Color = Color::rgb(205, 92, 92);
const GOLD: Color = Color::rgb(212, 175, 55);

pub fn demo_scene() -> SceneResult<Scene> {
    let mut materials = MaterialMap::new();
    let floor = materials.push(Material::Checkerboard {
        size: 50.0,
        color1: Color::WHITE,
        color2: Color::BLACK,
    })?;
    let red = materials.push(Material::solid(INDIAN_RED))?;
    let glass = materials.push(Material::Diffuse(
        DiffuseMaterial::new(Color::GRAY)
            .with_reflectivity(0.6)
            .with_transparency(1.0)
            .with_refractive_index(1.3),
    ))?;
    let tinted_glass = materials.push(Material::Diffuse(
        DiffuseMaterial::new(Color::GRAY)
            .with_transparency(1.0)
            .with_refractive_index(1.3),
    ))?;
    let mirror = materials.push(Material::Diffuse(
        DiffuseMaterial::default().with_reflectivity(0.5),
    ))?;
    let bumpy = materials.push(Material::Diffuse(
        DiffuseMaterial::new(GOLD)
            .with_reflectivity(0.4)
            .with_bump(1.0, 1.0 / 40.0),
    ))?;
    let target_center = DVec3::new(-10.0, 110.0, 20.0);
    let target = materials.push(Material::Target {
        center: target_center,
        stripe_frequency: 5.0,
        color1: Color::RED,
        color2: Color::WHITE,
    })?;

    let back_wall = Element::aabb(
        DVec3::new(-50.0, 200.0, 10.0),
        DVec3::new(0.0, 210.0, 50.0),
        Some(red),
    );

    // A slab with two spheres carved out, above the glass sphere
    let carved_slab = Element::aabb(
        DVec3::new(-70.0, 120.0, 60.0),
        DVec3::new(10.0, 140.0, 112.0),
        None,
    )
    .subtraction(Element::sphere(DVec3::new(-40.0, 120.0, 86.0), 15.0, None))
    .subtraction(Element::sphere(DVec3::new(-10.0, 120.0, 86.0), 10.0, None))
    .with_material(mirror);

    let lens = Element::sphere(DVec3::new(90.0, 140.0, 70.0), 20.0, None)
        .intersection(Element::sphere(DVec3::new(110.0, 140.0, 70.0), 20.0, None))
        .with_material(tinted_glass)
        .bounding_sphere();

    let blob = Element::sphere(DVec3::new(-90.0, 160.0, 25.0), 18.0, None)
        .union(Element::ellipsoid(
            DVec3::new(-70.0, 160.0, 25.0),
            DVec3::new(20.0, 10.0, 10.0),
            None,
        ))
        .with_material(bumpy);

    let ring = Element::torus(DVec3::new(0.0, 100.0, 8.0), DVec3::Z, 25.0, 5.0, Some(mirror))
        .rotated(DMat3::from_rotation_x(0.3), DVec3::new(0.0, 100.0, 8.0));

    let cubes = Element::cube(DVec3::new(-120.0, 90.0, 0.0), 10.0, Some(red))
        .scaled(1.5, DVec3::new(-120.0, 90.0, 0.0))
        .repeated(DVec3::new(0.0, 25.0, 0.0), 5)
        .bounding_box();

    let root = Element::tuple(vec![
        back_wall,
        carved_slab,
        Element::sphere(DVec3::new(0.0, 150.0, 45.0), 30.0, Some(glass)),
        Element::cylinder(
            DVec3::new(60.0, 150.0, 0.0),
            DVec3::new(60.0, 150.0, 100.0),
            20.0,
            Some(tinted_glass),
        ),
        Element::ellipsoid(
            DVec3::new(-50.0, 90.0, 20.0),
            DVec3::new(20.0, 15.0, 10.0),
            Some(mirror),
        ),
        Element::disk(target_center, DVec3::Y, 12.0, Some(target)),
        lens,
        blob,
        ring,
        Element::array(vec![cubes]),
        Element::plane(DVec3::ZERO, DVec3::Z, Some(floor)),
    ]);

    Ok(Scene::new(root, materials))
}
