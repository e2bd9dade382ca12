//! Reflection, refraction and Fresnel terms.
//!
//! `incident` is the travel direction of the ray; `normal` may face either
//! side of the surface, the functions work out which medium the ray is in.

use lumen_math::DVec3;

/// Mirror `direction` across `normal`: `d - 2(d·n)n`.
pub fn reflect(direction: DVec3, normal: DVec3) -> DVec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Direction of the refracted ray by Snell's law, or `None` on total
/// internal reflection.
pub fn refract(incident: DVec3, normal: DVec3, refractive_index: f64) -> Option<DVec3> {
    let mut cosi = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, refractive_index);
    let mut n = normal;

    if cosi < 0.0 {
        cosi = -cosi;
    } else {
        std::mem::swap(&mut etai, &mut etat);
        n = -normal;
    }

    let eta = etai / etat;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        return None;
    }

    Some(eta * incident + (eta * cosi - k.sqrt()) * n)
}

/// Fraction of light reflected and transmitted at the surface, from the
/// averaged s- and p-polarized Fresnel terms. The pair sums to 1.
pub fn fresnel(incident: DVec3, normal: DVec3, refractive_index: f64) -> (f64, f64) {
    let cosi = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, refractive_index);
    if cosi > 0.0 {
        std::mem::swap(&mut etai, &mut etat);
    }

    let sint = etai / etat * (1.0 - cosi * cosi).max(0.0).sqrt();
    if sint >= 1.0 {
        return (1.0, 0.0);
    }

    let cost = (1.0 - sint * sint).max(0.0).sqrt();
    let cosi = cosi.abs();
    let rs = ((etat * cosi) - (etai * cost)) / ((etat * cosi) + (etai * cost));
    let rp = ((etai * cosi) - (etat * cost)) / ((etai * cosi) + (etat * cost));
    let reflectance = (rs * rs + rp * rp) / 2.0;

    (reflectance, 1.0 - reflectance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect() {
        let d = DVec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, DVec3::Y);
        assert!((r - DVec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-12);
    }

    #[test]
    fn test_refract_straight_through_at_normal_incidence() {
        let r = refract(-DVec3::Z, DVec3::Z, 1.5).unwrap();
        assert!((r.normalize() + DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_refract_bends_toward_normal_entering_denser_medium() {
        let incident = DVec3::new(1.0, 0.0, -1.0).normalize();
        let r = refract(incident, DVec3::Z, 1.5).unwrap().normalize();

        // sin(theta_t) = sin(45deg) / 1.5
        let expected = (std::f64::consts::FRAC_1_SQRT_2 / 1.5).asin();
        assert!((r.x.asin() - expected).abs() < 1e-9);
        assert!(r.z < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at a grazing angle, with the normal facing out.
        let incident = DVec3::new(1.0, 0.0, 0.2).normalize();
        assert!(refract(incident, DVec3::Z, 1.5).is_none());
        assert_eq!(fresnel(incident, DVec3::Z, 1.5), (1.0, 0.0));
    }

    #[test]
    fn test_fresnel_terms_sum_to_one() {
        for angle in [0.0f64, 0.3, 0.7, 1.2, 1.5] {
            let incident = DVec3::new(angle.sin(), 0.0, -angle.cos());
            let (r, t) = fresnel(incident, DVec3::Z, 1.5);
            assert!((r + t - 1.0).abs() < 1e-12);
            assert!((0.0..=1.0).contains(&r));
        }

        // Glass at normal incidence reflects about 4%
        let (r, _) = fresnel(-DVec3::Z, DVec3::Z, 1.5);
        assert!((r - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_matching_media_transmit_everything() {
        let incident = DVec3::new(0.3, 0.0, -1.0).normalize();
        let (r, t) = fresnel(incident, DVec3::Z, 1.0);
        assert!(r.abs() < 1e-12);
        assert!((t - 1.0).abs() < 1e-12);
    }
}
