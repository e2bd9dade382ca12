//! Hash-based value noise used to bump surface normals.
//!
//! No RNG state is involved: the same point always yields the same value,
//! which keeps repeated renders byte-identical.

use lumen_math::DVec3;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn lattice_hash(seed: u64, x: i64, y: i64, z: i64) -> u64 {
    let mut h = FNV_OFFSET_BASIS ^ seed;
    for v in [x, y, z] {
        for byte in v.to_le_bytes() {
            h ^= u64::from(byte);
            h = h.wrapping_mul(FNV_PRIME);
        }
    }
    h
}

/// Lattice value in [-1, 1].
fn lattice_value(seed: u64, x: i64, y: i64, z: i64) -> f64 {
    let h = lattice_hash(seed, x, y, z) >> 11;
    (h as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Trilinearly interpolated value noise in [-1, 1].
pub fn value_noise(seed: u64, point: DVec3) -> f64 {
    let base = point.floor();
    let frac = point - base;
    let (x0, y0, z0) = (base.x as i64, base.y as i64, base.z as i64);
    let (u, v, w) = (smoothstep(frac.x), smoothstep(frac.y), smoothstep(frac.z));

    let corner = |dx: i64, dy: i64, dz: i64| lattice_value(seed, x0 + dx, y0 + dy, z0 + dz);
    let lerp = |a: f64, b: f64, t: f64| a + (b - a) * t;

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);

    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
}

/// Normal perturbed by a noise field sampled at `point * frequency`.
///
/// Returns `normal` unchanged when `magnitude` is not positive.
pub fn bump_normal(normal: DVec3, point: DVec3, frequency: f64, magnitude: f64) -> DVec3 {
    if magnitude <= 0.0 {
        return normal;
    }

    let p = point * frequency;
    let offset = DVec3::new(value_noise(1, p), value_noise(2, p), value_noise(3, p));
    let bumped = (normal + offset * magnitude).normalize_or_zero();

    if bumped == DVec3::ZERO {
        normal
    } else {
        bumped
    }
}
