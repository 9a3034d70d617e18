//! CPU twin of the vertex shader's wave elevation function.
//!
//! `shader.wgsl` computes the same sine product and the same classic-Perlin
//! octave sum on the GPU. Keeping a gradient-for-gradient Rust port of that
//! math makes the displacement reviewable and testable without a device, and
//! feeds the headless summary mode.

use glam::Vec3;

use crate::params::WaveParams;

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

fn taylor_inv_sqrt(r: f32) -> f32 {
    1.79284291400159 - 0.85373472095314 * r
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn step(edge: f32, x: f32) -> f32 {
    if x >= edge {
        1.0
    } else {
        0.0
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Gradient for one lattice corner, derived from its permutation hash the
/// same way the shader derives it.
fn corner_gradient(hash: f32) -> Vec3 {
    let gx = hash * (1.0 / 7.0);
    let gy = fract(gx.floor() * (1.0 / 7.0)) - 0.5;
    let gx = fract(gx);
    let gz = 0.5 - gx.abs() - gy.abs();
    let sz = step(gz, 0.0);
    let gx = gx - sz * (step(0.0, gx) - 0.5);
    let gy = gy - sz * (step(0.0, gy) - 0.5);
    let g = Vec3::new(gx, gy, gz);
    g * taylor_inv_sqrt(g.dot(g))
}

/// Classic 3-D Perlin noise, mod-289 permutation formulation.
///
/// Mirrors `cnoise` in `shader.wgsl` corner for corner; the scalar arithmetic
/// here matches the shader's vectorized form exactly.
pub fn perlin3(p: Vec3) -> f32 {
    let pi0 = p.floor();
    let pf0 = p - pi0;
    let pf1 = pf0 - Vec3::ONE;

    let ix = [mod289(pi0.x), mod289(pi0.x + 1.0)];
    let iy = [mod289(pi0.y), mod289(pi0.y + 1.0)];
    let iz = [mod289(pi0.z), mod289(pi0.z + 1.0)];

    let mut n = [0.0f32; 8];
    for corner in 0..8usize {
        let cx = corner & 1;
        let cy = (corner >> 1) & 1;
        let cz = (corner >> 2) & 1;

        let hash = permute(permute(permute(ix[cx]) + iy[cy]) + iz[cz]);
        let g = corner_gradient(hash);

        let d = Vec3::new(
            if cx == 0 { pf0.x } else { pf1.x },
            if cy == 0 { pf0.y } else { pf1.y },
            if cz == 0 { pf0.z } else { pf1.z },
        );
        n[corner] = g.dot(d);
    }

    let fx = fade(pf0.x);
    let fy = fade(pf0.y);
    let fz = fade(pf0.z);

    let n00 = lerp(n[0], n[4], fz);
    let n10 = lerp(n[1], n[5], fz);
    let n01 = lerp(n[2], n[6], fz);
    let n11 = lerp(n[3], n[7], fz);
    let n0 = lerp(n00, n01, fy);
    let n1 = lerp(n10, n11, fy);

    2.2 * lerp(n0, n1, fx)
}

/// Surface elevation at world (x, z), the displacement the vertex shader
/// applies: a product of two sines for the big swell, minus three folded
/// Perlin octaves for the chop.
pub fn surface_elevation(x: f32, z: f32, time_s: f32, params: &WaveParams) -> f32 {
    let phase = time_s * params.wave_speed;
    let mut elevation = (x * params.frequency[0] + phase).sin()
        * (z * params.frequency[1] + phase).sin()
        * params.wavelength;

    for i in 1..=3 {
        let octave = i as f32;
        let noise = perlin3(Vec3::new(
            x * params.small_wave_frequency * octave,
            z * params.small_wave_frequency * octave,
            time_s * params.small_wave_speed,
        ));
        elevation -= (noise * params.small_wave_elevation / octave).abs();
    }

    elevation
}
