//! Fractal noise sampling built on FastNoiseLite.
//!
//! Every sample is a pure function of the seed, the coordinates and the
//! layer parameters, so two chunks asking for the same world position always
//! agree.

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Amplitude falloff between octaves of the 3D density fields.
const DENSITY_PERSISTENCE: f32 = 0.5;
const LACUNARITY: f32 = 2.0;

/// Seeded coherent noise with fractal (fBm) sampling helpers.
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Frequency is applied per octave in `fbm`
        noise.set_frequency(Some(1.0));
        NoiseField { noise }
    }

    /// 3D fractal density in `[0, 1]`.
    ///
    /// `smoothing` is the base frequency; each of the `octaves` doubles it and
    /// halves the amplitude.
    pub fn sample(&self, x: f32, y: f32, z: f32, smoothing: f32, octaves: u32) -> f32 {
        self.fbm(octaves, smoothing, DENSITY_PERSISTENCE, |f| {
            self.noise.get_noise_3d(x * f, y * f, z * f)
        })
    }

    /// 2D fractal height field in `[0, 1]`.
    pub fn sample_2d(&self, x: f32, z: f32, smoothing: f32, octaves: u32, persistence: f32) -> f32 {
        self.fbm(octaves, smoothing, persistence, |f| {
            self.noise.get_noise_2d(x * f, z * f)
        })
    }

    fn fbm(
        &self,
        octaves: u32,
        smoothing: f32,
        persistence: f32,
        basis: impl Fn(f32) -> f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = smoothing;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += basis(frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= LACUNARITY;
        }

        if max_value <= 0.0 {
            return 0.5;
        }

        ((total / max_value + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_is_deterministic() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for i in 0..64 {
            let (x, y, z) = (i as f32 * 3.7, i as f32 * -1.3, i as f32 * 11.0);
            let first = a.sample(x, y, z, 0.09, 3);
            assert_eq!(first.to_bits(), a.sample(x, y, z, 0.09, 3).to_bits());
            assert_eq!(first.to_bits(), b.sample(x, y, z, 0.09, 3).to_bits());
            assert_eq!(
                a.sample_2d(x, z, 0.01, 4, 0.5).to_bits(),
                b.sample_2d(x, z, 0.01, 4, 0.5).to_bits()
            );
        }
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(7);
        for x in -20..20 {
            for z in -20..20 {
                let v = field.sample(x as f32, 5.0, z as f32, 0.13, 4);
                assert!((0.0..=1.0).contains(&v), "{v}");
                let h = field.sample_2d(x as f32, z as f32, 0.05, 3, 0.7);
                assert!((0.0..=1.0).contains(&h), "{h}");
            }
        }
    }

    #[test]
    fn zero_octaves_is_neutral() {
        let field = NoiseField::new(1);
        assert_eq!(field.sample(1.0, 2.0, 3.0, 0.1, 0), 0.5);
    }

    #[test]
    fn field_varies_over_space() {
        let field = NoiseField::new(3);
        let first = field.sample(0.5, 0.5, 0.5, 0.09, 3);
        let differs = (1..50).any(|i| field.sample(i as f32 * 7.0, 0.5, 0.5, 0.09, 3) != first);
        assert!(differs);
    }
}
