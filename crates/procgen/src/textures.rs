//! Procedural textures for particle effects.

use rand::Rng;

use crate::noise_field::NoiseField;

/// RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: (r.clamp(0.0, 1.0) * 255.0) as u8,
            g: (g.clamp(0.0, 1.0) * 255.0) as u8,
            b: (b.clamp(0.0, 1.0) * 255.0) as u8,
            a: (a.clamp(0.0, 1.0) * 255.0) as u8,
        }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Generated texture data
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl TextureData {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::new(0, 0, 0, 255); (width * height) as usize],
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = pixel;
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            Pixel::new(0, 0, 0, 255)
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.to_bytes());
        }
        bytes
    }
}

/// White texture whose alpha is a window of the shared noise field.
///
/// Each call picks a random window in `[0, 1000)²` so particles dissolve differently.
pub fn dissolve_texture<R: Rng>(
    noise: &NoiseField,
    size: u32,
    frequency: f32,
    rng: &mut R,
) -> TextureData {
    let mut texture = TextureData::new(size, size);
    let offset_x = rng.gen::<f32>() * 1000.0;
    let offset_y = rng.gen::<f32>() * 1000.0;

    for row in 0..size {
        for col in 0..size {
            let n = noise.sample(
                (row as f32 + offset_x) * frequency,
                (col as f32 + offset_y) * frequency,
            );
            let alpha = (n + 1.0) * 0.5;
            texture.set_pixel(col, row, Pixel::from_rgba(1.0, 1.0, 1.0, alpha));
        }
    }

    texture
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn dissolve_texture_is_white_with_varying_alpha() {
        let noise = NoiseField::new(4);
        let mut rng = StdRng::seed_from_u64(1);
        let tex = dissolve_texture(&noise, 64, 0.05, &mut rng);
        assert_eq!(tex.to_bytes().len(), 64 * 64 * 4);
        assert!(tex.pixels.iter().all(|p| p.r == 255 && p.g == 255 && p.b == 255));
        let min = tex.pixels.iter().map(|p| p.a).min().unwrap();
        let max = tex.pixels.iter().map(|p| p.a).max().unwrap();
        assert!(max > min);
    }

    #[test]
    fn each_texture_gets_its_own_window() {
        let noise = NoiseField::new(4);
        let mut rng = StdRng::seed_from_u64(9);
        let a = dissolve_texture(&noise, 16, 0.05, &mut rng);
        let b = dissolve_texture(&noise, 16, 0.05, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut tex = TextureData::new(2, 2);
        tex.set_pixel(5, 5, Pixel::new(1, 2, 3, 4));
        assert_eq!(tex.get_pixel(5, 5), Pixel::new(0, 0, 0, 255));
    }
}
