//! Fixed scene content: rigs, meshes, palette.

use glam::Vec3;

/// Scene palette (sRGB hex colors)
#[derive(Debug, Clone)]
pub struct Palette {
    pub purple: u32,
    pub magenta: u32,
    pub orange: u32,
    pub blue: u32,
    /// Disco wall tiles
    pub tile: u32,
    /// Cloud points
    pub white: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            purple: 0x463190,
            magenta: 0xe62695,
            orange: 0xf99b1d,
            blue: 0x5edaa4,
            tile: 0x555555,
            white: 0xffffff,
        }
    }
}

/// Convert a `0xRRGGBB` color to linear RGB
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Orbiting camera rig
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Angle advance per frame (degrees), independent of playback
    pub velocity_deg: f32,

    /// Orbit radius (world units)
    pub radius: f32,

    /// Cinematic lens focal length (millimeters, 35 mm film gauge)
    pub focal_length_mm: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            velocity_deg: 0.1,
            radius: 100.0,
            focal_length_mm: 15.0,
        }
    }
}

/// Orbiting point-light rig
#[derive(Debug, Clone)]
pub struct LightRig {
    /// Angle advance per frame while playing (degrees)
    pub velocity_deg: f32,

    /// Outer orbit radius (world units)
    /// Silence orbits at three quarters of it; loud tracks pull the lights in to half
    pub radius: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            velocity_deg: 1.0,
            radius: 400.0,
        }
    }
}

/// Icosphere mesh parameters
#[derive(Debug, Clone)]
pub struct SphereParams {
    /// Rest radius (world units)
    pub radius: f32,

    /// Subdivisions per icosahedron edge, minus one
    pub detail: u32,
}

/// Particle cloud around the planet
#[derive(Debug, Clone)]
pub struct CloudParams {
    /// Number of points
    pub count: usize,

    /// Mean shell radius (world units)
    pub radius: f32,

    /// Furthest inward offset from `radius`
    pub inner_spread: f32,

    /// Furthest outward offset from `radius`
    pub outer_spread: f32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            count: 2000,
            radius: 75.0,
            inner_spread: 50.0,
            outer_spread: 50.0,
        }
    }
}

/// Tiled disco room enclosing the scene
#[derive(Debug, Clone)]
pub struct DiscoParams {
    /// Room edge length (world units)
    pub size: f32,

    /// Tiles per wall edge
    pub length: usize,

    /// Gap between tiles (world units)
    pub gap: f32,
}

impl Default for DiscoParams {
    fn default() -> Self {
        Self {
            size: 800.0,
            length: 10,
            gap: 10.0,
        }
    }
}

impl DiscoParams {
    /// Edge length of one tile
    pub fn tile_size(&self) -> f32 {
        (self.size - (self.length as f32 - 1.0) * self.gap) / self.length as f32
    }
}

/// Everything the fixed scene is built from
#[derive(Debug, Clone)]
pub struct SceneParams {
    pub palette: Palette,
    pub camera: CameraRig,
    pub lights: LightRig,
    /// Audio-deformed wireframe shell
    pub shell: SphereParams,
    /// Solid inner planet
    pub planet: SphereParams,
    pub cloud: CloudParams,
    pub disco: DiscoParams,
    /// Seed for the shell noise field and the cloud layout
    pub seed: u32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            camera: CameraRig::default(),
            lights: LightRig::default(),
            shell: SphereParams {
                radius: 25.0,
                detail: 2,
            },
            planet: SphereParams {
                radius: 10.0,
                detail: 1,
            },
            cloud: CloudParams::default(),
            disco: DiscoParams::default(),
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_to_linear() {
        assert_eq!(hex_to_linear(0x000000), Vec3::ZERO);
        assert_relative_eq!(hex_to_linear(0xffffff).x, 1.0);
        let magenta = hex_to_linear(0xe62695);
        assert!(magenta.x > magenta.z && magenta.z > magenta.y);
    }

    #[test]
    fn test_tiles_fill_the_wall() {
        let disco = DiscoParams::default();
        let covered = disco.tile_size() * disco.length as f32
            + disco.gap * (disco.length as f32 - 1.0);
        assert_relative_eq!(covered, disco.size, epsilon = 1e-3);
    }
}
