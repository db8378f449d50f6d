//! Rendering and post-processing configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    /// The disco room is 800 across, so 2000 keeps every wall in view
    pub far_plane: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            near_plane: 1.0,
            far_plane: 2000.0,
        }
    }
}

impl RenderConfig {
    /// Width over height of the window at setup
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Bloom pass settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bloom {
    /// Luminance above which pixels bloom (0 = everything)
    pub threshold: f32,

    /// Glow strength; rewritten every frame by the light modulator
    pub strength: f32,

    /// Blur spread (0..1)
    pub radius: f32,
}

/// Afterimage (frame feedback) pass settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Afterimage {
    /// Fraction of the previous frame kept (0..1); rewritten by the effects modulator
    pub damp: f32,
}

/// Film grain and scanline pass settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Film {
    /// Grain intensity (0..1)
    pub noise_intensity: f32,

    /// Scanline intensity (0..1)
    pub scanline_intensity: f32,

    /// Number of scanlines over the screen height
    pub scanline_count: f32,

    pub grayscale: bool,
}

/// Initial post-processing chain values
#[derive(Debug, Clone)]
pub struct PostEffects {
    pub bloom: Bloom,
    pub afterimage: Afterimage,
    pub film: Film,
}

impl Default for PostEffects {
    fn default() -> Self {
        Self {
            bloom: Bloom {
                threshold: 0.0,
                strength: 1.8,
                radius: 0.57,
            },
            afterimage: Afterimage { damp: 0.75 },
            film: Film {
                noise_intensity: 1.0,
                scanline_intensity: 0.25,
                scanline_count: 1080.0,
                grayscale: false,
            },
        }
    }
}
