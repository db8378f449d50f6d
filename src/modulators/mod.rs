//! Visual modulators: each maps one track's descriptor onto part of the render state.

mod cloud;
mod effects;
mod lights;
mod shell;

pub use cloud::{cloud_scale, scale_cloud};
pub use effects::{effect_levels, modulate_effects, EffectLevels};
pub use lights::{light_levels, modulate_lights, LightLevels};
pub use shell::{deform_shell, shell_levels, ShellLevels};
