//! Per-frame orchestration: rigs, routing, modulation, presentation.

use log::trace;

use crate::analysis::{ModulatorKind, SignalRouter};
use crate::camera::orbit_position;
use crate::error::{FrameError, RenderError, SpectrumError};
use crate::modulators::{
    deform_shell, modulate_effects, modulate_lights, scale_cloud, EffectLevels, LightLevels,
    ShellLevels,
};
use crate::noise::ShellNoise;
use crate::params::{AudioReactiveMapping, CameraRig, LightRig, Settings};
use crate::scene::RenderState;

/// Consumer of the finished render state
pub trait Compositor {
    fn present(&mut self, state: &RenderState) -> Result<(), RenderError>;
}

/// Per-frame inputs from the host loop
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Wall-clock time (milliseconds)
    pub time_ms: f64,
    /// Transport is playing
    pub playing: bool,
}

/// Levels each modulator produced this frame; `None` if it was skipped
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub shell: Option<ShellLevels>,
    pub cloud: Option<f32>,
    pub effects: Option<EffectLevels>,
    pub lights: Option<LightLevels>,
}

/// Owns the render state and drives one frame per redraw
pub struct FrameDriver {
    router: SignalRouter,
    state: RenderState,
    noise: ShellNoise,
    mapping: AudioReactiveMapping,
    camera_rig: CameraRig,
    light_rig: LightRig,
    camera_angle_deg: f32,
    light_angle_deg: f32,
    report: FrameReport,
}

impl FrameDriver {
    pub fn new(router: SignalRouter, settings: &Settings) -> Self {
        Self {
            router,
            state: RenderState::new(
                &settings.scene,
                &settings.post,
                settings.render.aspect_ratio(),
            ),
            noise: ShellNoise::new(settings.scene.seed),
            mapping: settings.mapping.clone(),
            camera_rig: settings.scene.camera.clone(),
            light_rig: settings.scene.lights.clone(),
            camera_angle_deg: 0.0,
            light_angle_deg: 0.0,
            report: FrameReport::default(),
        }
    }

    /// Advance rigs and apply every routed descriptor to the render state
    pub fn advance(&mut self, input: FrameInput) -> Result<&FrameReport, SpectrumError> {
        self.camera_angle_deg = (self.camera_angle_deg + self.camera_rig.velocity_deg).rem_euclid(360.0);
        if input.playing {
            self.light_angle_deg = (self.light_angle_deg + self.light_rig.velocity_deg).rem_euclid(360.0);
        }

        self.state.clock_ms = input.time_ms;
        self.state.camera.eye = orbit_position(self.camera_angle_deg, self.camera_rig.radius);

        self.router.poll()?;

        let mut report = FrameReport::default();
        for (binding, descriptor) in self.router.routes() {
            let Some(d) = descriptor else {
                continue;
            };

            match binding.modulator {
                ModulatorKind::Shell => {
                    report.shell = Some(deform_shell(
                        d,
                        &mut self.state.shell,
                        &self.noise,
                        input.time_ms,
                        &self.mapping.shell,
                    ));
                }
                ModulatorKind::Cloud => {
                    report.cloud = Some(scale_cloud(d, &mut self.state.cloud, &self.mapping.cloud));
                }
                ModulatorKind::Effects => {
                    report.effects = Some(modulate_effects(
                        d,
                        &mut self.state.afterimage,
                        &self.mapping.effects,
                    ));
                }
                ModulatorKind::Lights => {
                    report.lights = Some(modulate_lights(
                        d,
                        &mut self.state.lights,
                        &mut self.state.bloom,
                        self.light_angle_deg,
                        self.light_rig.radius,
                        &self.mapping.lights,
                    ));
                }
            }
        }

        trace!("frame {:.0} ms: {:?}", input.time_ms, report);
        self.report = report;
        Ok(&self.report)
    }

    /// Run one full frame and hand the result to `compositor`
    pub fn frame<C: Compositor>(
        &mut self,
        input: FrameInput,
        compositor: &mut C,
    ) -> Result<(), FrameError> {
        self.advance(input)?;
        compositor.present(&self.state)?;
        self.state.shell.mark_clean();
        Ok(())
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn report(&self) -> &FrameReport {
        &self.report
    }

    pub fn camera_angle_deg(&self) -> f32 {
        self.camera_angle_deg
    }

    pub fn light_angle_deg(&self) -> f32 {
        self.light_angle_deg
    }
}
