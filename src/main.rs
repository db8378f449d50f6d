//! Discosphere - An audio-reactive disco planet
//!
//! A wireframe shell breathes with the bass, a particle cloud swells with the
//! pad, trails smear with the lead and the lights swing with the hats.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Parser;
use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use discosphere::analysis::{SignalRouter, TrackBinding};
use discosphere::audio::AudioSystem;
use discosphere::cli::Args;
use discosphere::controls::command_for_key;
use discosphere::error::{FrameError, RenderError};
use discosphere::frame::{FrameDriver, FrameInput};
use discosphere::params::Settings;
use discosphere::rendering::Renderer;

const LEVEL_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Main application state
struct App {
    settings: Settings,
    track_paths: Vec<PathBuf>,

    // Window and rendering
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,

    audio: Option<AudioSystem>,
    driver: Option<FrameDriver>,

    start_time: Instant,
    last_level_log: Instant,

    /// Set when startup fails inside the event loop
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings, track_paths: Vec<PathBuf>) -> Self {
        Self {
            settings,
            track_paths,
            window: None,
            renderer: None,
            audio: None,
            driver: None,
            start_time: Instant::now(),
            last_level_log: Instant::now(),
            failure: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let render = &self.settings.render;
        let window_attributes = Window::default_attributes()
            .with_title("Discosphere")
            .with_inner_size(winit::dpi::LogicalSize::new(
                render.window_width,
                render.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        // The lens field of view is fixed from the window's aspect at setup
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            self.settings.render.window_width = size.width;
            self.settings.render.window_height = size.height;
        }

        let renderer = pollster::block_on(Renderer::new(Arc::clone(&window), &self.settings))
            .context("failed to initialize renderer")?;

        let audio = AudioSystem::new(
            &self.track_paths,
            &self.settings.analyser,
            &self.settings.playback,
        )
        .context("failed to initialize audio")?;

        let mut router = SignalRouter::new();
        let mut taps = audio.taps().into_iter().map(Some).collect::<Vec<_>>();
        for binding in TrackBinding::default_layout(audio.track_count()) {
            let tap = taps
                .get_mut(binding.track)
                .and_then(Option::take)
                .ok_or_else(|| anyhow!("no tap for track {}", binding.track + 1))?;
            router.attach(binding, Box::new(tap))?;
            info!("Track {} -> {:?}", binding.track + 1, binding.modulator);
        }

        info!(
            "{} tracks, {:.1}s session",
            audio.track_count(),
            audio.duration_secs()
        );
        info!("Discosphere is running!");
        info!("Space: play/pause, S: stop, 1-4: mute track, ESC: quit");

        self.driver = Some(FrameDriver::new(router, &self.settings));
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.audio = Some(audio);
        Ok(())
    }

    /// Render a single frame; false means the app should exit
    fn render_frame(&mut self) -> bool {
        let (Some(renderer), Some(audio), Some(driver)) =
            (&mut self.renderer, &self.audio, &mut self.driver)
        else {
            return true;
        };

        let input = FrameInput {
            time_ms: self.start_time.elapsed().as_secs_f64() * 1000.0,
            playing: audio.is_playing(),
        };

        match driver.frame(input, renderer) {
            Ok(()) => {
                if self.last_level_log.elapsed() >= LEVEL_LOG_INTERVAL {
                    self.last_level_log = Instant::now();
                    let report = driver.report();
                    debug!(
                        "levels: shell {:?}, cloud {:?}, effects {:?}, lights {:?}",
                        report.shell, report.cloud, report.effects, report.lights
                    );
                }
                true
            }
            Err(FrameError::Render(RenderError::Surface(
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
            ))) => {
                warn!("Surface lost, reconfiguring");
                renderer.reconfigure();
                true
            }
            Err(FrameError::Render(RenderError::Surface(wgpu::SurfaceError::Timeout))) => {
                warn!("Surface timeout, skipping frame");
                true
            }
            Err(e) => {
                error!("Frame failed: {}", e);
                false
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        if key == KeyCode::Escape {
            event_loop.exit();
            return;
        }
        let Some(audio) = &self.audio else {
            return;
        };
        if let Some(command) = command_for_key(key, audio.is_playing()) {
            if let Err(e) = audio.send(command) {
                warn!("Ignored {:?}: {}", command, e);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.initialize(event_loop) {
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(key, event_loop),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.render_frame() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (settings, track_paths) = Args::parse().into_settings()?;
    info!("Discosphere - audio-reactive disco planet");

    let mut app = App::new(settings, track_paths);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
