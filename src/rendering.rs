//! Rendering system with wgpu pipelines, post-processing chain and shader management.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use log::info;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::RenderError;
use crate::frame::Compositor;
use crate::params::{hex_to_linear, RenderConfig, Settings};
use crate::scene::{wireframe_indices, RenderState, SceneContent, ShellMesh, StaticMesh};

/// Offscreen color format (HDR so bloom and afterimage can exceed 1.0)
const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Ambient light level (linear)
const AMBIENT: f32 = 0.1;

/// Shell emissive strength
const SHELL_EMISSIVE: f32 = 0.75;

/// Vertex data for every scene mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Zero for unlit geometry (points)
    pub normal: [f32; 3],
    /// Linear RGB
    pub color: [f32; 3],
    /// Self-illumination as a fraction of `color`
    pub emissive: f32,
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3, 3 => Float32];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame camera and light uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = position, w = intensity
    pub light_a_position: [f32; 4],
    pub light_a_color: [f32; 4],
    pub light_b_position: [f32; 4],
    pub light_b_color: [f32; 4],
    pub ambient: [f32; 4],
}

impl SceneUniforms {
    fn from_state(state: &RenderState, aspect: f32, render_config: &RenderConfig) -> Self {
        let [a, b] = &state.lights;
        Self {
            view_proj: state.camera.view_proj(aspect, render_config).to_cols_array_2d(),
            light_a_position: a.position.extend(a.intensity).to_array(),
            light_a_color: a.color.extend(1.0).to_array(),
            light_b_position: b.position.extend(b.intensity).to_array(),
            light_b_color: b.color.extend(1.0).to_array(),
            ambient: [AMBIENT, AMBIENT, AMBIENT, 1.0],
        }
    }
}

/// Model transform for one draw
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
}

/// Afterimage, bloom and film parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PostUniforms {
    pub damp: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
    pub noise_intensity: f32,
    pub scanline_intensity: f32,
    pub scanline_count: f32,
    /// 1.0 = grayscale
    pub grayscale: f32,
    /// Seconds, wrapped to keep the grain hash precise
    pub time: f32,
    pub texel_x: f32,
    pub texel_y: f32,
    pub _padding: f32,
}

impl PostUniforms {
    fn from_state(state: &RenderState, width: u32, height: u32) -> Self {
        Self {
            damp: state.afterimage.damp,
            bloom_strength: state.bloom.strength,
            bloom_radius: state.bloom.radius,
            bloom_threshold: state.bloom.threshold,
            noise_intensity: state.film.noise_intensity,
            scanline_intensity: state.film.scanline_intensity,
            scanline_count: state.film.scanline_count,
            grayscale: if state.film.grayscale { 1.0 } else { 0.0 },
            time: ((state.clock_ms / 1000.0) % 1000.0) as f32,
            texel_x: 1.0 / width.max(1) as f32,
            texel_y: 1.0 / height.max(1) as f32,
            _padding: 0.0,
        }
    }
}

fn mesh_vertices(mesh: &StaticMesh, color: Vec3, emissive: f32) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: color.to_array(),
            emissive,
        })
        .collect()
}

fn shell_vertices(state: &RenderState, color: Vec3) -> Vec<Vertex> {
    state
        .shell
        .positions()
        .iter()
        .zip(state.shell.normals())
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: color.to_array(),
            emissive: SHELL_EMISSIVE,
        })
        .collect()
}

/// Size-dependent textures and the post bind groups that read them
struct RenderTargets {
    _textures: Vec<wgpu::Texture>,
    depth_view: wgpu::TextureView,
    scene_view: wgpu::TextureView,
    history_views: [wgpu::TextureView; 2],
    /// [i]: scene + history[i] -> history[1 - i]
    afterimage_bind_groups: [wgpu::BindGroup; 2],
    /// [i]: history[i] -> surface
    composite_bind_groups: [wgpu::BindGroup; 2],
}

impl RenderTargets {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        post_uniform_buffer: &wgpu::Buffer,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = |label: &str, format: wgpu::TextureFormat, usage: wgpu::TextureUsages| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };
        let color_usage =
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;

        let depth = texture("Depth Texture", DEPTH_FORMAT, wgpu::TextureUsages::RENDER_ATTACHMENT);
        let scene = texture("Scene Texture", HDR_FORMAT, color_usage);
        let history = [
            texture("Afterimage History A", HDR_FORMAT, color_usage),
            texture("Afterimage History B", HDR_FORMAT, color_usage),
        ];

        let view = |t: &wgpu::Texture| t.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = view(&depth);
        let scene_view = view(&scene);
        let history_views = [view(&history[0]), view(&history[1])];

        let bind_group = |label: &str, current: &wgpu::TextureView, previous: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: post_uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(current),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(previous),
                    },
                ],
            })
        };

        let afterimage_bind_groups = [
            bind_group("Afterimage Bind Group A", &scene_view, &history_views[0]),
            bind_group("Afterimage Bind Group B", &scene_view, &history_views[1]),
        ];
        // Composite reads a single texture; the second slot is bound to the same view
        let composite_bind_groups = [
            bind_group("Composite Bind Group A", &history_views[0], &history_views[0]),
            bind_group("Composite Bind Group B", &history_views[1], &history_views[1]),
        ];

        let [history_a, history_b] = history;
        Self {
            _textures: vec![depth, scene, history_a, history_b],
            depth_view,
            scene_view,
            history_views,
            afterimage_bind_groups,
            composite_bind_groups,
        }
    }
}

fn scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Disco walls are seen from inside, the planet from outside
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn post_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    entry_point: &str,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(entry_point),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_config: RenderConfig,

    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    afterimage_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    scene_uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    identity_bind_group: wgpu::BindGroup,
    cloud_uniform_buffer: wgpu::Buffer,
    cloud_bind_group: wgpu::BindGroup,
    post_uniform_buffer: wgpu::Buffer,
    post_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    /// Planet and disco room, drawn in one call
    static_vertex_buffer: wgpu::Buffer,
    static_vertex_count: u32,
    shell_vertex_buffer: wgpu::Buffer,
    shell_index_buffer: wgpu::Buffer,
    shell_index_count: u32,
    shell_color: Vec3,
    cloud_vertex_buffer: wgpu::Buffer,
    cloud_vertex_count: u32,

    targets: RenderTargets,
    /// History texture holding last frame's afterimage
    history_index: usize,
}

impl Renderer {
    /// Create new rendering system
    pub async fn new(window: Arc<Window>, settings: &Settings) -> Result<Self, RenderError> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        info!("GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Load shaders
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Post Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("post.wgsl").into()),
        });

        // Geometry
        let scene = &settings.scene;
        let content = SceneContent::build(scene);
        let palette = &scene.palette;

        let mut static_vertices = mesh_vertices(&content.planet, hex_to_linear(palette.orange), 0.0);
        static_vertices.extend(mesh_vertices(&content.disco, hex_to_linear(palette.tile), 0.0));

        let static_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Static Vertex Buffer"),
            contents: bytemuck::cast_slice(&static_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let shell_color = hex_to_linear(palette.blue);
        let shell_vertex_count = ShellMesh::new(&scene.shell).positions().len();
        let shell_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shell Vertex Buffer"),
            size: (shell_vertex_count * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shell_indices = wireframe_indices(shell_vertex_count);
        let shell_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shell Index Buffer"),
            contents: bytemuck::cast_slice(&shell_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let cloud_color = hex_to_linear(palette.white).to_array();
        let cloud_vertices: Vec<Vertex> = content
            .cloud_points
            .iter()
            .map(|p| Vertex {
                position: p.to_array(),
                normal: [0.0; 3],
                color: cloud_color,
                emissive: 1.0,
            })
            .collect();
        let cloud_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Vertex Buffer"),
            contents: bytemuck::cast_slice(&cloud_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Scene uniforms (group 0) and per-object transforms (group 1)
        let scene_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniform_buffer.as_entire_binding(),
            }],
        });

        let object_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Bind Group Layout"),
                entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
            });
        let object_buffer = |label: &str, model: Mat4| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[ObjectUniforms {
                    model: model.to_cols_array_2d(),
                }]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let object_bind_group = |label: &str, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &object_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let identity_buffer = object_buffer("Identity Uniform Buffer", Mat4::IDENTITY);
        let identity_bind_group = object_bind_group("Identity Bind Group", &identity_buffer);
        let cloud_uniform_buffer = object_buffer("Cloud Uniform Buffer", Mat4::IDENTITY);
        let cloud_bind_group = object_bind_group("Cloud Bind Group", &cloud_uniform_buffer);

        let scene_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = scene_pipeline(
            &device,
            &scene_pipeline_layout,
            &scene_shader,
            wgpu::PrimitiveTopology::TriangleList,
            "Mesh Pipeline",
        );
        let line_pipeline = scene_pipeline(
            &device,
            &scene_pipeline_layout,
            &scene_shader,
            wgpu::PrimitiveTopology::LineList,
            "Wireframe Pipeline",
        );
        let point_pipeline = scene_pipeline(
            &device,
            &scene_pipeline_layout,
            &scene_shader,
            wgpu::PrimitiveTopology::PointList,
            "Point Pipeline",
        );

        // Post chain
        let post_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Post Uniform Buffer"),
            size: std::mem::size_of::<PostUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let post_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Post Bind Group Layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    texture_entry(2),
                    texture_entry(3),
                ],
            });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Post Pipeline Layout"),
            bind_group_layouts: &[&post_bind_group_layout],
            push_constant_ranges: &[],
        });
        let afterimage_pipeline = post_pipeline(
            &device,
            &post_pipeline_layout,
            &post_shader,
            "fs_afterimage",
            HDR_FORMAT,
            "Afterimage Pipeline",
        );
        let composite_pipeline = post_pipeline(
            &device,
            &post_pipeline_layout,
            &post_shader,
            "fs_composite",
            config.format,
            "Composite Pipeline",
        );

        let targets = RenderTargets::new(
            &device,
            &post_bind_group_layout,
            &post_uniform_buffer,
            &sampler,
            config.width,
            config.height,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_config: settings.render.clone(),
            mesh_pipeline,
            line_pipeline,
            point_pipeline,
            afterimage_pipeline,
            composite_pipeline,
            scene_uniform_buffer,
            scene_bind_group,
            identity_bind_group,
            cloud_uniform_buffer,
            cloud_bind_group,
            post_uniform_buffer,
            post_bind_group_layout,
            sampler,
            static_vertex_count: static_vertices.len() as u32,
            static_vertex_buffer,
            shell_vertex_buffer,
            shell_index_buffer,
            shell_index_count: shell_indices.len() as u32,
            shell_color,
            cloud_vertex_count: cloud_vertices.len() as u32,
            cloud_vertex_buffer,
            targets,
            history_index: 0,
        })
    }

    /// Reconfigure the surface and rebuild size-dependent targets
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.targets = RenderTargets::new(
            &self.device,
            &self.post_bind_group_layout,
            &self.post_uniform_buffer,
            &self.sampler,
            width,
            height,
        );
        self.history_index = 0;
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn write_uniforms(&self, state: &RenderState) {
        if state.shell.is_dirty() {
            self.queue.write_buffer(
                &self.shell_vertex_buffer,
                0,
                bytemuck::cast_slice(&shell_vertices(state, self.shell_color)),
            );
        }

        let scene = SceneUniforms::from_state(state, self.aspect_ratio(), &self.render_config);
        self.queue
            .write_buffer(&self.scene_uniform_buffer, 0, bytemuck::cast_slice(&[scene]));

        let cloud = ObjectUniforms {
            model: Mat4::from_scale(state.cloud.scale).to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.cloud_uniform_buffer, 0, bytemuck::cast_slice(&[cloud]));

        let post = PostUniforms::from_state(state, self.config.width, self.config.height);
        self.queue
            .write_buffer(&self.post_uniform_buffer, 0, bytemuck::cast_slice(&[post]));
    }
}

impl Compositor for Renderer {
    fn present(&mut self, state: &RenderState) -> Result<(), RenderError> {
        self.write_uniforms(state);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let previous = self.history_index;
        let next = 1 - previous;

        // Scene into the HDR target
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.scene_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.scene_bind_group, &[]);

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(1, &self.identity_bind_group, &[]);
            pass.set_vertex_buffer(0, self.static_vertex_buffer.slice(..));
            pass.draw(0..self.static_vertex_count, 0..1);

            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.shell_vertex_buffer.slice(..));
            pass.set_index_buffer(self.shell_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.shell_index_count, 0, 0..1);

            pass.set_pipeline(&self.point_pipeline);
            pass.set_bind_group(1, &self.cloud_bind_group, &[]);
            pass.set_vertex_buffer(0, self.cloud_vertex_buffer.slice(..));
            pass.draw(0..self.cloud_vertex_count, 0..1);
        }

        // Afterimage: blend the new scene with last frame's history
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Afterimage Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.history_views[next],
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.afterimage_pipeline);
            pass.set_bind_group(0, &self.targets.afterimage_bind_groups[previous], &[]);
            pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        // Bloom and film onto the surface
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.composite_pipeline);
            pass.set_bind_group(0, &self.targets.composite_bind_groups[next], &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.history_index = next;
        Ok(())
    }
}
