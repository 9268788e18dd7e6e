//! Core application state and lifecycle.

use kurbo::{Point, Rect, Size};
use onoff_core::OnOffButton;
use onoff_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::{Device, PresentMode, Queue, TextureView};
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::ui::{UiAction, UiState, render_ui};

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    button_renderer: VelloRenderer,
    /// Converts the Rgba8 render target to the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    button: OnOffButton,
    /// Last cursor position in logical coordinates.
    cursor: Point,
}

impl AppState {
    /// Logical size of the window.
    fn logical_size(&self) -> Size {
        let scale = self.window.scale_factor();
        Size::new(
            self.surface.config.width as f64 / scale,
            self.surface.config.height as f64 / scale,
        )
    }

    /// Keep the button centered in the window.
    fn center_button(&mut self, side: f64) {
        let size = self.logical_size();
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        self.button
            .set_frame(Rect::from_center_size(center, Size::new(side, side)));
    }

    fn apply_ui_action(&mut self, action: UiAction) {
        if let UiAction::ShowLayerBounds(show) = action {
            self.ui_state.show_layer_bounds = show;
            return;
        }
        log::debug!("UI action: {:?}", action);
        action.apply(&mut self.button);
    }

    fn apply_shortcut(&mut self, action: ShortcutAction, event_loop: &ActiveEventLoop) {
        match action {
            ShortcutAction::Toggle => self.button.toggle(),
            ShortcutAction::ToggleLayerBounds => {
                self.ui_state.show_layer_bounds = !self.ui_state.show_layer_bounds;
            }
            ShortcutAction::ToggleControls => {
                self.ui_state.controls_visible = !self.ui_state.controls_visible;
            }
            ShortcutAction::Quit => event_loop.exit(),
        }
    }
}

/// Render `scene` into a fresh Rgba8 texture and return its view.
///
/// Vello's compute pipeline needs a storage-bindable Rgba8 target; the result
/// is blitted to the surface afterwards.
fn render_scene(
    renderer: &mut vello::Renderer,
    device: &Device,
    queue: &Queue,
    scene: &Scene,
    params: &RenderParams,
) -> RenderResult<TextureView> {
    let texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("vello render texture"),
        size: vello::wgpu::Extent3d {
            width: params.width,
            height: params.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    renderer
        .render_to_texture(device, queue, scene, &view, params)
        .map_err(|e| RendererError::RenderFailed(format!("{e:?}")))?;
    Ok(view)
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application until the window closes.
    pub fn run(config: AppConfig) -> Result<(), winit::error::EventLoopError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::with_config(config);
        event_loop.run_app(&mut app)
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let Some(render_cx) = self.render_cx.as_ref() else {
            log::error!("Render context missing");
            return;
        };
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = match vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(format!("{e:?}")))
        {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        // Validated when the config was loaded; defaults otherwise.
        let button = OnOffButton::from_config(&self.config.button).unwrap_or_else(|e| {
            log::warn!("Invalid button config, using defaults: {}", e);
            OnOffButton::new()
        });

        log::info!(
            "OnOff initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!("Keyboard shortcuts:");
        ShortcutRegistry::log_all();

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            button_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            button,
            cursor: Point::ZERO,
        };
        state.center_button(self.config.button_size);
        state.ui_state.sync_from(&state.button);
        self.state = Some(state);

        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);

        let surface = match pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        )) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {:?}", e);
                event_loop.exit();
                return;
            }
        };

        // The surface borrows the window, which the App keeps alive alongside it.
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
        self.finish_init(window, surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.center_button(self.config.button_size);
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.center_button(self.config.button_size);
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = state.window.scale_factor();
                state.cursor = Point::new(position.x / scale, position.y / scale);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if egui_wants_input {
                    return;
                }
                if state.button.handle_tap(state.cursor) {
                    log::debug!("Tapped, checked = {}", state.button.is_checked());
                    state.window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let Some(action) = ShortcutRegistry::action_for(&event.logical_key) {
                    state.apply_shortcut(action, event_loop);
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                state.button.tick();
                state.ui_state.sync_from(&state.button);

                // Run egui and get any actions
                let egui_input = state.egui_state.take_egui_input(&state.window);
                let mut ui_action = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    ui_action = render_ui(ctx, &mut state.ui_state);
                });
                if let Some(action) = ui_action {
                    state.apply_ui_action(action);
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let render_ctx =
                    RenderContext::new(&state.button, Size::new(width as f64, height as f64))
                        .with_scale_factor(state.window.scale_factor())
                        .with_background(self.config.background())
                        .with_layer_bounds(state.ui_state.show_layer_bounds);
                state.button_renderer.build_scene(&render_ctx);
                let base_color = state.button_renderer.background_color(&render_ctx);
                let scene = state.button_renderer.take_scene();

                // Render
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };

                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state
                    .surface
                    .surface
                    .get_current_texture()
                    .map_err(|e| RendererError::Surface(format!("{e:?}")))
                {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("{}", e);
                        return;
                    }
                };

                let params = RenderParams {
                    base_color,
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                let render_texture_view = match render_scene(
                    &mut state.vello_renderer,
                    device,
                    queue,
                    &scene,
                    &params,
                ) {
                    Ok(view) => view,
                    Err(e) => {
                        log::error!("{}", e);
                        return;
                    }
                };

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                {
                    let mut blit_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("blit encoder"),
                        });

                    state.texture_blitter.copy(
                        device,
                        &mut blit_encoder,
                        &render_texture_view,
                        &surface_view,
                    );

                    queue.submit(std::iter::once(blit_encoder.finish()));
                }

                for (id, image_delta) in &egui_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(device, queue, *id, image_delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: egui_output.pixels_per_point,
                };

                {
                    let mut egui_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("egui encoder"),
                        });

                    state.egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut egui_encoder,
                        &egui_primitives,
                        &screen_descriptor,
                    );

                    let render_pass =
                        egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                            label: Some("egui render pass"),
                            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                                view: &surface_view,
                                resolve_target: None,
                                ops: vello::wgpu::Operations {
                                    load: vello::wgpu::LoadOp::Load,
                                    store: vello::wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                    // egui-wgpu wants a 'static render pass.
                    let mut render_pass = render_pass.forget_lifetime();
                    state
                        .egui_renderer
                        .render(&mut render_pass, &egui_primitives, &screen_descriptor);
                    drop(render_pass);

                    queue.submit(std::iter::once(egui_encoder.finish()));
                }

                for id in &egui_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }
                surface_texture.present();

                let egui_busy = egui_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .is_some_and(|viewport| viewport.repaint_delay.is_zero());
                if state.button.is_animating() || egui_busy {
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
