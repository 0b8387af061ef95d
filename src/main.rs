use std::sync::Arc;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};
use trackball_viewer::app::{AppContext, HELP};
use trackball_viewer::cli::Cli;
use trackball_viewer::clock::Clock;
use trackball_viewer::config::ViewerConfig;
use trackball_viewer::input::InputEvent;
use trackball_viewer::renderer::{Frame, SceneRenderer};

// === Application ===

struct App {
    config: ViewerConfig,
    show_hud: bool,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    context: AppContext,
    clock: Clock,
}

impl App {
    fn new(config: ViewerConfig, show_hud: bool) -> Self {
        let context = AppContext::new(&config);
        Self {
            config,
            show_hud,
            window: None,
            renderer: None,
            context,
            clock: Clock::new(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        self.context.tick(delta);

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        let context = &self.context;
        let (spheres, rings) = context.scene.instances(context.toggles.texcoords);
        let rings = if context.toggles.rings { rings } else { Vec::new() };
        let hud = context.hud();

        let frame = Frame {
            camera: &context.camera,
            spheres: &spheres,
            rings: &rings,
            wireframe: context.toggles.wireframe,
            hud: self.show_hud.then_some(&hud),
        };

        match renderer.render(window, &frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(SceneRenderer::new(
            window.clone(),
            self.config.scene.tessellation,
        )) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = renderer.size();
        self.context.on_resize(width, height);
        self.clock.reset();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let hud_consumed = match (&mut self.renderer, &self.window) {
            (Some(renderer), Some(window)) if self.show_hud => renderer.handle_event(window, &event),
            _ => false,
        };

        if let Some(input) = InputEvent::from_window_event(&event) {
            if !hud_consumed || self.context.overrides_hud(&input) {
                self.context.handle_input(input);
                if self.context.exit_requested() {
                    event_loop.exit();
                }
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.context.on_resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, !cli.no_ui);

    println!("{}", HELP);
    event_loop.run_app(&mut app)?;

    Ok(())
}
