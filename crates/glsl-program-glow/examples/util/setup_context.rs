// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glsl-program`.
//
// `glsl-program` is free software: you can redistribute it and/or modify it under the terms of
// either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glsl-program` is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License or the Mozilla Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glsl-program`. If not, see <https://www.gnu.org/licenses/>.

// Shared window, context and input plumbing for the demos.
// Uses glutin and winit. Each demo implements `util::Demo` and calls `util::run`.

#[allow(unused)]
mod util {
    use glsl_program::glam::Vec3;
    use glsl_program::{AppState, CameraMovement, ProgramBuilder, ShaderError, ShaderProgram};
    use glsl_program_glow::glow::{self, HasContext};
    use glsl_program_glow::GlowBackend;

    use glutin::config::{Config, ConfigTemplateBuilder};
    use glutin::context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext,
        PossiblyCurrentContext, Version,
    };
    use glutin::display::{Display, GetGlDisplay};
    use glutin::prelude::*;
    use glutin::surface::{Surface, SwapInterval, WindowSurface};
    use glutin_winit::{DisplayBuilder, GlWindow};

    use raw_window_handle::HasRawWindowHandle;

    use std::collections::HashSet;
    use std::error::Error;
    use std::mem;
    use std::num::NonZeroU32;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::time::Instant;

    use winit::dpi::PhysicalSize;
    use winit::event::{
        ElementState, Event, KeyboardInput, MouseScrollDelta, VirtualKeyCode, WindowEvent,
    };
    use winit::event_loop::{EventLoop, EventLoopWindowTarget};
    use winit::window::{CursorGrabMode, Window, WindowBuilder};

    pub(crate) const SCREEN_WIDTH: u32 = 800;
    pub(crate) const SCREEN_HEIGHT: u32 = 600;

    /// The background every demo clears to.
    pub(crate) const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

    /// Where the camera starts.
    pub(crate) const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 3.0);

    pub(crate) type Backend = GlowBackend<glow::Context>;

    /// One stage of the tutorial.
    pub(crate) trait Demo: Sized {
        /// The window title.
        const TITLE: &'static str;

        /// Whether the cursor should be hidden and grabbed for mouse look.
        const CAPTURE_MOUSE: bool = false;

        /// Set up programs, buffers and textures. The context is current.
        fn new(backend: Rc<Backend>, state: &mut AppState) -> Result<Self, Box<dyn Error>>;

        /// Draw one frame. `time` is in seconds since the window opened.
        fn draw(&mut self, state: &AppState, time: f32);
    }

    pub(crate) fn init() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    /// Directory holding the demo shaders.
    pub(crate) fn shader_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("examples")
            .join("shaders")
    }

    /// Path of a demo shader by file name.
    pub(crate) fn shader_path(name: &str) -> PathBuf {
        shader_dir().join(name)
    }

    /// Build the program named `name` from `shaders/{name}.vs` and `shaders/{name}.fs`.
    pub(crate) fn load_program(
        backend: &Rc<Backend>,
        name: &str,
    ) -> Result<ShaderProgram<Backend>, ShaderError> {
        ProgramBuilder::new()
            .version_header(backend.shader_header())
            .build_from_files(
                backend.clone(),
                shader_path(&format!("{name}.vs")),
                shader_path(&format!("{name}.fs")),
            )
    }

    /// The green and blue channels the demos cycle through over time.
    pub(crate) fn cycling_green_blue(time: f32) -> (f32, f32) {
        (time.sin() * 0.5 + 0.5, time.cos() * 0.5 + 0.5)
    }

    /// Match the viewport to the window and clear to the demo background.
    pub(crate) fn clear(gl: &glow::Context, state: &AppState) {
        let [r, g, b, a] = CLEAR_COLOR;
        let (width, height) = state.viewport;
        unsafe {
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    struct GlutinSetup {
        display: Display,
        config: Config,
        context: ContextType,
        window: Option<Window>,
    }

    enum ContextType {
        NotCurrent(NotCurrentContext),
        Current {
            context: PossiblyCurrentContext,
            window: Window,
            surface: Surface<WindowSurface>,
        },
        Hole,
    }

    impl Default for ContextType {
        fn default() -> Self {
            Self::Hole
        }
    }

    fn make_window_builder(title: &str) -> WindowBuilder {
        WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT))
    }

    impl GlutinSetup {
        fn new<T>(event_loop: &EventLoopWindowTarget<T>, title: &str) -> Result<Self, Box<dyn Error>> {
            // Windows needs the window before the config.
            let window = if cfg!(windows) {
                Some(make_window_builder(title))
            } else {
                None
            };

            let display = DisplayBuilder::new().with_window_builder(window);

            // Prefer more samples. Every demo past the first needs a depth buffer.
            let (window, gl_config) = display.build(
                event_loop,
                ConfigTemplateBuilder::new()
                    .with_alpha_size(8)
                    .with_depth_size(24),
                |configs| {
                    configs
                        .reduce(|accum, config| {
                            if config.num_samples() > accum.num_samples() {
                                config
                            } else {
                                accum
                            }
                        })
                        .expect("no suitable GL config")
                },
            )?;

            tracing::info!(
                samples = gl_config.num_samples(),
                depth = gl_config.depth_size(),
                "picked GL config"
            );

            // Ask for a 3.3 core context first, then fall back to GLES 3.0.
            let window_handle = window.as_ref().map(|w| w.raw_window_handle());
            let contexts = [
                ContextAttributesBuilder::new()
                    .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
                    .with_profile(GlProfile::Core)
                    .build(window_handle),
                ContextAttributesBuilder::new()
                    .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
                    .build(window_handle),
            ];

            let display = gl_config.display();
            let gl_handler = (|| {
                for context in &contexts {
                    if let Ok(gl_context) = unsafe { display.create_context(&gl_config, context) } {
                        return Ok(gl_context);
                    }
                }

                Err(Box::<dyn Error>::from("Could not create a context"))
            })()?;

            Ok(Self {
                display,
                config: gl_config,
                context: ContextType::NotCurrent(gl_handler),
                window,
            })
        }

        fn make_current<T>(
            &mut self,
            window_target: &EventLoopWindowTarget<T>,
            title: &str,
        ) -> Result<glow::Context, Box<dyn Error>> {
            let window = match self.window.take() {
                Some(window) => window,
                None => glutin_winit::finalize_window(
                    window_target,
                    make_window_builder(title),
                    &self.config,
                )?,
            };

            let attrs = window.build_surface_attributes(<_>::default());
            let gl_surface = unsafe {
                self.display
                    .create_window_surface(&self.config, &attrs)?
            };

            let gl_context = match mem::take(&mut self.context) {
                ContextType::NotCurrent(context) => context.make_current(&gl_surface)?,
                _ => return Err("context is already current".into()),
            };

            if let Err(err) = gl_surface
                .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
            {
                tracing::warn!("error setting vsync: {err:?}");
            }

            self.context = ContextType::Current {
                context: gl_context,
                window,
                surface: gl_surface,
            };

            let display = self.display.clone();
            let glow_context = unsafe {
                glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s) as *const _)
            };

            #[cfg(not(target_vendor = "apple"))]
            unsafe {
                glow_context.enable(glow::DEBUG_OUTPUT);
                glow_context.debug_message_callback(debug_message_callback);
            }

            Ok(glow_context)
        }

        fn window(&self) -> Option<&Window> {
            match &self.context {
                ContextType::Current { window, .. } => Some(window),
                _ => None,
            }
        }
    }

    fn capture_cursor(window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));

        if let Err(err) = grabbed {
            tracing::warn!("could not grab the cursor: {err}");
        }
        window.set_cursor_visible(false);
    }

    fn movement_for(key: VirtualKeyCode) -> Option<CameraMovement> {
        match key {
            VirtualKeyCode::W => Some(CameraMovement::Forward),
            VirtualKeyCode::S => Some(CameraMovement::Backward),
            VirtualKeyCode::A => Some(CameraMovement::Left),
            VirtualKeyCode::D => Some(CameraMovement::Right),
            _ => None,
        }
    }

    /// Open a window and run `D` until it is closed or Escape is pressed.
    pub(crate) fn run<D: Demo + 'static>() -> Result<(), Box<dyn Error>> {
        let event_loop = EventLoop::new();
        let mut setup = GlutinSetup::new(&event_loop, D::TITLE)?;

        let mut state = AppState::new((SCREEN_WIDTH, SCREEN_HEIGHT), CAMERA_START);
        let mut held_keys = HashSet::new();
        let mut demo: Option<D> = None;
        let start = Instant::now();

        event_loop.run(move |event, window_target, control_flow| {
            control_flow.set_poll();

            match event {
                Event::Resumed => {
                    if demo.is_some() {
                        return;
                    }

                    let built = setup
                        .make_current(window_target, D::TITLE)
                        .and_then(|context| {
                            // SAFETY: The context was just made current on this thread.
                            let backend = unsafe { GlowBackend::new(context)? };
                            D::new(Rc::new(backend), &mut state)
                        });

                    match built {
                        Ok(built) => demo = Some(built),
                        Err(err) => {
                            tracing::error!("failed to start demo: {err}");
                            control_flow.set_exit_with_code(1);
                            return;
                        }
                    }

                    if let Some(window) = setup.window() {
                        if D::CAPTURE_MOUSE {
                            capture_cursor(window);
                        }
                        let size = window.inner_size();
                        state.resized(size.width, size.height);
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) if size.width != 0 && size.height != 0 => {
                        if let ContextType::Current {
                            context, surface, ..
                        } = &setup.context
                        {
                            surface.resize(
                                context,
                                NonZeroU32::new(size.width).unwrap(),
                                NonZeroU32::new(size.height).unwrap(),
                            );
                            state.resized(size.width, size.height);
                        }
                    }
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode: Some(key),
                                state: key_state,
                                ..
                            },
                        ..
                    } => match (key, key_state) {
                        (VirtualKeyCode::Escape, ElementState::Pressed) => control_flow.set_exit(),
                        (key, ElementState::Pressed) => {
                            held_keys.insert(key);
                        }
                        (key, ElementState::Released) => {
                            held_keys.remove(&key);
                        }
                    },
                    WindowEvent::CursorMoved { position, .. } if D::CAPTURE_MOUSE => {
                        state.cursor_moved(position.x as f32, position.y as f32);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let y = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(position) => position.y as f32 / 20.0,
                        };
                        state.scrolled(y);
                    }
                    _ => (),
                },
                Event::RedrawEventsCleared => {
                    let (Some(demo), ContextType::Current {
                        context,
                        window,
                        surface,
                    }) = (demo.as_mut(), &setup.context)
                    else {
                        return;
                    };

                    let time = start.elapsed().as_secs_f32();
                    state.begin_frame(time);
                    for movement in held_keys.iter().copied().filter_map(movement_for) {
                        state.key_held(movement);
                    }

                    demo.draw(&state, time);

                    window.request_redraw();
                    if let Err(err) = surface.swap_buffers(context) {
                        tracing::error!("failed to swap buffers: {err}");
                        control_flow.set_exit_with_code(1);
                    }
                }
                Event::LoopDestroyed => {
                    // GL objects go away while the context is still current.
                    demo.take();
                }
                _ => (),
            }
        })
    }

    #[cfg(not(target_vendor = "apple"))]
    fn debug_message_callback(source: u32, ty: u32, id: u32, severity: u32, message: &str) {
        let source = match source {
            glow::DEBUG_SOURCE_API => "API",
            glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System",
            glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler",
            glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party",
            glow::DEBUG_SOURCE_APPLICATION => "Application",
            glow::DEBUG_SOURCE_OTHER => "Other",
            _ => "Unknown",
        };

        let ty = match ty {
            glow::DEBUG_TYPE_ERROR => "Error",
            glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behavior",
            glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behavior",
            glow::DEBUG_TYPE_PORTABILITY => "Portability",
            glow::DEBUG_TYPE_PERFORMANCE => "Performance",
            glow::DEBUG_TYPE_MARKER => "Marker",
            glow::DEBUG_TYPE_OTHER => "Other",
            _ => "Unknown",
        };

        match severity {
            glow::DEBUG_SEVERITY_HIGH => tracing::error!("{ty}-{id} ({source}): {message}"),
            glow::DEBUG_SEVERITY_MEDIUM => tracing::warn!("{ty}-{id} ({source}): {message}"),
            glow::DEBUG_SEVERITY_LOW => tracing::info!("{ty}-{id} ({source}): {message}"),
            glow::DEBUG_SEVERITY_NOTIFICATION => {
                tracing::debug!("{ty}-{id} ({source}): {message}")
            }
            _ => (),
        }
    }
}
