use leptos::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::WebGl2RenderingContext;

use crate::config::ShapesConfig;
use crate::error::SketchResult;
use crate::gpu::context::GlCanvas;
use crate::gpu::shapes::{self, FrameOffset, ShapeRenderer};
use crate::gpu::utils;

const CANVAS_ID: &str = "shapes-canvas";

thread_local! {
    // Bumped on every start and cleanup; a frame loop stops once its generation is stale.
    static ANIMATION_GENERATION: Cell<u32> = const { Cell::new(0) };
}

#[component]
pub fn ShapesSketch(config: ShapesConfig, #[prop(optional)] animate: bool) -> impl IntoView {
    Effect::new(move |_| {
        let config = config.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = utils::next_animation_frame().await {
                log::error!("Animation frame error: {:?}", e);
                return;
            }
            let result = if animate {
                start_animation(&config)
            } else {
                render_showcase(&config)
            };
            if let Err(e) = result {
                log::error!("Shapes sketch error: {}", e);
            }
        });
    });

    on_cleanup(|| {
        ANIMATION_GENERATION.with(|generation| generation.set(generation.get().wrapping_add(1)));
    });

    let caption = if animate {
        "The figure slides across the canvas, one step per frame"
    } else {
        "Points, lines, rectangles and a figure made of rectangles"
    };

    view! {
        <div>
            <canvas id=CANVAS_ID style="border: 1px solid black;"></canvas>
            <div style="margin-top: 10px; font-size: 12px; color: #666;">{caption}</div>
        </div>
    }
}

fn render_showcase(config: &ShapesConfig) -> SketchResult<()> {
    let canvas = utils::canvas_by_id(CANVAS_ID)?;
    let target = GlCanvas::new(&canvas, config.width, config.height)?;
    let renderer = ShapeRenderer::new(&target.gl)?;

    let scene = shapes::showcase();
    utils::clear_screen(&target.gl, config.clear_color);
    renderer.draw_all(&target.gl, &scene, [0.0, 0.0]);
    utils::check_error(&target.gl, "shapes draw")?;

    log::info!("Rendered {} shapes", scene.len());
    Ok(())
}

struct FigureLoop {
    gl: WebGl2RenderingContext,
    renderer: ShapeRenderer<WebGl2RenderingContext>,
    figure: Vec<shapes::Shape>,
    offset: FrameOffset,
    clear_color: [f32; 4],
}

impl FigureLoop {
    fn frame(&mut self) -> SketchResult<()> {
        let offset = self.offset.advance();
        utils::clear_screen(&self.gl, self.clear_color);
        self.renderer.draw_all(&self.gl, &self.figure, offset);
        utils::check_error(&self.gl, "figure frame")
    }
}

fn start_animation(config: &ShapesConfig) -> SketchResult<()> {
    let canvas = utils::canvas_by_id(CANVAS_ID)?;
    let target = GlCanvas::new(&canvas, config.width, config.height)?;
    let renderer = ShapeRenderer::new(&target.gl)?;

    let mut state = FigureLoop {
        gl: target.gl,
        renderer,
        figure: shapes::figure([0.0, 0.6], 1.0),
        offset: FrameOffset::new(config.step),
        clear_color: config.clear_color,
    };

    let generation = ANIMATION_GENERATION.with(|g| {
        let next = g.get().wrapping_add(1);
        g.set(next);
        next
    });

    // The closure re-schedules itself through this slot each frame
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let handle = callback.clone();

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if ANIMATION_GENERATION.with(|g| g.get()) != generation {
            log::debug!("figure animation stopped");
            let _ = handle.borrow_mut().take();
            return;
        }
        if let Err(e) = state.frame() {
            log::error!("Figure frame error: {}", e);
            let _ = handle.borrow_mut().take();
            return;
        }
        request_frame(&handle);
    }) as Box<dyn FnMut()>));

    request_frame(&callback);
    log::info!("Figure animation started");
    Ok(())
}

fn request_frame(callback: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(closure) = callback.borrow().as_ref() {
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}
