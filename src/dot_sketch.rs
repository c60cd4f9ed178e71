use leptos::prelude::*;

use crate::config::DotConfig;
use crate::error::SketchResult;
use crate::gpu::context::GlCanvas;
use crate::gpu::{dot, utils};
use crate::pixel_grid::hex_to_rgba;

const CANVAS_ID: &str = "dot-canvas";

#[component]
pub fn DotSketch(config: DotConfig) -> impl IntoView {
    // Draw after the canvas is in the DOM
    Effect::new(move |_| {
        let config = config.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = utils::next_animation_frame().await {
                log::error!("Animation frame error: {:?}", e);
                return;
            }
            if let Err(e) = render_dot(&config) {
                log::error!("Dot sketch error: {}", e);
            }
        });
    });

    view! {
        <div>
            <canvas id=CANVAS_ID style="border: 1px solid black;"></canvas>
            <div style="margin-top: 10px; font-size: 12px; color: #666;">
                "A single point drawn in the middle of the canvas"
            </div>
        </div>
    }
}

fn render_dot(config: &DotConfig) -> SketchResult<()> {
    let canvas = utils::canvas_by_id(CANVAS_ID)?;
    let target = GlCanvas::new(&canvas, config.width, config.height)?;

    let program = dot::create_dot_program(&target.gl, hex_to_rgba(&config.color)?)?;
    dot::draw_dot(&target.gl, &program, config.clear_color)?;

    log::info!("Dot rendered on {}x{} canvas", config.width, config.height);
    Ok(())
}
