use leptos::prelude::*;
use std::cell::RefCell;
use web_sys::{MouseEvent, WebGl2RenderingContext};

use crate::config::GridConfig;
use crate::error::SketchResult;
use crate::gpu::context::GlCanvas;
use crate::gpu::grid::GridRenderer;
use crate::gpu::utils;
use crate::pixel_grid::PixelGrid;

const CANVAS_ID: &str = "grid-canvas";

struct GridState {
    target: GlCanvas,
    renderer: GridRenderer<WebGl2RenderingContext>,
    grid: PixelGrid,
    paint_color: String,
    clear_color: [f32; 4],
}

thread_local! {
    static GRID_STATE: RefCell<Option<GridState>> = const { RefCell::new(None) };
}

#[component]
pub fn GridSketch(config: GridConfig) -> impl IntoView {
    let (painted, set_painted) = signal(0_usize);

    Effect::new(move |_| {
        let config = config.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = utils::next_animation_frame().await {
                log::error!("Animation frame error: {:?}", e);
                return;
            }
            if let Err(e) = init_grid(&config) {
                log::error!("Grid sketch initialization error: {}", e);
            }
        });
    });

    on_cleanup(|| {
        if let Some(state) = GRID_STATE.with(|state| state.borrow_mut().take()) {
            state.renderer.delete(&state.target.gl);
        }
    });

    view! {
        <div>
            <canvas
                id=CANVAS_ID
                style="border: 1px solid black; cursor: crosshair;"
                on:click=move |ev: MouseEvent| {
                    let (x, y) = (f64::from(ev.offset_x()), f64::from(ev.offset_y()));
                    match paint_at(x, y, ev.shift_key()) {
                        Ok(Some(count)) => set_painted.set(count),
                        Ok(None) => {}
                        Err(e) => log::error!("Grid sketch error: {}", e),
                    }
                }
            ></canvas>
            <div style="margin-top: 10px; font-size: 12px; color: #666;">
                {move || format!("{} cells painted - click to paint, shift+click to erase", painted.get())}
            </div>
        </div>
    }
}

fn init_grid(config: &GridConfig) -> SketchResult<()> {
    let canvas = utils::canvas_by_id(CANVAS_ID)?;

    // Physical pixels match the cell mapping, which scales click offsets by the pixel ratio
    let dpr = utils::device_pixel_ratio();
    let css_size = f64::from(config.size) / dpr;
    web_sys::HtmlElement::style(&canvas).set_property("width", &format!("{}px", css_size))?;
    web_sys::HtmlElement::style(&canvas).set_property("height", &format!("{}px", css_size))?;

    let target = GlCanvas::new(&canvas, config.size, config.size)?;
    let renderer = GridRenderer::new(&target.gl)?;
    let grid = PixelGrid::new(config.size, config.dot_size);
    renderer.draw(&target.gl, &grid, config.clear_color)?;

    log::info!(
        "Grid ready: {} cells of {}px per side",
        grid.cells_per_side(),
        grid.dot_size()
    );

    GRID_STATE.with(|state| {
        *state.borrow_mut() = Some(GridState {
            target,
            renderer,
            grid,
            paint_color: config.paint_color.clone(),
            clear_color: config.clear_color,
        });
    });
    Ok(())
}

/// Paints (or erases) the cell under a click and redraws. Returns the painted cell count.
fn paint_at(offset_x: f64, offset_y: f64, erase: bool) -> SketchResult<Option<usize>> {
    GRID_STATE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let Some(state) = slot.as_mut() else {
            return Ok(None);
        };
        let Some((x, y)) = state.grid.cell_at(offset_x, offset_y, utils::device_pixel_ratio()) else {
            return Ok(None);
        };

        let color = (!erase).then_some(state.paint_color.as_str());
        state.grid.record(x, y, color)?;
        log::debug!("cell ({}, {}) {}", x, y, if erase { "erased" } else { "painted" });

        state.renderer.draw(&state.target.gl, &state.grid, state.clear_color)?;
        Ok(Some(state.grid.pixels().len()))
    })
}
