use leptos::prelude::*;

use crate::config::SketchConfig;
use crate::dot_sketch::DotSketch;
use crate::grid_sketch::GridSketch;
use crate::shapes_sketch::ShapesSketch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sketch {
    Dot,
    Grid,
    Shapes,
    Figure,
}

impl Sketch {
    pub const ALL: [Sketch; 4] = [Sketch::Dot, Sketch::Grid, Sketch::Shapes, Sketch::Figure];

    pub fn label(self) -> &'static str {
        match self {
            Sketch::Dot => "Draw Dot",
            Sketch::Grid => "Paint Grid",
            Sketch::Shapes => "Draw Shapes",
            Sketch::Figure => "Animate Figure",
        }
    }
}

#[component]
pub fn App(config: SketchConfig) -> impl IntoView {
    let (sketch, set_sketch) = signal(Sketch::Dot);

    view! {
        <div>
            <h1>"WebGL Sketches"</h1>
            <div style="margin-bottom: 10px;">
                {Sketch::ALL
                    .into_iter()
                    .map(|s| view! { <button on:click=move |_| set_sketch.set(s)>{s.label()}</button> })
                    .collect_view()}
            </div>
            {move || {
                let config = config.clone();
                match sketch.get() {
                    Sketch::Dot => view! { <DotSketch config=config.dot /> }.into_any(),
                    Sketch::Grid => view! { <GridSketch config=config.grid /> }.into_any(),
                    Sketch::Shapes => view! { <ShapesSketch config=config.shapes animate=false /> }.into_any(),
                    Sketch::Figure => view! { <ShapesSketch config=config.shapes animate=true /> }.into_any(),
                }
            }}
        </div>
    }
}
