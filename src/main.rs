use leptos::prelude::*;
use log::LevelFilter;

use webgl_sketches::app::App;
use webgl_sketches::config::SketchConfig;
use webgl_sketches::logging::init_logging;

fn main() {
    let config = SketchConfig::bundled();
    init_logging(config.as_ref().map(SketchConfig::level_filter).unwrap_or(LevelFilter::Info));

    let config = config.unwrap_or_else(|e| {
        log::warn!("Falling back to default configuration: {}", e);
        SketchConfig::default()
    });

    leptos::mount::mount_to_body(move || {
        view! { <App config=config /> }
    })
}
