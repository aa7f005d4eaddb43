//! Lighting Lab entry point
//!
//! On the web this only installs logging; the page mounts the background
//! through the exported `LightingLab` class. Natively it runs a headless
//! simulation of every mode and logs what each frame drew.

/// Only sets up logging; hosts mount through `new LightingLab(canvasId)`,
/// which owns the loop and can stop it.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    lighting_lab::platform::web::init_logging();
    log::info!("Lighting Lab loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> lighting_lab::error::Result<()> {
    use lighting_lab::renderer::RecordingSurface;
    use lighting_lab::{Engine, Mode, Rect, Settings};

    env_logger::init();
    log::info!("Lighting Lab (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the live background");

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const FRAMES: u32 = 600;

    let settings = Settings {
        seed: Some(2024),
        ..Settings::default()
    };
    let mut engine = Engine::new(&settings, WIDTH, HEIGHT, 0)?;
    engine.refresh_obstacles([
        Rect::new(160.0, 120.0, 620.0, 340.0),
        Rect::new(700.0, 400.0, 1120.0, 640.0),
    ]);
    engine.start();

    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    for mode in Mode::ALL {
        engine.set_mode(mode);
        let mut circles = 0;
        let mut segments = 0;
        let mut last = None;
        for frame in 0..FRAMES {
            // Sweep the pointer across the middle of the screen
            let t = frame as f32 / FRAMES as f32;
            engine.pointer_moved(t * WIDTH, HEIGHT / 2.0);

            surface.reset();
            last = engine.frame(&mut surface);
            circles += surface.circles().len();
            segments += surface.segment_count();
        }
        engine.pointer_left();

        if let Some(stats) = last {
            println!(
                "{:<9} {} frames: {:>7} circles, {:>7} mesh segments, {} scanning at end",
                mode.id(),
                FRAMES,
                circles,
                segments,
                stats.scanning
            );
        }
    }

    engine.stop();
    log::info!("Done after {} frames", engine.frame_count());
    Ok(())
}
