//! Love Invaders entry point
//!
//! On the web this mounts the game on `#canvas` and hands the view to the
//! page as `window.loveInvaders`. Natively it plays a headless autopilot
//! session and reports the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    use love_invaders::platform::web::{GameView, init_logging};

    init_logging();
    log::info!("Love Invaders starting...");

    let view = GameView::mount("canvas")?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    js_sys::Reflect::set(&window, &JsValue::from_str("loveInvaders"), &JsValue::from(view))?;

    log::info!("Love Invaders ready");
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use love_invaders::headless::{FRAME_MS, run_autopilot};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| love_invaders::platform::now_ms() as u64);
    let max_frames = 60 * 60 * 10;

    log::info!("Love Invaders (native) autopilot, seed {}", seed);
    let outcome = run_autopilot(seed, max_frames, true);

    let seconds = outcome.frames as f64 * FRAME_MS / 1000.0;
    if outcome.won {
        log::info!(
            "Cleared in {} frames ({:.1}s simulated), score {}",
            outcome.frames,
            seconds,
            outcome.score
        );
    } else {
        log::warn!(
            "No win after {} frames ({:.1}s simulated), score {}, kills {:?}",
            outcome.frames,
            seconds,
            outcome.score,
            outcome.kills
        );
    }
    log::info!("{} paint operations recorded", outcome.paint_ops);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
