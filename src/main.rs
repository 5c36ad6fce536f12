//! Spin Wheel entry point
//!
//! On the web the library's `WebPromotion` is driven by the host page. Natively
//! this runs a scripted headless session and logs what happened.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spin_wheel::confetti::Bounds;
    use spin_wheel::persistence::default_layers;
    use spin_wheel::platform::HeadlessPage;
    use spin_wheel::{PromoConfig, Promotion};

    env_logger::init();
    log::info!("Spin wheel (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| PromoConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => PromoConfig::default(),
    };

    let flag = default_layers(&config.popup.persistence_key);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut promo = Promotion::new(
        config,
        flag,
        Box::new(HeadlessPage::new()),
        Bounds::new(1280.0, 720.0),
        seed,
    );

    if !promo.on_page_load() {
        log::warn!("Popup will not be shown");
        return;
    }
    let delay = promo.config().popup.delay_ms as f32 / 1000.0;
    run(&mut promo, delay);

    for _ in 0..2 {
        match promo.spin() {
            Ok(spin_index) => {
                let secs = promo.config().timing.duration_secs(spin_index);
                run(&mut promo, secs);
            }
            Err(e) => {
                log::warn!("Spin refused: {}", e);
                break;
            }
        }
    }

    if let Some(code) = promo.claim() {
        log::info!("Claimed code {}", code);
    }
    let confetti_secs = promo.config().confetti.duration_ms as f32 / 1000.0;
    run(&mut promo, confetti_secs);

    promo.close();
    promo.teardown();
    run(&mut promo, 0.0);
}

/// Step the session for `secs` and print every event as JSON
#[cfg(not(target_arch = "wasm32"))]
fn run(promo: &mut spin_wheel::Promotion, secs: f32) {
    use spin_wheel::consts::SIM_DT;

    let frames = (secs / SIM_DT).ceil() as usize + 1;
    for _ in 0..frames {
        promo.update(SIM_DT);
    }
    for event in promo.drain_events() {
        match serde_json::to_string(&event) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Failed to encode {}: {}", event.name(), e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is spin_wheel::web::start, this is just to satisfy the compiler
}
