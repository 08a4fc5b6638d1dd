//! Headless slash-and-merge run on the sandbox world.
//!
//! Usage:
//! ```text
//! cargo run --example sandbox                     # default engine config
//! cargo run --example sandbox -- engine.json      # config from JSON
//! RUST_LOG=slashgeo=debug cargo run --example sandbox
//! ```

use slashgeo::geometry::{PaintStyle, Polygon};
use slashgeo::math::Point2;
use slashgeo::{EngineConfig, SandboxConfig, SandboxWorld, ShapeLifecycle};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const TICK_MS: f64 = 1000.0 / 60.0;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::new(vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: WARN for everything, INFO for slashgeo.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("sandbox=info".parse().unwrap_or_default())
        .add_directive("slashgeo=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig {
            seed: Some(7),
            merge_probability: 0.2,
            ..EngineConfig::default()
        },
    };

    let sandbox = SandboxConfig {
        gravity: [0.0, 0.0],
        ..SandboxConfig::default()
    };
    sandbox.validate()?;
    let mut world = SandboxWorld::new(sandbox);
    world.add_frame(WIDTH, HEIGHT)?;

    let mut life = ShapeLifecycle::new(config)?;
    let style = PaintStyle {
        fill_style: "#e8a33d".to_owned(),
        ..PaintStyle::default()
    };
    life.import_outlines(
        &mut world,
        vec![
            rect(100.0, 100.0, 300.0, 300.0),
            rect(160.0, 160.0, 240.0, 240.0).reversed(),
            rect(400.0, 150.0, 550.0, 250.0),
            rect(560.0, 150.0, 710.0, 250.0),
        ],
        &style,
    );
    tracing::info!(shapes = life.len(), "imported");

    let cuts = [
        (Point2::new(200.0, 50.0), Point2::new(200.0, 350.0)),
        (Point2::new(50.0, 200.0), Point2::new(750.0, 210.0)),
        (Point2::new(380.0, 80.0), Point2::new(720.0, 320.0)),
    ];
    for (a, b) in &cuts {
        let report = life.slash(&mut world, a, b);
        tracing::info!(
            split = report.split,
            created = report.created.len(),
            dropped = report.dropped,
            "slash"
        );
    }

    let mut merges = 0;
    for _ in 0..600 {
        let contacts = world.step(TICK_MS);
        merges += life.after_update(&mut world, &contacts).len();
    }

    let area: f64 = life.shapes().map(|(_, s)| s.net_area()).sum();
    tracing::info!(
        shapes = life.len(),
        merges,
        area,
        slashes = life.slashes().len(),
        "finished"
    );
    Ok(())
}
