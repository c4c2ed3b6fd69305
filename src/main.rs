// What you SEE:
// • Top half: left and right eye views (unscratched areas pop out in the right eye).
// • Bottom half: the touch screen. Hold Left Mouse to scratch the overlay away.
// • X clear, B canvas style, A brush shape, Y save BMP, ←/→ color, ↑/↓ brush size,
//   L/R undo/redo, W/S 3D depth. ESC quits.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sqribble::config::Cli;
use sqribble::draw::Drawer;
use sqribble::{Engine, Error, app};

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqribble=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;
    info!(root = %config.storage_root.display(), mode = ?config.mode, "starting");

    let mut engine = Engine::new(&config);
    if let Some(path) = &cli.open {
        // A bad file leaves the generated canvas in place.
        if let Err(e) = engine.import(path) {
            info!("starting with a generated canvas ({e})");
        }
    }

    let mut drawer = Drawer::new("Sqribble", config.window_scale)?;
    let frames = app::run(&mut engine, &mut drawer)?;
    info!(frames, "bye");
    Ok(())
}
