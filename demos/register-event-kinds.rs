use anyhow::{ensure, Result};
use log::info;
use unique_id_registry::{registry, EventKind};

// RUST_LOG=debug cargo run --example register-event-kinds
fn main() -> Result<()> {
    env_logger::init();

    // Hints are honoured while they are free.
    let redraw = EventKind::register_global(Some(2000))?;
    let resize = EventKind::register_global(Some(2000))?;
    let custom = EventKind::register_global(None)?;

    info!("redraw = {}, resize = {}, custom = {}", redraw, resize, custom);
    ensure!(redraw.id() == 2000, "hint 2000 was free but got {}", redraw);
    ensure!(resize != redraw, "{} was handed out twice", redraw);
    ensure!(registry::is_registered(custom.id()), "{} is not registered", custom);

    // A backwards range is reported, not panicked on.
    match registry::register_id(10, 1) {
        Ok(id) => info!("unexpected id {}", id),
        Err(e) => info!("refused: {}", e),
    }

    Ok(())
}
