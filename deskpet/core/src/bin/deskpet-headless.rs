//! Deskpet Headless
//!
//! Runs the pet engine against the in-memory surface and a fixed
//! desktop layout. Useful for exercising the full timing loop without a
//! windowing system: the pet idles, naps, walks and falls exactly as it
//! would on a real desktop, and every frame it shows is recorded by the
//! headless surface.
//!
//! # Usage
//!
//! ```bash
//! deskpet-headless
//!
//! # With verbose logging
//! RUST_LOG=debug deskpet-headless
//! ```
//!
//! # Signals
//!
//! - SIGINT (Ctrl+C): clean shutdown

use tokio::signal;
use tracing::info;

use deskpet_core::driver;
use deskpet_core::engine::Pet;
use deskpet_core::geometry::{Point, Rect, Size};
use deskpet_core::surface::{FixedWindowProbe, HeadlessSurface};

const SCREEN: Rect = Rect::new(0, 0, 1920, 1080);
const TASKBAR_HEIGHT: i32 = 40;
const PET_SIZE: Size = Size::new(180, 180);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deskpet_core=info".parse()?),
        )
        .with_target(true)
        .init();

    info!("starting deskpet (headless)");

    // Park the pet on the taskbar.
    let start = Point::new(
        100,
        SCREEN.bottom() - TASKBAR_HEIGHT - PET_SIZE.height,
    );
    let surface = HeadlessSurface::new(start, PET_SIZE);
    let probe = FixedWindowProbe::with_taskbar(SCREEN, TASKBAR_HEIGHT);
    let mut pet = Pet::new(surface, Box::new(probe))?;

    tokio::select! {
        _ = driver::run(&mut pet) => {}
        _ = signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }

    info!(state = ?pet.state(), "deskpet stopped");
    Ok(())
}
