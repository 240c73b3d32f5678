//! Doodlekit - freehand doodle canvas core
//!
//! A raster drawing engine for a meditative doodle pad: six stylised brush
//! renderers, rotational and axis symmetry modes, a vector stamp library
//! with a pop-in placement animation, snapshot-based undo, trace templates
//! and colouring pages, and a pan/zoom viewport. The host shell feeds
//! pointer events into [`canvas::CanvasManager`] and presents the surface.

pub mod brush;
pub mod canvas;
pub mod color;
pub mod error;
pub mod geom;
pub mod stamp;
pub mod surface;
pub mod symmetry;
pub mod template;
pub mod viewport;

pub use error::DoodleError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for hosts that have no subscriber of their own.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doodlekit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("doodlekit initializing...");
}
