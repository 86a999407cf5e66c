//! Registry and lifecycle of plot-backed graph widgets.
//!
//! A [`GraphRegistry`] mints ids, builds [`GraphWidget`]s on a [`Surface`]
//! and routes parameter updates to them. Each widget shows an image whose
//! source encodes its parameters for the plotting backend.

mod config;
mod encode;
mod error;
mod memory;
mod registry;
mod surface;
mod widget;

pub use config::GraphConfig;
pub use encode::{PlotEndpoint, encode_component};
pub use error::{GraphError, Result};
pub use memory::{MemoryNode, MemorySurface};
pub use registry::{GraphHandle, GraphRegistry};
pub use surface::{ClickHandler, Surface};
pub use widget::{GraphWidget, Presentation, container_id};
