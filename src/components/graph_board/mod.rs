mod component;
mod state;
mod web_surface;

pub use component::{GraphBoard, SharedRegistry, provide_registry};
pub use web_surface::WebSurface;
