pub mod decision_renderer;
pub mod painter;
pub mod status_appearance;
