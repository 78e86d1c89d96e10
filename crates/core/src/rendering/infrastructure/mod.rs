pub mod bitmap_font;
pub mod bitmap_painter;
