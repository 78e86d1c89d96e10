pub mod image_loader;
