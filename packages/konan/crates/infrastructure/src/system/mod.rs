pub mod fs;

pub use fs::overlay_dir;
