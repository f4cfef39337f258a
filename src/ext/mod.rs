mod host_path_display;

pub use host_path_display::BestEffortPathExt;
