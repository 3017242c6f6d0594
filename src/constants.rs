//! Application-wide constants
//!
//! Magic numbers and string literals shared by the organizer, the window
//! controller and the GUI shell.

/// File locations under the platform config/data directories
pub mod paths {
    /// Directory name under `dirs::config_dir()` / `dirs::data_dir()`
    pub const APP_DIR: &str = "kuusoo";

    /// Settings file (window size, pane ratio)
    pub const CONFIG_FILENAME: &str = "config.json";

    /// Group tree document
    pub const DATA_FILENAME: &str = "data.json";
}

/// Frameless window edge detection
pub mod hit_test {
    /// Smallest edge band in pixels
    pub const MIN_BORDER: i32 = 10;

    /// Largest edge band in pixels
    pub const MAX_BORDER: i32 = 20;

    /// Edge band as a fraction of the window width/height
    pub const BORDER_FRACTION: f64 = 0.02;

    /// Corner zones are this much larger than the edge band
    pub const CORNER_FACTOR: f64 = 1.5;
}

/// Config value ranges
pub mod validation {
    /// Smallest window width/height the shell allows
    pub const MIN_WINDOW_DIMENSION: u32 = 300;

    /// Largest accepted sub-group pane share in percent
    pub const MAX_RATIO_PERCENT: u8 = 100;
}

/// Suffix appended to the byte count in `FileEntry::size`
pub const SIZE_SUFFIX: &str = "B";

/// Shown by the settings dialog's author button
pub const AUTHOR_URL: &str = "https://kuusoo.me/";
