//! File names, value ranges and protocol strings, grouped by concern

/// Settings and registry file locations
pub mod config {
    /// Directory name used under the platform config dir when the install
    /// directory cannot be determined
    pub const APP_DIR: &str = "desk-fences";

    /// Global options file
    pub const FILENAME: &str = "options.json";

    /// Fence records written by the fence manager (read-only here)
    pub const FENCES_FILENAME: &str = "fences.json";

    /// Extension used for the temporary file of an atomic write
    pub const TEMP_EXTENSION: &str = "tmp";
}

/// Event log sink
pub mod log {
    /// Append-only log file in the program directory
    pub const FILENAME: &str = "desk-fences.log";

    /// Environment variable selecting the stderr log level
    pub const LEVEL_ENV: &str = "LOG_LEVEL";
}

/// Value ranges for persisted settings
pub mod validation {
    /// Lowest accepted tint (percent)
    pub const MIN_TINT: u8 = 1;

    /// Highest accepted tint (percent)
    pub const MAX_TINT: u8 = 100;
}

/// Shortcut editing
pub mod shortcut {
    /// Indicator shown when a shortcut uses its target's own icon
    pub const DEFAULT_ICON: &str = "Default";

    /// Group holding the keys we read and write in a desktop entry
    pub const DESKTOP_ENTRY_GROUP: &str = "[Desktop Entry]";

    /// Icon location key
    pub const ICON_KEY: &str = "Icon";

    /// Command line key (first token is the target)
    pub const EXEC_KEY: &str = "Exec";

    /// Explicit target executable key, preferred over Exec
    pub const TRY_EXEC_KEY: &str = "TryExec";
}

/// X11 protocol constants
pub mod x11 {
    /// WM_CLASS instance/class set by the fence manager on every fence window
    pub const FENCE_WM_CLASS: &str = "desk-fences";

    /// Maximum property length requested for string properties (in 32-bit units)
    pub const MAX_PROPERTY_LENGTH: u32 = 1024;
}
