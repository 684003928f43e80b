//! Application-wide constants
//!
//! Storage layout, schema versioning and per-demo timing live here so the
//! draft store, the sandbox bindings and the CLI agree on a single value.

/// Persisted draft layout
pub mod storage {
    /// Prefix shared by every key this crate writes
    pub const PREFIX: &str = "demo-effects";

    /// Schema version of persisted drafts; bump when a draft shape changes
    pub const SCHEMA_VERSION: u32 = 1;

    /// Default debounce applied to draft writes (milliseconds)
    pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
}

/// Debounce windows used by the individual demos (milliseconds)
pub mod debounce {
    pub const EDIT_MODE_MS: u64 = 220;
    pub const BACKGROUND_LAB_MS: u64 = 120;
    pub const FUNNEL_LAB_MS: u64 = 180;
    pub const INDUSTRY_SWITCHER_MS: u64 = 200;
}

/// Config and data file locations
pub mod config {
    /// Directory name under the platform config/data dirs
    pub const APP_DIR: &str = "demo-effects";

    /// Config file name
    pub const FILENAME: &str = "config.json";

    /// Storage file name (emulated local storage)
    pub const STORAGE_FILENAME: &str = "storage.json";
}

/// Page layout defaults
pub mod layout {
    /// Natural order of the home page sections
    pub const DEFAULT_SECTIONS: [&str; 4] = ["outcomes", "services", "demos", "cta"];
}

/// Edit mode session limits
pub mod edit_mode {
    /// Number of change log entries kept in the draft
    pub const CHANGE_LOG_LIMIT: usize = 6;
}
