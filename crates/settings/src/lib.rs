pub mod preferences;

pub use preferences::{
    LoggingPreferences, Preferences, PreferencesError, PreferencesStore, ProjectPreferences,
    SharePreferences,
};
