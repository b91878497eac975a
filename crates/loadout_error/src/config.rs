//! Bot configuration and bootstrap errors.

/// A setting the bot cannot start with.
///
/// `section` names the TOML table at fault (`schedule`, `cache`, ...) when
/// the problem is a single value; file, parse and logging failures carry
/// none.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Configuration Error: {}{} at line {} in {}",
    section.map(|s| format!("[{}] ", s)).unwrap_or_default(),
    message,
    line,
    file
)]
pub struct ConfigError {
    /// What is wrong
    pub message: String,
    /// Offending TOML table, if any
    pub section: Option<&'static str>,
    /// Line where the error was raised
    pub line: u32,
    /// Source file where the error was raised
    pub file: &'static str,
}

impl ConfigError {
    /// Bootstrap failure not tied to one config table.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to read loadout.toml");
    /// assert!(err.section.is_none());
    /// assert!(err.to_string().starts_with("Configuration Error: Failed to read"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(None, message.into())
    }

    /// Invalid value inside the `[section]` table.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_error::ConfigError;
    ///
    /// let err = ConfigError::in_section("schedule", "diff_interval_seconds must be positive");
    /// assert_eq!(err.section, Some("schedule"));
    /// assert!(err.to_string().contains("[schedule] diff_interval_seconds"));
    /// ```
    #[track_caller]
    pub fn in_section(section: &'static str, message: impl Into<String>) -> Self {
        Self::at(Some(section), message.into())
    }

    #[track_caller]
    fn at(section: Option<&'static str>, message: String) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message,
            section,
            line: location.line(),
            file: location.file(),
        }
    }
}
