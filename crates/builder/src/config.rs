use std::time::Duration;

/// Default quiet period before pending edits are saved.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(800);

/// Builder tuning.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Pending edits are saved once no new edit arrived for this long.
    pub autosave_delay: Duration,
}

impl BuilderConfig {
    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}
