//! Recorder configuration

use serde::{Deserialize, Serialize};

use crate::buffer::DEFAULT_BUFFER_CAPACITY;
use crate::error::{PerfTimerError, Result};

/// Largest accepted chunk capacity, in events
pub const MAX_BUFFER_CAPACITY: usize = 1 << 24;

/// Recorder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Events per chunk. A new chunk is allocated each time one fills.
    pub buffer_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl RecorderConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `buffer_capacity` is zero or above
    /// [`MAX_BUFFER_CAPACITY`].
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(PerfTimerError::invalid_config(
                "buffer_capacity must be greater than 0",
            ));
        }
        if self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(PerfTimerError::invalid_config(format_args!(
                "buffer_capacity must be at most {MAX_BUFFER_CAPACITY}"
            )));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> RecorderConfigBuilder {
        RecorderConfigBuilder::default()
    }
}

/// Builder for `RecorderConfig`.
#[derive(Debug, Default)]
pub struct RecorderConfigBuilder {
    config: RecorderConfig,
}

impl RecorderConfigBuilder {
    /// Set the number of events per chunk.
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<RecorderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
