/// Default upper bound for a single decoded string field (1 MiB).
pub const DEFAULT_MAX_STRING_LEN: u32 = 1024 * 1024;

/// Limits applied by the field encoders and decoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    pub max_string_len: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }
}

impl CodecConfig {
    pub fn with_max_string_len(mut self, max_string_len: u32) -> Self {
        self.max_string_len = max_string_len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_config_defaults_match_baseline() {
        let config = CodecConfig::default();
        assert_eq!(config.max_string_len, 1024 * 1024);
        assert_eq!(config.with_max_string_len(8).max_string_len, 8);
    }
}
