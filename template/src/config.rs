use katagami_der::Rules;

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 30;

/// Knobs for a decode or encode call.
///
/// The default is strict: DER rules, unknown ADB selectors rejected, owned
/// encoding caches, no trailing data and at most [`DEFAULT_MAX_DEPTH`] levels
/// of nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    pub rules: Rules,
    pub strict_adb: bool,
    /// Store borrowed views of the input instead of copies in encoding caches.
    pub alias_only: bool,
    pub allow_trailing: bool,
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            rules: Rules::Der,
            strict_adb: true,
            alias_only: false,
            allow_trailing: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeConfig {
    /// Default settings with BER laxities (indefinite and non-minimal lengths)
    /// admitted.
    pub fn ber() -> Self {
        DecodeConfig::default().rules(Rules::Ber)
    }

    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn strict_adb(mut self, strict: bool) -> Self {
        self.strict_adb = strict;
        self
    }

    pub fn alias_only(mut self, alias: bool) -> Self {
        self.alias_only = alias;
        self
    }

    pub fn allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
