use std::fmt;

/// Progress reporting handed to every long-running operation.
///
/// Verbose diagnostics log each step at `info`, quiet ones at `debug`, so a
/// host can turn editor chatter on per call instead of through global state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    verbose: bool,
}

impl Diagnostics {
    /// Steps are logged at `debug`.
    pub const QUIET: Diagnostics = Diagnostics { verbose: false };
    /// Steps are logged at `info`.
    pub const VERBOSE: Diagnostics = Diagnostics { verbose: true };

    /// Picks verbosity from a flag, usually [`crate::EditorConfig::verbose`].
    pub const fn new(verbose: bool) -> Self {
        Diagnostics { verbose }
    }

    /// Whether steps are reported at `info`.
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Reports one progress step.
    pub fn step(&self, args: fmt::Arguments<'_>) {
        if self.verbose {
            log::info!("{args}");
        } else {
            log::debug!("{args}");
        }
    }

    /// Reports a suspicious but recoverable condition. Always logged.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        log::warn!("{args}");
    }
}
