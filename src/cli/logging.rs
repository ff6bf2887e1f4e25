//! Verbosity gating for CLI output.

/// Output verbosity selected by the global CLI flags.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Errors only
    Quiet,
    /// Progress summaries
    Normal,
    /// Summaries plus per-stage detail
    Verbose,
}

impl LogLevel {
    /// Derive the level from the global CLI flags; quiet wins over verbose
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            LogLevel::Quiet
        } else if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// True when a message requiring `required` verbosity should be shown
    pub fn allows(self, required: LogLevel) -> bool {
        self != LogLevel::Quiet && self >= required
    }

    /// Print `msg` when the level permits it
    pub fn emit(self, required: LogLevel, msg: &str) {
        if self.allows(required) {
            println!("{msg}");
        }
    }
}
