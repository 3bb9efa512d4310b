use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the process-wide `env_logger`.
///
/// The default filter is `info`, or `debug` with `verbose`, which surfaces
/// view toggles, dropped chase triggers and suppressed attacks. A `RUST_LOG`
/// directive in the environment replaces the default entirely, so
/// `RUST_LOG=stalker::chase=debug` narrows output to the chase sequence.
/// Calling this again after a logger is installed does nothing.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(default_filter.as_str());
    let _ = Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn repeated_init_is_harmless() {
        init(true);
        init(false);
        log::debug!("still logging after a second init");
    }
}
