use tracing_subscriber::EnvFilter;

/// Initialize tracing for hosts that don't bring their own subscriber,
/// and bridge `log` records into `tracing`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_log::LogTracer::init();

    // Explicit verbose flag wins, then RUST_LOG, then quiet default
    let filter = if verbose {
        EnvFilter::new("histochart=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_safe() {
        init_tracing(true);
        init_tracing(false);
    }
}
