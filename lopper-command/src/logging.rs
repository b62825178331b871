/// Initialise `env_logger`. `RUST_LOG` wins when set; otherwise `info`, or `debug` with `-v`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
