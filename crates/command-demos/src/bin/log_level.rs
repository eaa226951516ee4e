use standout_command::Context;

// The subscriber is installed by the level middleware once `-level` is known.
fn main() {
    command_demos::log_level_app("log-level").execute(&Context::new())
}
