use std::process::ExitCode;

mod app;

fn main() -> ExitCode {
    let config = app::build_config();
    app::run(config)
}
