use std::io;

fn main() {
    // engine tracing is opt-in so command output stays clean
    if std::env::var_os("RUST_LOG").is_some() {
        homegame_engine::logging::init_logging();
    }
    let code = homegame_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
