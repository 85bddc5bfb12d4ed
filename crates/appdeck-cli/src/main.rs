//! `appdeck` binary entrypoint.

fn main() {
    std::process::exit(appdeck_cli::run());
}
