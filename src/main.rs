//! sctest CLI entry point

fn main() {
    sctest::cli::run();
}
