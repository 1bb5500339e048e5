fn main() {
    if let Err(err) = evadoom_api::app::run_sync() {
        eprintln!("marker sync startup failed: {err}");
        std::process::exit(1);
    }
}
