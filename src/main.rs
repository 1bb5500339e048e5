fn main() {
    if let Err(err) = evadoom_api::app::run() {
        eprintln!("application startup failed: {err}");
        std::process::exit(1);
    }
}
