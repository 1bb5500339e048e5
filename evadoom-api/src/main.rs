fn main() {
    if let Err(err) = evadoom_api::app::run_api() {
        eprintln!("api startup failed: {err}");
        std::process::exit(1);
    }
}
