fn main() {
    if let Err(err) = canvas_autolayout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
