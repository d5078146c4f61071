fn main() {
    if let Err(err) = enrollment_normalizer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
