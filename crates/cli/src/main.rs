fn main() {
    if let Err(e) = extguard_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
