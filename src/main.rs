fn main() {
    if let Err(e) = blogmeta::run() {
        eprintln!("blogmeta: {:#}", e);
        std::process::exit(1);
    }
}
