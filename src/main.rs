fn main() {
    if let Err(err) = tabular_dashboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
