fn main() {
    if let Err(err) = openapi_catalog::cli::run_cli() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
