use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    source_split::cli::run_split_cli(std::env::args().skip(1))
}
