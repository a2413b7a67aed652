use clap::Parser;
use milac_drv::{run, Config};

fn main() {
    let config = Config::parse();
    if let Err(err) = run(config) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
