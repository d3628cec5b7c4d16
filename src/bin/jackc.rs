use jack_lang::{run, Cli};
use log::error;

fn main() {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    if let Err(error) = run(&args) {
        error!("{error}");
        std::process::exit(1);
    }
}
