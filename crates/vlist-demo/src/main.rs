#![forbid(unsafe_code)]

//! vlist demo binary entry point.

use tracing_subscriber::EnvFilter;
use vlist_demo::cli;
use vlist_demo::home::{HomePage, ListFrame};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {filter:?}: {e}; using 'warn'");
        EnvFilter::new("warn")
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_frames(frames: &[ListFrame]) {
    for frame in frames {
        println!("{frame}");
    }
}

fn main() {
    let opts = cli::Opts::parse();
    init_tracing(&opts.log);

    let mut page = match HomePage::new(&opts) {
        Ok(page) => page,
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    };

    print_frames(&page.frame());

    if let Some(offset) = opts.scroll_to {
        println!("[scroll to {offset}]");
        println!();
        page.scroll_to(offset);
        print_frames(&page.frame());
    }
}
