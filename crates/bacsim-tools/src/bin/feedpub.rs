use bacsim_device::feed::DEFAULT_FEED_PATH;
use bacsim_device::{FeedSnapshot, JsonFileFeed};
use bacsim_tools::parse_assignment;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bacsim-feedpub")]
struct Args {
    /// Snapshot file the simulator relays from.
    #[arg(long, default_value = DEFAULT_FEED_PATH)]
    path: PathBuf,
    /// Keep fields of the current snapshot that are not assigned here.
    #[arg(long)]
    merge: bool,
    /// Field assignments, e.g. `level=21.5 pump=true`.
    #[arg(required = true, value_parser = parse_assignment)]
    fields: Vec<(String, bacsim_device::FeedValue)>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let feed = JsonFileFeed::new(&args.path);

    let mut snapshot = if args.merge {
        feed.read().unwrap_or_else(|e| {
            log::warn!("starting from an empty snapshot: {e}");
            FeedSnapshot::new()
        })
    } else {
        FeedSnapshot::new()
    };
    for (field, value) in args.fields {
        snapshot.insert(field, value);
    }

    feed.publish(&snapshot)?;
    println!(
        "published {} fields to {}",
        snapshot.len(),
        args.path.display()
    );
    Ok(())
}
