//! Downloads the model archive and label vocabulary the classifier expects
//! on disk, mirroring the layout `resnet-classify` reads from.

use std::process;

use tracing_subscriber::EnvFilter;

use resnet_classify::{fetch, IMAGE_FILE, LABELS_FILE, MODEL_FILE, TEST_DATA_BASE};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = fetch::fetch_all() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }

    println!("Assets ready:");
    println!("  {}", LABELS_FILE);
    println!("  {}", MODEL_FILE);
    println!("  {}_{{0,1,2}}/", TEST_DATA_BASE);
    println!("Place the photograph to classify at {}.", IMAGE_FILE);
}
