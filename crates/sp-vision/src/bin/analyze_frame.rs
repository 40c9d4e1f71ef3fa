//! Read one saved event-log frame and print each recognized line.
//! Usage: cargo run -p sp-vision --features cli --bin analyze_frame -- <frame.png> [data_dir] [output_dir]

use anyhow::{Context, Result};
use sp_data::Vocabulary;
use sp_vision::{extract, read_line, LayoutConfig, Recognizer};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <frame.png> [data_dir] [output_dir]", args[0]);
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let data_dir = PathBuf::from(args.get(2).map(String::as_str).unwrap_or("./data"));
    let output_dir = PathBuf::from(args.get(3).map(String::as_str).unwrap_or("./debug_output"));

    println!("Loading image: {}", input_path.display());
    let img = image::open(&input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?
        .to_rgba8();
    println!("Image size: {}x{}", img.width(), img.height());

    let layout = LayoutConfig::default();
    let recognizer = Recognizer::new(Arc::new(Vocabulary::load(&data_dir)?));

    println!("\n=== Lines ===");
    for (i, strip) in extract(&img, &layout).into_iter().enumerate() {
        match read_line(strip, &layout, &recognizer) {
            Ok(Some(event)) => println!(
                "{:2}: {:<6} {:>8} {:<48} cast={:?} books={:?} category={:?}",
                i,
                event.actor.to_string(),
                event
                    .time
                    .or(event.elapsed_time())
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                event.event_text,
                event.cast_name(),
                event.books,
                event.category,
            ),
            Ok(None) => {}
            Err(miss) => {
                let dir = output_dir.join(miss.kind.as_str());
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                let path = dir.join(format!("{}.png", miss.fingerprint));
                miss.image
                    .save(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                println!("{:2}: {} (saved to {})", i, miss, path.display());
            }
        }
    }

    Ok(())
}
