//! Stats command implementation.

use std::io::Write;
use std::path::Path;

use fieldindex_core::index::ProgressCallback;

use crate::corpus;
use crate::StatsArgs;

/// Run the stats command: load the corpus and report indexing statistics.
pub fn run(config: Option<&Path>, profile: Option<&str>, args: &StatsArgs) {
    let progress: Option<ProgressCallback> = if args.verbose {
        Some(Box::new(|current, total| {
            println!("[{}/{}]", current, total);
        }))
    } else {
        Some(Box::new(|current, total| {
            print!("\rIndexing... {}/{}", current, total);
            std::io::stdout().flush().ok();
        }))
    };

    let loaded = corpus::build_or_exit(config, profile, progress);
    if !args.verbose {
        println!();
    }

    println!();
    println!("Indexing complete:");
    println!("  Documents found:    {}", loaded.stats.documents_total);
    println!("  Documents indexed:  {}", loaded.stats.documents_indexed);
    if loaded.stats.documents_skipped > 0 {
        println!("  Documents skipped:  {}", loaded.stats.documents_skipped);
    }
    println!("  Duration:           {}ms", loaded.stats.duration_ms);
    println!();
    println!("Corpus: {}", loaded.config.documents_dir.display());
}
