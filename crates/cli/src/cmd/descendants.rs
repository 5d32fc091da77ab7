//! Descendants command implementation.

use std::path::Path;

use crate::{corpus, DescendantsArgs};

/// Run the descendants command: transitive hierarchy members of the given
/// documents.
pub fn run(config: Option<&Path>, profile: Option<&str>, args: &DescendantsArgs) {
    let loaded = corpus::build_or_exit(config, profile, None);

    let ids = match loaded.facade.get_descendant_ids(&args.name, &args.ids) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Error resolving descendants: {}", e);
            std::process::exit(1);
        }
    };

    if args.quiet {
        for id in &ids {
            println!("{}", id);
        }
        return;
    }

    if ids.is_empty() {
        println!("(no descendants found)");
        return;
    }

    for id in &ids {
        let identifier = loaded
            .documents
            .get(id)
            .and_then(|doc| doc.identifier().map(str::to_string))
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {}", id, identifier);
    }

    println!();
    println!("-- {} descendants --", ids.len());
}
