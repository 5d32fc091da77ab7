//! Count command implementation.

use std::path::Path;

use crate::{corpus, CountArgs};

/// Run the count command: cardinality of a single constraint value.
pub fn run(config: Option<&Path>, profile: Option<&str>, args: &CountArgs) {
    let loaded = corpus::build_or_exit(config, profile, None);
    println!("{}", loaded.facade.get_count(&args.name, &args.value));
}
