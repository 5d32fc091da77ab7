use std::path::Path;

use fieldindex_core::config::{default_config_path, ConfigLoader};
use fieldindex_core::corpus::load_documents;
use fieldindex_core::schema::load_schema;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            println!("FAIL fidx doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    println!("OK   fidx doctor");
    println!(
        "path: {}",
        config.map_or_else(
            || default_config_path().display().to_string(),
            |p| p.display().to_string()
        )
    );
    println!("profile: {}", rc.active_profile);
    println!("project_root: {}", rc.project_root.display());
    println!("schema_file: {}", rc.schema_file.display());
    println!("documents_dir: {}", rc.documents_dir.display());

    match load_schema(&rc.schema_file) {
        Ok(schema) => {
            println!("categories: {}", schema.categories.len());
            println!("constraints: {}", schema.constraints.len());
        }
        Err(e) => {
            println!("FAIL schema");
            println!("{e}");
            std::process::exit(1);
        }
    }

    match load_documents(&rc.documents_dir) {
        Ok(documents) => println!("documents: {}", documents.len()),
        Err(e) => {
            println!("FAIL documents");
            println!("{e}");
            std::process::exit(1);
        }
    }
}
