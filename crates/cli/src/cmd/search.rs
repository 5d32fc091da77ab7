//! Search command implementation.

use std::path::Path;

use fieldindex_core::index::{Constraint, Query, Sort, SortMode};

use super::output::{print_results_json, print_results_quiet, print_results_table};
use crate::{corpus, OutputFormat, SearchArgs, SortArg};

pub fn run(config: Option<&Path>, profile: Option<&str>, args: SearchArgs) {
    let loaded = corpus::build_or_exit(config, profile, None);

    let mut query = Query {
        q: args.query.clone(),
        categories: if args.categories.is_empty() {
            None
        } else {
            Some(args.categories.clone())
        },
        limit: args.limit,
        offset: args.offset,
        sort: Sort {
            mode: match args.sort {
                SortArg::Identifier => SortMode::Identifier,
                SortArg::ExactMatchFirst => SortMode::ExactMatchFirst,
                SortArg::None => SortMode::None,
            },
            match_category: args.match_category.clone(),
        },
        ..Query::default()
    };

    for raw in &args.constraints {
        match parse_constraint(raw) {
            Ok((name, constraint)) => {
                query.constraints.insert(name, constraint);
            }
            Err(e) => {
                eprintln!("Invalid constraint '{}': {}", raw, e);
                std::process::exit(2);
            }
        }
    }

    let result = match loaded.facade.find(&query) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error running query: {}", e);
            std::process::exit(1);
        }
    };

    let format = resolve_format(args.output, args.json, args.quiet);
    match format {
        OutputFormat::Table => print_results_table(&result, &loaded.documents),
        OutputFormat::Json => print_results_json(&result, &loaded.documents),
        OutputFormat::Quiet => print_results_quiet(&result),
    }
}

/// Parse `name=value`, `name~=value` (descendants) or `name!=value`
/// (subtract). Values may be comma-separated.
fn parse_constraint(raw: &str) -> Result<(String, Constraint), String> {
    let (name, values, recursive, subtract) = if let Some((name, rest)) = raw.split_once("~=")
    {
        (name, rest, true, false)
    } else if let Some((name, rest)) = raw.split_once("!=") {
        (name, rest, false, true)
    } else if let Some((name, rest)) = raw.split_once('=') {
        (name, rest, false, false)
    } else {
        return Err("expected 'name=value'".to_string());
    };

    if name.is_empty() {
        return Err("empty constraint name".to_string());
    }
    let values: Vec<String> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err("no values given".to_string());
    }

    let constraint = Constraint {
        values,
        subtract,
        search_recursively: recursive,
    };
    Ok((name.to_string(), constraint))
}

/// Resolve the output format from flags.
fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_constraints() {
        let (name, c) = parse_constraint("period:match=Iron Age").unwrap();
        assert_eq!(name, "period:match");
        assert_eq!(c.values, vec!["Iron Age"]);
        assert!(!c.subtract);
        assert!(!c.search_recursively);
    }

    #[test]
    fn parses_recursive_and_subtract_markers() {
        let (_, c) = parse_constraint("isChildOf:contain~=o1").unwrap();
        assert!(c.search_recursively);

        let (_, c) = parse_constraint("geometry:exist!=KNOWN").unwrap();
        assert!(c.subtract);
    }

    #[test]
    fn splits_comma_separated_values() {
        let (_, c) = parse_constraint("period:match=Iron Age, Bronze Age").unwrap();
        assert_eq!(c.values, vec!["Iron Age", "Bronze Age"]);
    }

    #[test]
    fn rejects_malformed_constraints() {
        assert!(parse_constraint("period:match").is_err());
        assert!(parse_constraint("=value").is_err());
        assert!(parse_constraint("period:match=").is_err());
    }
}
