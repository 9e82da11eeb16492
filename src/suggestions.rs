//! # Error Suggestions
//!
//! Builds the errors the CLI reports, each with `hint:` lines telling the
//! user how to fix the problem and not only what went wrong.
//!
//! ```rust,ignore
//! use graphmize::suggestions;
//!
//! return Err(suggestions::source_not_found(&dir));
//! ```

use std::path::Path;

use crate::error::Error;
use crate::manifest::COMPOSITION_FILE_NAMES;
use crate::output::COLOR_CHOICES;

/// Accepted values for `--log-level`
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Error for a search directory that does not exist or is not a directory.
pub fn source_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Source directory not found: {path}\n\n\
         hint: Use -s/--source to choose the directory to search\n\
         hint: Set the GRAPHMIZE_SOURCE environment variable\n\
         hint: Relative paths are resolved against the current directory",
        path = path.display()
    )
}

/// Error for a `--config` file that does not exist.
pub fn settings_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Settings file not found: {path}\n\n\
         hint: Omit --config to use $HOME/.graphmize.yaml when it exists\n\
         hint: Unset the GRAPHMIZE_CONFIG environment variable if it points here",
        path = path.display()
    )
}

/// Error for a failed graph build, with a hint chosen from the underlying
/// cause.
pub fn build_failed(source_dir: &Path, error: &Error) -> anyhow::Error {
    let hint = match error.root_cause() {
        Error::NotFound { .. } => format!(
            "\n\nhint: Every directory listed under resources or bases needs one of: {}",
            COMPOSITION_FILE_NAMES.join(", ")
        ),
        Error::Ambiguous { .. } => format!(
            "\n\nhint: Keep a single composition file; {} are aliases of each other",
            COMPOSITION_FILE_NAMES.join(", ")
        ),
        Error::InvalidReference { .. } => {
            "\n\nhint: List the directory containing the kustomization file instead of the file itself"
                .to_string()
        }
        Error::CycleDetected { .. } => {
            "\n\nhint: Remove one of the references to break the cycle\n\
             hint: Move shared resources into a base referenced by both overlays"
                .to_string()
        }
        Error::Parse { .. } => "\n\nhint: Check the YAML syntax of the file named above".to_string(),
        _ => String::new(),
    };

    anyhow::anyhow!(
        "Failed to build graph for {dir}: {error}{hint}",
        dir = source_dir.display()
    )
}

/// Error for an unrecognized color mode.
pub fn invalid_color(value: &str) -> anyhow::Error {
    invalid_choice("color mode", value, &COLOR_CHOICES)
}

/// Error for an unrecognized log level.
pub fn invalid_log_level(value: &str) -> anyhow::Error {
    invalid_choice("log level", value, &LOG_LEVELS)
}

fn invalid_choice(what: &str, value: &str, choices: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(&value.to_lowercase(), choices)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Invalid {what}: {value}{did_you_mean}\n\n\
         Valid values are: {valid}",
        valid = choices.join(", ")
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row: previous[j] is the distance between a[..i] and b[..j].
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
