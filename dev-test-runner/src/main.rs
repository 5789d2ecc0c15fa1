//! Runs every fixture under `fixtures/`: `schema.json` (+ optional
//! `config.json`) through the generator, then checks `expect.json` regexes
//! against the generated source.
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use graphql_ts_types::path_de::from_str_with_path;
use graphql_ts_types::{Codegen, Config, Document, RawConfig};

static FIXTURES_DIR: Lazy<PathBuf> = Lazy::new(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Expectation {
    /// Patterns that must match the generated source.
    matches: Vec<String>,
    /// Patterns that must not match.
    rejects: Vec<String>,
    /// When set, generation must fail with an error matching this pattern.
    error: Option<String>,
}

fn main() {
    let root = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| FIXTURES_DIR.clone());
    let mut fixtures = match std::fs::read_dir(&root) {
        Ok(entries) => entries.filter_map(Result::ok).map(|e| e.path()).filter(|p| p.is_dir()).collect::<Vec<_>>(),
        Err(error) => {
            eprintln!("❌ cannot read fixtures directory {}: {error}", root.display());
            std::process::exit(2);
        }
    };
    fixtures.sort();

    let mut failures = 0;
    for fixture in &fixtures {
        let name = fixture.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match run_fixture(fixture) {
            Ok(()) => eprintln!("✅ {name}"),
            Err(problems) => {
                failures += 1;
                eprintln!("❌ {name}");
                for problem in problems {
                    eprintln!("   {problem}");
                }
            }
        }
    }
    eprintln!("—— {} fixtures, {failures} failed ——", fixtures.len());
    if failures > 0 {
        std::process::exit(1);
    }
}

fn run_fixture(dir: &Path) -> Result<(), Vec<String>> {
    let read = |file: &str| std::fs::read_to_string(dir.join(file));

    let schema = read("schema.json").map_err(|e| vec![format!("schema.json: {e}")])?;
    let document = from_str_with_path::<Document>(&schema).map_err(|e| vec![format!("schema.json: {e}")])?;
    let config = match read("config.json") {
        Ok(src) => {
            let raw = from_str_with_path::<RawConfig>(&src).map_err(|e| vec![format!("config.json: {e}")])?;
            Config::from_raw(raw).map_err(|e| vec![format!("config.json: {e}")])?
        }
        Err(_) => Config::default(),
    };
    let expectation = read("expect.json")
        .map_err(|e| vec![format!("expect.json: {e}")])
        .and_then(|src| {
            let de = &mut serde_json::Deserializer::from_str(&src);
            serde_path_to_error::deserialize::<_, Expectation>(de).map_err(|e| vec![format!("expect.json: {e}")])
        })?;

    let result = Codegen::new(&document, &config).generate();
    let mut problems = Vec::new();
    match (result, expectation.error.as_deref()) {
        (Ok(_), Some(pattern)) => problems.push(format!("expected an error matching /{pattern}/, generation succeeded")),
        (Err(error), None) => problems.push(format!("unexpected error: {error}")),
        (Err(error), Some(pattern)) => {
            if !compile(pattern, &mut problems).is_some_and(|re| re.is_match(&error.to_string())) {
                problems.push(format!("error `{error}` does not match /{pattern}/"));
            }
        }
        (Ok(output), None) => {
            let source = output.to_source();
            for pattern in &expectation.matches {
                if compile(pattern, &mut problems).is_some_and(|re| !re.is_match(&source)) {
                    problems.push(format!("missing /{pattern}/"));
                }
            }
            for pattern in &expectation.rejects {
                if compile(pattern, &mut problems).is_some_and(|re| re.is_match(&source)) {
                    problems.push(format!("unexpected /{pattern}/"));
                }
            }
        }
    }
    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

fn compile(pattern: &str, problems: &mut Vec<String>) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(error) => {
            problems.push(format!("bad pattern /{pattern}/: {error}"));
            None
        }
    }
}
