//! Minimal CLI: schema JSON → (types | symbols)
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::info;

use graphql_ts_types::path_de::{from_slice_with_path, from_str_with_path};
use graphql_ts_types::{Codegen, Config, Document, RawConfig, SymbolTables};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile GraphQL schema documents (JSON) into TypeScript type declarations
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate TypeScript declarations
    Types(TypesOut),
    /// print the resolved scalar/enum/directive symbol tables as JSON
    Symbols(SymbolsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema documents. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// generator configuration (.json, camelCase keys)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TypesOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory; each `<stem>.json` becomes `<stem>.ts` (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// file appended verbatim after the generated declarations
    #[arg(long)]
    trailing: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct SymbolsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> anyhow::Result<Config> {
        let Some(path) = self.config.as_ref() else {
            return Ok(Config::default());
        };
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let raw = from_str_with_path::<RawConfig>(&source)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Config::from_raw(raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn source_paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Types(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let config = target.input_settings.load_config()?;
                let trailing = match target.trailing.as_ref() {
                    Some(path) => vec![
                        std::fs::read_to_string(path)
                            .with_context(|| format!("failed to read trailing definitions {}", path.display()))?,
                    ],
                    None => Vec::new(),
                };
                let source_paths = target.input_settings.source_paths()?;
                if source_paths.len() > 1 && target.out.is_none() {
                    bail!("{} inputs given; pass --out <dir> to write one file per input", source_paths.len());
                }

                let generated = source_paths
                    .par_iter()
                    .map(|path| {
                        let document = load_document(path)?;
                        let output = Codegen::new(&document, &config)
                            .with_trailing_definitions(trailing.iter().cloned())
                            .generate()
                            .with_context(|| format!("failed to generate types for {}", path.display()))?;
                        Ok((path.clone(), output.to_source()))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;

                match target.out.as_ref() {
                    Some(out_dir) => {
                        std::fs::create_dir_all(out_dir)
                            .with_context(|| format!("failed to create {}", out_dir.display()))?;
                        for (path, source) in generated {
                            let stem = path.file_stem().unwrap_or(path.as_os_str());
                            let out_path = out_dir.join(stem).with_extension("ts");
                            std::fs::write(&out_path, &source)
                                .with_context(|| format!("failed to write {}", out_path.display()))?;
                            info!(input = %path.display(), output = %out_path.display(), "wrote declarations");
                        }
                    }
                    None => {
                        for (_, source) in generated {
                            println!("{source}");
                        }
                    }
                }
                Ok(())
            }
            Command::Symbols(target) => {
                let config = target.input_settings.load_config()?;
                let source_paths = target.input_settings.source_paths()?;
                let [path] = source_paths.as_slice() else {
                    bail!("symbols takes exactly one input, got {}", source_paths.len());
                };
                let document = load_document(path)?;
                let convention = config.naming_convention;
                let namer = graphql_ts_types::naming::Namer::new(&convention, &config.types_prefix, &config.types_suffix);
                let tables = SymbolTables::build(&document, &config, &namer);
                let tables_src = serde_json::to_string_pretty(&tables)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &tables_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{tables_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_document(path: &Path) -> anyhow::Result<Document> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read schema document {}", path.display()))?;
    from_slice_with_path::<Document>(&bytes)
        .with_context(|| format!("failed to parse schema document {}", path.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
