use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hipport::rules::{RuleSet, SupportDegree, TranslationMode};
use hipport::scan::translate_source;
use hipport::{apply_in_place, Translation};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "hipport")]
#[command(about = "Source-to-source CUDA to HIP translation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate CUDA sources to HIP
    Convert {
        /// Files or directories to translate
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write output files into this directory (default: sibling
        /// files with a .hip suffix)
        #[arg(short, long, conflicts_with = "in_place")]
        out_dir: Option<PathBuf>,

        /// Overwrite the input files atomically
        #[arg(long)]
        in_place: bool,

        /// Use ROC library names where they differ from HIP
        #[arg(long)]
        roc: bool,

        /// Print per-name conversion statistics
        #[arg(long)]
        print_stats: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Merge extra rename rules from a TOML file
        #[arg(long)]
        extra_rules: Option<PathBuf>,
    },

    /// Report what would change without writing anything
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Use ROC library names where they differ from HIP
        #[arg(long)]
        roc: bool,

        /// Merge extra rename rules from a TOML file
        #[arg(long)]
        extra_rules: Option<PathBuf>,
    },

    /// List the built-in rename rules
    Rules {
        /// Only rules whose CUDA name contains this substring
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            paths,
            out_dir,
            in_place,
            roc,
            print_stats,
            diff,
            extra_rules,
        } => cmd_convert(paths, out_dir, in_place, roc, print_stats, diff, extra_rules),

        Commands::Check {
            paths,
            roc,
            extra_rules,
        } => cmd_check(paths, roc, extra_rules),

        Commands::Rules { filter } => cmd_rules(filter),
    }
}

/// File extensions treated as CUDA sources when walking directories.
const CUDA_EXTENSIONS: &[&str] = &["cu", "cuh", "c", "cc", "cpp", "cxx", "h", "hh", "hpp"];

/// Expand files and directories into the list of sources to translate.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            anyhow::bail!("no such file or directory: {}", path.display());
        }
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let ext = entry.path().extension().and_then(|s| s.to_str());
            if ext.is_some_and(|e| CUDA_EXTENSIONS.contains(&e)) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        anyhow::bail!("no CUDA source files found");
    }
    Ok(files)
}

fn load_rules(extra_rules: Option<&Path>) -> Result<RuleSet> {
    let mut rules = RuleSet::builtin();
    if let Some(path) = extra_rules {
        let added = rules
            .extend_from_toml(path)
            .with_context(|| format!("loading extra rules from {}", path.display()))?;
        println!(
            "{}",
            format!("Loaded {added} extra rules from {}", path.display()).dimmed()
        );
    }
    Ok(rules)
}

fn mode_for(roc: bool) -> TranslationMode {
    if roc {
        TranslationMode::Roc
    } else {
        TranslationMode::Hip
    }
}

/// Print the engine's warnings with file/line/column context.
fn report_diagnostics(file: &Path, translation: &Translation) {
    for d in &translation.diagnostics {
        eprintln!(
            "{} {}:{}:{}: {}",
            "warning:".yellow().bold(),
            file.display(),
            d.line,
            d.column,
            d.message
        );
    }
}

fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("\n{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (ported)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", sign);
    }
}

fn print_stats_table(totals: &hipport::RunStats) {
    println!();
    println!("{}", "Conversion statistics:".bold());
    for (name, count) in totals.occurrences() {
        println!("  {count:>6}  {name}");
    }
    println!("  {:>6}  lines touched", totals.touched_line_count());
    println!("  {:>6}  bytes of replacement text", totals.total_bytes_changed());
    println!("  {:>6}  warnings", totals.warning_count());
}

/// Where the translated copy of `file` goes.
fn output_path(file: &Path, out_dir: Option<&Path>) -> PathBuf {
    match out_dir {
        Some(dir) => dir.join(file.file_name().unwrap_or(file.as_os_str())),
        None => {
            let mut name = file.as_os_str().to_os_string();
            name.push(".hip");
            PathBuf::from(name)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    paths: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    in_place: bool,
    roc: bool,
    print_stats: bool,
    diff: bool,
    extra_rules: Option<PathBuf>,
) -> Result<()> {
    let rules = load_rules(extra_rules.as_deref())?;
    let mode = mode_for(roc);
    let files = collect_inputs(&paths)?;

    if let Some(dir) = &out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let mut totals = hipport::RunStats::new();
    let mut converted = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for file in &files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
                continue;
            }
        };

        let translation = translate_source(&source, &rules, mode);
        report_diagnostics(file, &translation);
        totals.merge(&translation.stats);

        let ported = match translation.apply(&source) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
                continue;
            }
        };

        if ported == source {
            println!("{} {}: nothing to translate", "⊙".yellow(), file.display());
            unchanged += 1;
            continue;
        }

        if diff {
            display_diff(file, &source, &ported);
        }

        let result = if in_place {
            apply_in_place(file, &translation.edits).map(|()| file.clone())
        } else {
            let out = output_path(file, out_dir.as_deref());
            match fs::write(&out, &ported) {
                Ok(()) => Ok(out),
                Err(e) => Err(hipport::EditError::Io {
                    path: out,
                    source: e,
                }),
            }
        };

        match result {
            Ok(out) => {
                println!(
                    "{} {} -> {} ({} patches)",
                    "✓".green(),
                    file.display(),
                    out.display(),
                    translation.edits.len()
                );
                converted += 1;
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    if print_stats {
        print_stats_table(&totals);
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} converted", format!("{converted}").green());
    println!("  {} unchanged", format!("{unchanged}").yellow());
    println!("  {} failed", format!("{failed}").red());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_check(paths: Vec<PathBuf>, roc: bool, extra_rules: Option<PathBuf>) -> Result<()> {
    let rules = load_rules(extra_rules.as_deref())?;
    let mode = mode_for(roc);
    let files = collect_inputs(&paths)?;

    let mut would_change = 0;
    let mut totals = hipport::RunStats::new();

    for file in &files {
        let source =
            fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        let translation = translate_source(&source, &rules, mode);
        report_diagnostics(file, &translation);

        if translation.edits.is_empty() {
            println!("{} {}: clean", "⊙".yellow(), file.display());
        } else {
            println!(
                "{} {}: {} patches, {} warnings",
                "✓".green(),
                file.display(),
                translation.edits.len(),
                translation.diagnostics.len()
            );
            would_change += 1;
        }
        totals.merge(&translation.stats);
    }

    println!();
    println!(
        "{} of {} files would change ({} CUDA references found)",
        would_change,
        files.len(),
        totals.total_occurrences()
    );
    Ok(())
}

fn cmd_rules(filter: Option<String>) -> Result<()> {
    let rules = RuleSet::builtin();
    let needle = filter.unwrap_or_default();

    let mut shown = 0;
    for (table, cuda, entry) in rules.iter_all() {
        if !cuda.contains(&needle) {
            continue;
        }
        let support = match entry.support {
            SupportDegree::Supported => "supported".green(),
            SupportDegree::Deprecated => "deprecated".yellow(),
            SupportDegree::Unsupported => "unsupported".red(),
        };
        println!(
            "{:<10} {:<8} {:<12} {:<44} -> {}",
            table,
            entry.api.as_str(),
            support,
            cuda,
            entry.target(TranslationMode::Hip)
        );
        shown += 1;
    }

    println!();
    println!("{shown} rules");
    Ok(())
}
