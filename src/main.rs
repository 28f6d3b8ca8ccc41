#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gn_syntax::engine::ast::{syntax_errors, to_sexp};
use gn_syntax::queries::{Theme, fold_ranges, highlight, render_ansi};
use gn_syntax::{language, parse};
use tree_sitter::{Point, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "gn-syntax", version, about = "Parse and inspect GN build files")]
struct Args {
    /// Log parser activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the syntax tree of each file; exits 1 if any file has syntax errors
    Parse {
        /// Files or glob patterns; reads stdin when empty
        paths: Vec<String>,

        /// Only report errors
        #[arg(short, long)]
        quiet: bool,

        /// Print one node per line with its position
        #[arg(long)]
        positions: bool,
    },
    /// Print the source with syntax colors
    Highlight {
        path: Option<String>,

        #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
        color: ColorMode,

        /// List highlight spans instead of rendering
        #[arg(long)]
        spans: bool,
    },
    /// List the node kinds, fields and supertypes of the grammar
    NodeKinds,
    /// Print foldable regions
    Folds { path: Option<String> },
}

/// Where a source text came from.
enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn name(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(p) => p.display().to_string(),
        }
    }

    /// The raw bytes; GN files are not required to be valid UTF-8.
    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf)?;
                Ok(buf)
            }
            Self::File(p) => fs::read(p).with_context(|| format!("reading {}", p.display())),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Parse {
            paths,
            quiet,
            positions,
        } => run_parse(&inputs(&paths)?, quiet, positions),
        Command::Highlight { path, color, spans } => {
            run_highlight(&single_input(path), color, spans)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::NodeKinds => {
            run_node_kinds()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Folds { path } => {
            run_folds(&single_input(path))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("gn_syntax=debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Expand glob patterns; a pattern matching nothing is kept as a literal path.
fn inputs(patterns: &[String]) -> Result<Vec<Input>> {
    if patterns.is_empty() {
        return Ok(vec![Input::Stdin]);
    }
    let mut out = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern).with_context(|| format!("bad pattern {pattern}"))? {
            out.push(Input::File(entry?));
            matched = true;
        }
        if !matched {
            out.push(Input::File(PathBuf::from(pattern)));
        }
    }
    debug!(files = out.len(), "expanded inputs");
    Ok(out)
}

fn single_input(path: Option<String>) -> Input {
    path.map_or(Input::Stdin, |p| Input::File(PathBuf::from(p)))
}

fn run_parse(inputs: &[Input], quiet: bool, positions: bool) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    let mut failed = false;
    for input in inputs {
        let src = match input.read() {
            Ok(src) => src,
            Err(err) => {
                eprintln!("{}: {err:#}", input.name());
                failed = true;
                continue;
            }
        };
        let tree = parse(&src)?;
        if !quiet {
            if positions {
                write_positions(&mut out, &tree)?;
            } else {
                writeln!(out, "{}", to_sexp(tree.root_node(), &src))?;
            }
        }
        let errors = syntax_errors(tree.root_node());
        for node in &errors {
            let at = node.start_position();
            let what = if node.is_missing() {
                format!("missing \"{}\"", node.kind())
            } else {
                "syntax error".to_string()
            };
            eprintln!("{}:{}:{}: {what}", input.name(), at.row + 1, at.column + 1);
        }
        failed |= !errors.is_empty();
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn write_positions(out: &mut impl Write, tree: &Tree) -> io::Result<()> {
    let mut cursor = tree.walk();
    let mut depth = 0;
    'walk: loop {
        let node = cursor.node();
        if node.is_named() || node.is_missing() {
            let indent = "  ".repeat(depth);
            let field = cursor
                .field_name()
                .map(|f| format!("{f}: "))
                .unwrap_or_default();
            let missing = if node.is_missing() { "MISSING " } else { "" };
            writeln!(
                out,
                "{indent}{field}{missing}{} {} - {}",
                node.kind(),
                point(node.start_position()),
                point(node.end_position())
            )?;
        }
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
            depth -= 1;
        }
    }
    Ok(())
}

fn run_highlight(input: &Input, color: ColorMode, list_spans: bool) -> Result<()> {
    let src = input.read()?;
    let tree = parse(&src)?;
    let spans = highlight(&tree, &src)?;
    let mut out = io::stdout().lock();
    if list_spans {
        for s in &spans {
            writeln!(out, "{}..{} {}", s.start, s.end, s.capture.name())?;
        }
        return Ok(());
    }
    let colored = match color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal(),
    };
    let theme = if colored {
        Theme::default()
    } else {
        Theme::plain()
    };
    write!(
        out,
        "{}",
        render_ansi(&String::from_utf8_lossy(&src), &spans, &theme)
    )?;
    Ok(())
}

fn run_node_kinds() -> Result<()> {
    let lang = language();
    let supertypes = lang.supertypes();
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} (abi {})",
        lang.name().unwrap_or("gn"),
        lang.abi_version()
    )?;
    for id in 0..u16::try_from(lang.node_kind_count())? {
        let Some(name) = lang.node_kind_for_id(id) else {
            continue;
        };
        let flavor = if supertypes.contains(&id) {
            "supertype"
        } else if !lang.node_kind_is_visible(id) {
            "hidden"
        } else if lang.node_kind_is_named(id) {
            "named"
        } else {
            "anonymous"
        };
        writeln!(out, "{id:>4}  {name:<26} {flavor}")?;
    }
    writeln!(out, "fields:")?;
    for id in 1..=u16::try_from(lang.field_count())? {
        if let Some(name) = lang.field_name_for_id(id) {
            writeln!(out, "{id:>4}  {name}")?;
        }
    }
    writeln!(out, "supertypes:")?;
    for &id in supertypes {
        let subtypes: Vec<_> = lang
            .subtypes_for_supertype(id)
            .iter()
            .filter_map(|&s| lang.node_kind_for_id(s))
            .collect();
        let name = lang.node_kind_for_id(id).unwrap_or_default();
        writeln!(out, "  {name}: {}", subtypes.join(", "))?;
    }
    Ok(())
}

fn run_folds(input: &Input) -> Result<()> {
    let src = input.read()?;
    let tree = parse(&src)?;
    let mut out = io::stdout().lock();
    for fold in fold_ranges(&tree, &src)? {
        writeln!(
            out,
            "{} {} - {}",
            fold.kind,
            point(fold.range.start_point),
            point(fold.range.end_point)
        )?;
    }
    Ok(())
}

fn point(p: Point) -> String {
    format!("[{}, {}]", p.row, p.column)
}
