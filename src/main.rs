//! sectree: header-based section trees for Markdown, JSON and XML.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, ValueEnum};
use sectree::corpus::Corpus;
use sectree::{assign_ids, formats, serialize, Config, InputFormat, Options, SectionTree, Target};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Pick by file extension, then by content
    Auto,
    Markdown,
    Json,
    Xml,
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    /// Outline with ids, levels and kinds
    Json,
    /// The plain value the tree describes
    JsonPlain,
    Xml,
    /// Flat node list for a tree view
    Explorer,
}

#[derive(Clone, Copy, ValueEnum)]
enum NumberingArg {
    Dotted,
    Padded,
}

#[derive(Parser)]
#[command(name = "sectree", version)]
#[command(about = "Header-based section trees from Markdown, JSON and XML", long_about = None)]
struct Args {
    /// Files to convert; several files become one folder/file tree (stdin if none)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Input format
    #[arg(long, short = 'f', value_enum, default_value_t = FormatArg::Auto)]
    from: FormatArg,

    /// Output format
    #[arg(long, short = 't', value_enum, default_value_t = TargetArg::Json)]
    to: TargetArg,

    /// Id style (overrides the config file)
    #[arg(long, short = 'n', value_enum)]
    numbering: Option<NumberingArg>,

    /// Config file to use instead of ./sectree.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Reject malformed headers instead of keeping them as text
    #[arg(long)]
    strict: bool,

    /// Use tree-sitter to confirm Markdown headings
    #[arg(long)]
    syntax_aware: bool,

    /// Wrap JSON outline output with metadata
    #[arg(long)]
    envelope: bool,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,

    /// Log progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn input_format(arg: FormatArg, path: Option<&Path>, bytes: &[u8]) -> InputFormat {
    match arg {
        FormatArg::Markdown => InputFormat::Markdown,
        FormatArg::Json => InputFormat::Json,
        FormatArg::Xml => InputFormat::Xml,
        FormatArg::Auto => path
            .and_then(InputFormat::from_path)
            .unwrap_or_else(|| InputFormat::sniff(bytes)),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn load(path: &Path, from: FormatArg, options: &Options) -> sectree::Result<SectionTree> {
    let bytes = fs::read(path)?;
    let format = input_format(from, Some(path), &bytes);
    info!(path = %path.display(), format = format.as_str(), "reading");
    formats::build(&bytes, format, options)
}

fn build_tree(args: &Args, options: &Options) -> sectree::Result<SectionTree> {
    match args.paths.as_slice() {
        [] => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            let format = input_format(args.from, None, &bytes);
            formats::build(&bytes, format, options)
        }
        [path] => {
            let mut tree = load(path, args.from, options)?;
            if tree.root().title.is_empty() {
                tree.root_mut().title = file_name(path);
            }
            Ok(tree)
        }
        paths => {
            let mut corpus = Corpus::new("");
            for path in paths {
                let folder_name = path
                    .parent()
                    .and_then(Path::file_name)
                    .map_or_else(|| ".".to_string(), |n| n.to_string_lossy().into_owned());
                let folder = corpus.find_or_add_folder(&folder_name);
                let document = load(path, args.from, options)?;
                corpus.add_file(folder, &file_name(path), &document);
            }
            Ok(corpus.into_tree())
        }
    }
}

fn run(args: &Args) -> sectree::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    // Override config with command line args
    if let Some(numbering) = args.numbering {
        cfg.numbering = match numbering {
            NumberingArg::Dotted => "dotted",
            NumberingArg::Padded => "padded",
        }
        .to_string();
    }
    if args.strict {
        cfg.header_policy = "strict".to_string();
    }
    cfg.syntax_aware |= args.syntax_aware;
    cfg.envelope |= args.envelope;
    let options = cfg.to_options()?;

    let mut tree = build_tree(args, &options)?;
    assign_ids(&mut tree, &options.numbering);
    let stats = tree.stats();
    info!(
        nodes = stats.total_nodes,
        max_depth = stats.max_depth,
        sections = stats.sections,
        "tree built"
    );

    let target = match args.to {
        TargetArg::Json => Target::Json,
        TargetArg::JsonPlain => Target::JsonPlain,
        TargetArg::Xml => Target::Xml,
        TargetArg::Explorer => Target::Explorer,
    };
    let text = serialize(&tree, target, &options.serialize)?.to_text(!args.compact)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))?;
            info!(path = %path.display(), "written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}
