//! Command-line front end wiring the lexer, parser, splitter, and renderer
//! into the two subcommands spec.md §6 sketches. Grounded on
//! `rvben-rumdl/src/main.rs` for the clap derive `Parser`/`Subcommand`
//! shape, the `env_logger`-from-a-`--debug`-flag pattern, and the
//! exit-code split between "ran fine" and "tool error"; the subcommand
//! names themselves (`gen-map`/`convert`) follow `original_source/main.go`.

mod exit_codes;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use adoc2md_config::Config;
use adoc2md_render::Renderer;
use adoc2md_splitter::FileSlot;

use exit_codes::exit;

#[derive(Parser)]
#[command(name = "adoc2md", author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file name prefix used when a chapter has no configured name.
    #[arg(long, global = true, default_value = "doc")]
    slug: String,

    /// Heading level at which the document is split into separate files.
    #[arg(long = "split-level", global = true, default_value_t = 2)]
    split_level: u8,

    /// Print the parsed document's debug-dump form instead of running the
    /// requested subcommand.
    #[arg(long, global = true)]
    dump: bool,

    /// Directory holding (and, for `gen-map`, receiving) `.idmap` sidecars.
    #[arg(long, global = true, default_value = ".")]
    art: PathBuf,

    /// Path to the site's YAML configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Raise logging to debug level.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and write its `.idmap` sidecar, without rendering.
    GenMap {
        file: PathBuf,
    },
    /// Parse, split, and render a document into a directory of Markdown
    /// files.
    Convert {
        file: PathBuf,
        #[arg(short = 'o', long = "out")]
        out_dir: PathBuf,
        /// Prefix joined to every image path in the rendered output.
        #[arg(long = "im", default_value = "")]
        image_prefix: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        exit::tool_error();
    }
    exit::success();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match &cli.command {
        Commands::GenMap { file } => gen_map(cli, &config, file),
        Commands::Convert { file, out_dir, image_prefix } => convert(cli, &config, file, out_dir, image_prefix),
    }
}

fn doc_name(file: &Path) -> String {
    file.file_name().and_then(|n| n.to_str()).unwrap_or("doc.adoc").to_string()
}

fn parse_file(file: &Path) -> anyhow::Result<adoc2md_ast::Document> {
    let src = fs::read_to_string(file).map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let name = doc_name(file);
    let mut include = |rel: &str| -> Result<String, adoc2md_parser::IncludeError> {
        fs::read_to_string(dir.join(rel)).map_err(|e| Box::new(e) as adoc2md_parser::IncludeError)
    };
    adoc2md_parser::Parser::parse_document(&src, name, dir.display().to_string(), &mut include)
        .map_err(|e| anyhow::anyhow!("{e}"))
}

fn dump_and_exit(doc: &adoc2md_ast::Document) {
    println!("{}", adoc2md_ast::dump(&adoc2md_ast::Block::Document(doc.clone())));
}

fn gen_map(cli: &Cli, config: &Config, file: &Path) -> anyhow::Result<()> {
    let mut doc = parse_file(file)?;
    if cli.dump {
        dump_and_exit(&doc);
        return Ok(());
    }

    let plan = adoc2md_splitter::split(&mut doc, config, &cli.slug, cli.split_level, &cli.art);
    adoc2md_splitter::save_sidecar(&cli.art, &doc.name, &plan.idmap)?;
    log::info!(
        "wrote idmap for {} to {}",
        doc.name,
        adoc2md_splitter::sidecar_path(&cli.art, &doc.name).display()
    );
    Ok(())
}

fn convert(cli: &Cli, config: &Config, file: &Path, out_dir: &Path, image_prefix: &str) -> anyhow::Result<()> {
    let mut doc = parse_file(file)?;
    if cli.dump {
        dump_and_exit(&doc);
        return Ok(());
    }

    let plan = adoc2md_splitter::split(&mut doc, config, &cli.slug, cli.split_level, &cli.art);
    adoc2md_splitter::save_sidecar(&cli.art, &doc.name, &plan.idmap)?;

    let chapters = adoc2md_render::partition_chapters(&doc.children, cli.split_level);
    let renderer = Renderer::new(image_prefix, cli.split_level);

    fs::create_dir_all(out_dir).map_err(|e| anyhow::anyhow!("failed to create {}: {e}", out_dir.display()))?;

    // A document with no split-level heading at all never allocates a
    // file slot in the map pass; fall back to a single file under the
    // same slug numbering the first chapter would otherwise have gotten.
    let fallback_name = format!("{}_1.md", cli.slug);
    let slots: Vec<FileSlot> = if plan.files.is_empty() && !chapters.is_empty() {
        vec![FileSlot::Write(fallback_name)]
    } else {
        plan.files.clone()
    };

    for (chapter, slot) in chapters.iter().zip(slots.iter()) {
        let FileSlot::Write(name) = slot else {
            log::info!("skipping chapter per <skip chapter> sentinel");
            continue;
        };
        let rendered = renderer.render_chapter(chapter);
        let out_path = out_dir.join(name);
        fs::write(&out_path, rendered).map_err(|e| anyhow::anyhow!("failed to write {}: {e}", out_path.display()))?;
        log::info!("wrote {}", out_path.display());
    }

    Ok(())
}
