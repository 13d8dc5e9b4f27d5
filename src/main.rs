use clap::{Parser, Subcommand};
use lesson_site::{config, driver, output, scan};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let describe = env!("LESSON_SITE_GIT_DESCRIBE");
    if describe.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        describe
    }
}

#[derive(Parser)]
#[command(name = "lesson-site")]
#[command(about = "Static site generator for Markdown course modules")]
#[command(long_about = "\
Static site generator for Markdown course modules

Every Markdown file in a module becomes an HTML page at the mirrored path
under the output directory. Every module also gets one index.html that
collects its top-level lessons behind a navigation block.

Project structure:

  project/
  ├── site.toml                    # Configuration (optional)
  ├── 0-Fundamentos/               # Module, listed in site.toml `modules`
  │   ├── 01-boas-vindas.md        # → docs/html/0-Fundamentos/01-boas-vindas.html
  │   └── 02-ambiente.md           #   and a section of .../index.html
  ├── 1-Python-Essencial/
  │   └── exemplos/01-listas.md    # Nested: own page only
  └── docs/
      ├── assets/                  # progress.js, search.js, quiz.js, site.js
      └── html/                    # Output

Lesson titles: first `# ` heading, else first `## ` heading, else the file
name with dashes and underscores turned into spaces.

Pass a MODULE to rebuild only that module's index.html.
Run 'lesson-site gen-config' to generate a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Only rebuild this module's consolidated page (name or path)
    module: Option<PathBuf>,

    /// Project root containing site.toml and the module directories
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (overrides `output_dir` from site.toml)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log each step (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the modules and lessons a build would use
    Scan {
        /// Print the manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
        Some(Command::Scan { json }) => {
            let site_config = config::load_config(&cli.root)?;
            let manifest = scan::scan(&cli.root, &site_config)?;
            if json {
                println!("{}", output::format_scan_json(&manifest)?);
            } else {
                output::print_scan_output(&manifest);
            }
        }
        None => {
            let ctx = driver::load_context(&cli.root, cli.output.as_deref())?;
            let report = match &cli.module {
                Some(module) => driver::BuildReport {
                    modules: vec![driver::build_module_only(&ctx, module)?],
                    skipped: Vec::new(),
                },
                None => {
                    init_thread_pool(&ctx.config.processing);
                    driver::build_all(&ctx)?
                }
            };
            output::print_build_report(&report, &ctx.root);
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// `--verbose` forces info level; otherwise `RUST_LOG` decides (default: warnings).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
