//! Adventure Prompt compiler CLI
//!
//! Entry point for the `advc` command-line tool.

use advprompt::pipeline::{
    self, load_story, read_text, write_output, CompileOptions, OutputMode, PipelineResult,
};
use advprompt::sectioned;
use advprompt::serialize::{to_sectioned_text, to_story_json};
use advprompt::settings::Settings;
use advprompt::stats::StoryStats;
use advprompt::template::bundle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "advc")]
#[command(about = "Compile Adventure Prompt sources to a story file", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge sources in order, validate and emit a story file
    Compile {
        /// Sectioned text sources, merged in order ("-" reads stdin)
        sources: Vec<PathBuf>,

        /// Output merged sectioned text instead of a story file
        #[arg(long, short = 'm', conflicts_with = "stats")]
        merge: bool,

        /// Output statistics instead of a story file
        #[arg(long, short = 's')]
        stats: bool,

        /// Skip validation
        #[arg(long)]
        no_validate: bool,

        /// Write a JSON compile report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Settings file (default: ./advc.toml when present)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Indent the story file
        #[arg(long)]
        pretty: bool,
    },

    /// Convert a story file back to sectioned text
    Decompile {
        /// Story file
        story: PathBuf,

        /// Output statistics instead of sectioned text
        #[arg(long, short = 's')]
        stats: bool,

        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show object count by type for a story file
    Stats {
        /// Story file
        story: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Embed a story file into a template
    Bundle {
        /// Template file containing the placeholder line
        template: PathBuf,

        /// Story file
        story: PathBuf,

        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Placeholder line (default from settings)
        #[arg(long)]
        placeholder: Option<String>,

        /// Settings file (default: ./advc.toml when present)
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advprompt=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            sources,
            merge,
            stats,
            no_validate,
            report,
            output,
            settings,
            pretty,
        } => {
            let mode = if merge {
                OutputMode::Merged
            } else if stats {
                OutputMode::Stats
            } else {
                OutputMode::Story
            };
            run_compile(sources, mode, !no_validate, report, output, settings, pretty)
        }
        Commands::Decompile {
            story,
            stats,
            output,
        } => run_decompile(story, stats, output),
        Commands::Stats { story, json } => run_stats(story, json),
        Commands::Bundle {
            template,
            story,
            output,
            placeholder,
            settings,
        } => run_bundle(template, story, output, placeholder, settings),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run_compile(
    sources: Vec<PathBuf>,
    mode: OutputMode,
    validate: bool,
    report_path: Option<PathBuf>,
    output: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    pretty: bool,
) -> PipelineResult<()> {
    let overrides = pretty.then(|| serde_json::json!({"output": {"pretty": true}}));
    let (settings, _) = Settings::build(settings_path.as_deref(), overrides)?;

    let options = CompileOptions {
        validate,
        defaults: settings.story_defaults(),
    };
    let outcome = pipeline::compile(&sources, &options)?;

    for diagnostic in outcome.diagnostics() {
        eprintln!("{}: {}", diagnostic.severity, diagnostic);
    }

    if let Some(path) = report_path.as_deref() {
        write_output(Some(path), &outcome.report().to_json()?)?;
    }

    let mut rendered = outcome.render(mode, settings.output.pretty)?;
    if mode == OutputMode::Stats {
        rendered.push('\n');
    }
    write_output(output.as_deref(), &rendered)
}

fn run_decompile(story: PathBuf, stats: bool, output: Option<PathBuf>) -> PipelineResult<()> {
    let doc = load_story(&story)?;
    let rendered = if stats {
        let mut table = StoryStats::collect(&doc).to_human();
        table.push('\n');
        table
    } else {
        sectioned::write(&to_sectioned_text(&doc))
    };
    write_output(output.as_deref(), &rendered)
}

fn run_stats(story: PathBuf, json: bool) -> PipelineResult<()> {
    let doc = load_story(&story)?;
    let stats = StoryStats::collect(&doc);
    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing stats: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", stats.to_human());
    }
    Ok(())
}

fn run_bundle(
    template: PathBuf,
    story: PathBuf,
    output: Option<PathBuf>,
    placeholder: Option<String>,
    settings_path: Option<PathBuf>,
) -> PipelineResult<()> {
    let overrides = placeholder.map(|p| serde_json::json!({"output": {"placeholder": p}}));
    let (settings, _) = Settings::build(settings_path.as_deref(), overrides)?;

    let template = read_text(&template)?;
    let doc = load_story(&story)?;
    let story_json = to_story_json(&doc)?;

    let bundled = bundle(
        &template,
        &story_json,
        &settings.output.placeholder,
    )?;
    write_output(output.as_deref(), &bundled)
}
