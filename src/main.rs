// Entry point and high-level CLI flow.
//
// - Load the CSV, grade it and print a preview of the scored table.
// - Write the scored CSV (and optionally a JSON summary).
// - On request, ask the text-generation service for a written summary. A
//   failure there is reported but never touches the files already written.
use campaign_grader::config::{api_key_from_env, AppConfig, API_KEY_VAR};
use campaign_grader::error::GradeError;
use campaign_grader::insights::{generate_insights, GeminiClient, TextGenerator};
use campaign_grader::types::{Highlights, ScoredTable};
use campaign_grader::{grade, loader, output, report, util};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-grader")]
#[command(about = "Score advertising campaigns from a CSV export")]
#[command(version)]
struct Cli {
    /// Campaign CSV with Campaign, Total Spend, Total Leads, Total Sales and
    /// Revenue (incl. GST) columns
    input: PathBuf,

    /// Where to write the scored table
    #[arg(short, long, default_value = "campaign_scores.csv")]
    output: PathBuf,

    /// Also write a JSON summary (best/worst campaign, top/bottom extract)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// TOML file with scoring weights and insight settings
    #[arg(long, env = "CAMPAIGN_GRADER_CONFIG")]
    config: Option<PathBuf>,

    /// Rows of the scored table to print
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Request AI insights without asking
    #[arg(long, conflicts_with = "no_insights")]
    insights: bool,

    /// Never request AI insights
    #[arg(long)]
    no_insights: bool,

    /// Model used for insights (overrides config)
    #[arg(long)]
    model: Option<String>,
}

/// Ask a yes/no question on the terminal.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N` or input
/// ended.
fn prompt_yes_no(question: &str) -> bool {
    loop {
        print!("{question} (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Load, grade and export. A load or grading error means no output file is written.
fn run_core(cli: &Cli, config: &AppConfig) -> Result<(ScoredTable, Highlights), GradeError> {
    let table = loader::load_campaigns(&cli.input)?;
    let graded = grade(table, &config.scoring)?;
    let highlights =
        report::highlights(&graded, config.report.extract_size).ok_or(GradeError::EmptyDataset)?;

    println!("Final Campaign Scores");
    println!("(Scored from 0-100, where 100 is best and 0 is worst)\n");
    output::preview_table_rows(&report::score_rows(&graded), cli.preview);

    output::write_scored_csv(&cli.output, &graded)?;
    println!("(Full table exported to {})\n", cli.output.display());

    if let Some(path) = &cli.summary {
        let summary = report::generate_summary(&graded, &highlights);
        output::write_json(path, &summary)?;
        println!("(Summary written to {})\n", path.display());
    }

    println!("Best campaign:  {}", highlights.best_campaign);
    println!("Worst campaign: {}\n", highlights.worst_campaign);
    Ok((graded, highlights))
}

/// Build the insights client once, if a credential is available.
fn insights_client(config: &AppConfig) -> Option<GeminiClient> {
    let Some(key) = api_key_from_env() else {
        warn!("AI insights disabled: set {API_KEY_VAR} in the environment or a .env file");
        return None;
    };
    match GeminiClient::new(&config.insights, key) {
        Ok(client) => Some(client),
        Err(e) => {
            error!(error = %e, "failed to initialise insights client");
            None
        }
    }
}

fn wants_insights(cli: &Cli) -> bool {
    if cli.no_insights {
        return false;
    }
    cli.insights || (io::stdin().is_terminal() && prompt_yes_no("Generate AI insights?"))
}

fn run_insights(client: &dyn TextGenerator, highlights: &Highlights, config: &AppConfig) {
    println!("Analyzing data with {}...\n", client.model_id());
    match generate_insights(client, highlights, &config.insights.currency) {
        Ok(text) => {
            println!("AI Analysis Complete:\n");
            println!("{text}\n");
        }
        Err(e) => {
            error!(error = %e, "insights request failed");
            eprintln!("An error occurred during AI analysis. Check your API key and try again. Error: {e}");
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_grader=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(model) = &cli.model {
        config.insights.model = model.clone();
    }

    let (graded, highlights) = match run_core(&cli, &config) {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "grading failed");
            eprintln!("Failed to grade {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        campaigns = %util::format_int(graded.campaigns.len()),
        output = %cli.output.display(),
        "scored table written"
    );

    if cli.no_insights {
        return ExitCode::SUCCESS;
    }
    let client = insights_client(&config);
    if let Some(client) = &client {
        if wants_insights(&cli) {
            run_insights(client, &highlights, &config);
        }
    } else if cli.insights {
        eprintln!("AI insights unavailable: {API_KEY_VAR} is not set.");
    }
    ExitCode::SUCCESS
}
