use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueHint};

use simplifier::commands::simplify;
use simplifier::llm;
use simplifier::prompts::DEFAULT_PROMPTS_FILE;
use simplifier::study_file::DEFAULT_OUTPUT_DIR;
use simplifier::utils::trim_line;

#[derive(Parser, Debug)]
#[command(
    name = "simplifier",
    version,
    about = "Simplify articles for language learners, right from the terminal.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simplify an article and generate comprehension questions for it
    Simplify {
        /// Article to simplify
        #[arg(
            value_name = "PATH",
            default_value = "article.txt",
            value_hint = ValueHint::FilePath
        )]
        article: PathBuf,
        /// Prompt template file
        #[arg(
            long,
            value_name = "PATH",
            default_value = DEFAULT_PROMPTS_FILE,
            value_hint = ValueHint::FilePath
        )]
        prompts: PathBuf,
        /// Directory the study file is written to
        #[arg(
            long,
            value_name = "DIR",
            default_value = DEFAULT_OUTPUT_DIR,
            value_hint = ValueHint::DirPath
        )]
        output_dir: PathBuf,
    },
    /// Manage LLM helper settings
    Llm {
        /// Store a new API key in the local auth file; prompts for it when KEY is omitted
        #[arg(long, value_name = "KEY", num_args = 0..=1, conflicts_with = "clear")]
        set: Option<Option<String>>,
        /// Remove the stored API key from the local auth file
        #[arg(long, conflicts_with = "test")]
        clear: bool,
        /// Verify the configured API key by calling the OpenRouter API
        #[arg(long, conflicts_with = "clear")]
        test: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simplify {
            article,
            prompts,
            output_dir,
        } => {
            simplify::run(&article, &prompts, &output_dir).await?;
        }
        Command::Llm { set, clear, test } => handle_llm_command(set, clear, test).await?,
    }

    Ok(())
}

async fn handle_llm_command(
    set: Option<Option<String>>,
    clear: bool,
    test: bool,
) -> Result<()> {
    let mut action_taken = false;

    if let Some(key) = set {
        let key = match key {
            Some(key) => key,
            None => llm::prompt_for_api_key()?,
        };
        let Some(key) = trim_line(&key) else {
            bail!("No API key provided.");
        };
        llm::store_api_key(key)?;
        println!("Stored OpenRouter API key in the local auth file.");
        action_taken = true;
    }

    if clear {
        let removed = llm::clear_api_key()?;
        if removed {
            println!("Removed the stored OpenRouter API key.");
        } else {
            println!("No OpenRouter API key found in the auth file.");
        }
        action_taken = true;
    }

    if test {
        let source = llm::test_configured_api_key().await?;
        println!(
            "OpenRouter API key from the {} is valid.",
            source.description()
        );
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set, --clear, or --test.");
    }
    Ok(())
}
