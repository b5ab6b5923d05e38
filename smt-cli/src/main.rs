//! smt - command-line interface for the word-based translator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::LevelFilter;
use smt_core::corpus::{SOURCE_FILE, TARGET_FILE};
use smt_core::evaluation::{BleuResult, compute_bleu_with_order};
use smt_core::model::{DEFAULT_LOG_PROB, DecodeOptions, Translator};
use smt_core::preprocess::prepare;

#[derive(Parser)]
#[command(name = "smt")]
#[command(about = "Word-based statistical translation with BLEU evaluation", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train (or refresh the cached model of) a corpus directory
    Train(CorpusArgs),
    /// Translate a sentence, optionally scoring it against a reference
    Translate(TranslateArgs),
    /// Compute BLEU between a candidate and a reference sentence
    Bleu(BleuArgs),
    /// Score the fluency of a target-language sentence
    Score(ScoreArgs),
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory containing source.txt and target.txt
    corpus: PathBuf,
}

#[derive(Args)]
struct TranslateArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Source sentence
    text: String,

    /// Reference translation for BLEU
    #[arg(short, long)]
    reference: Option<String>,

    /// Log-probability charged for unseen bigrams
    #[arg(long, default_value_t = DEFAULT_LOG_PROB, allow_hyphen_values = true)]
    default_log_prob: f64,
}

#[derive(Args)]
struct BleuArgs {
    /// Candidate translation
    candidate: String,

    /// Reference translation
    reference: String,

    /// Highest n-gram order
    #[arg(long, default_value_t = 4)]
    max_order: usize,
}

#[derive(Args)]
struct ScoreArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Target-language sentence
    text: String,

    /// Log-probability charged for unseen bigrams
    #[arg(long, default_value_t = DEFAULT_LOG_PROB, allow_hyphen_values = true)]
    default_log_prob: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Translate(args) => run_translate(args),
        Commands::Bleu(args) => run_bleu(args),
        Commands::Score(args) => run_score(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    logger_builder(Env::default().default_filter_or("info"), verbose, quiet).init();
}

/// `RUST_LOG` (or `info`) decides unless `-v`/`-q` was given.
fn logger_builder(env: Env<'_>, verbose: u8, quiet: u8) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env);
    if verbose > 0 || quiet > 0 {
        let level = match (quiet, verbose) {
            (0, 1) => LevelFilter::Debug,
            (0, _) => LevelFilter::Trace,
            (1, _) => LevelFilter::Warn,
            _ => LevelFilter::Error,
        };
        builder.filter_level(level);
    }
    builder
}

fn load(args: &CorpusArgs) -> Result<Translator> {
    let source = args.corpus.join(SOURCE_FILE);
    let target = args.corpus.join(TARGET_FILE);
    Translator::from_corpus(&source, &target)
        .with_context(|| format!("failed to load corpus {}", args.corpus.display()))
}

fn print_bleu(bleu: &BleuResult) {
    println!("BLEU:            {:.4}", bleu.bleu());
    println!("Brevity penalty: {:.4}", bleu.brevity_penalty());
    for (i, precision) in bleu.precisions().iter().enumerate() {
        println!("{}-gram:          {:.4}", i + 1, precision);
    }
}

fn run_train(args: CorpusArgs) -> Result<()> {
    let translator = load(&args)?;
    println!("Source words: {}", translator.table().len());
    println!("Bigrams:      {}", translator.language_model().len());
    Ok(())
}

fn run_translate(args: TranslateArgs) -> Result<()> {
    let translator = load(&args.corpus)?;
    let options = DecodeOptions { default_log_prob: args.default_log_prob };

    match args.reference {
        Some(reference) => {
            let evaluation = translator.evaluate(&args.text, &reference, &options);
            println!("{}", evaluation.translation.text);
            println!("Fluency:         {:.4}", evaluation.translation.fluency);
            print_bleu(&evaluation.bleu);
        }
        None => {
            let translation = translator.translate(&args.text, &options);
            println!("{}", translation.text);
            println!("Fluency:         {:.4}", translation.fluency);
        }
    }
    Ok(())
}

fn run_bleu(args: BleuArgs) -> Result<()> {
    let candidate = prepare(&args.candidate);
    let reference = prepare(&args.reference);
    let bleu = compute_bleu_with_order(&candidate, &reference, args.max_order)?;
    print_bleu(&bleu);
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let translator = load(&args.corpus)?;
    let tokens = prepare(&args.text);
    println!("{:.4}", translator.language_model().score(&tokens, args.default_log_prob));
    Ok(())
}
