//! CLI command handlers.

use std::fs;

use crate::config::PipelineConfig;
use crate::text::{parse_split, CaptionCorpus};
use crate::vocab::Vocabulary;
use crate::Result;

use super::logging::LogLevel;
use super::{Cli, Command, InfoArgs, PrepareArgs, VocabArgs};

/// Dispatch a parsed CLI invocation
pub fn run_command(cli: Cli) -> Result<()> {
    let level = LogLevel::from_flags(cli.verbose, cli.quiet);
    match cli.command {
        Command::Prepare(args) => prepare(&args, level),
        Command::Vocab(args) => vocab(&args, level),
        Command::Info(args) => info(&args, level),
    }
}

fn prepare(args: &PrepareArgs, level: LogLevel) -> Result<()> {
    let raw = fs::read_to_string(&args.captions)?;
    let mut corpus = CaptionCorpus::parse(&raw);
    corpus.clean();
    corpus.save(&args.output)?;

    level.emit(
        LogLevel::Normal,
        &format!(
            "cleaned {} captions across {} photos -> {}",
            corpus.num_captions(),
            corpus.len(),
            args.output.display()
        ),
    );
    Ok(())
}

fn vocab(args: &VocabArgs, level: LogLevel) -> Result<()> {
    let config = PipelineConfig::default().with_min_frequency(args.min_frequency);
    config.validate()?;

    let corpus = CaptionCorpus::load(&args.corpus)?;
    let split = parse_split(&fs::read_to_string(&args.split)?);
    let train = corpus.subset(&split)?.wrapped();

    let vocab = Vocabulary::build(&train, config.min_frequency);
    vocab.save(&args.output)?;

    level.emit(
        LogLevel::Normal,
        &format!("vocab size: {}", vocab.vocab_size()),
    );
    level.emit(
        LogLevel::Normal,
        &format!("max length: {}", vocab.max_length()),
    );
    level.emit(
        LogLevel::Verbose,
        &format!(
            "built from {} photos with min frequency {}",
            train.len(),
            config.min_frequency
        ),
    );
    Ok(())
}

fn info(args: &InfoArgs, level: LogLevel) -> Result<()> {
    if let Ok(vocab) = Vocabulary::load(&args.artifact) {
        level.emit(
            LogLevel::Normal,
            &format!(
                "vocabulary: {} ids (padding included), max length {}",
                vocab.vocab_size(),
                vocab.max_length()
            ),
        );
        return Ok(());
    }

    let corpus = CaptionCorpus::load(&args.artifact)?;
    level.emit(
        LogLevel::Normal,
        &format!(
            "corpus: {} photos, {} captions, longest caption {} tokens",
            corpus.len(),
            corpus.num_captions(),
            corpus.max_caption_len()
        ),
    );
    Ok(())
}
