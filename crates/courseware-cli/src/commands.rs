use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info_span, warn};

use courseware_document::UploadContext;
use courseware_model::{Rating, RatingSummary};
use courseware_quiz::{
    AnswerSnapshotSink, QuestionSetLoader, QuizSession, SessionError, WallClockTicker,
};

use crate::cli::{EditArgs, FmtArgs, InspectArgs, TakeArgs};
use crate::summary::{print_blocks, print_quiz, print_ratings};
use courseware_cli::config::CliConfig;
use courseware_cli::edit::{edit_file, read_document, write_document};
use courseware_cli::runner::{LineReader, RunOutcome, run_quiz};
use courseware_cli::store::{
    FileSnapshotSink, FileSubmissionStore, JsonQuizLoader, MediaDirUploader,
};

pub fn run_doc_fmt(args: &FmtArgs) -> Result<()> {
    let document = read_document(&args.file)?;
    if args.write {
        write_document(&args.file, &document)
    } else {
        println!("{}", document.to_text());
        Ok(())
    }
}

pub fn run_doc_blocks(file: &Path) -> Result<()> {
    let document = read_document(file)?;
    print_blocks(&document);
    Ok(())
}

pub fn run_doc_edit(args: &EditArgs, config: &CliConfig) -> Result<()> {
    let span = info_span!("edit", file = %args.file.display());
    let _guard = span.enter();
    let context = UploadContext {
        course_id: args.course.clone(),
        lecture_id: args.lecture.clone(),
    };
    let uploader = MediaDirUploader::new(&config.paths.media_dir, config.service.clone());
    let outcome = edit_file(&args.file, &args.op, &context, &uploader)?;
    if let Some(url) = &outcome.image_url {
        println!("Image stored at {url}");
    }
    print_blocks(&outcome.document);
    Ok(())
}

pub fn run_quiz_inspect(args: &InspectArgs) -> Result<()> {
    let (loader, quiz_id) = JsonQuizLoader::for_file(&args.file)?;
    let set = loader
        .load(&quiz_id)
        .with_context(|| format!("load quiz {quiz_id}"))?;
    let at = args.at.unwrap_or_else(Utc::now);
    print_quiz(&set, set.quiz.availability_at(at));
    Ok(())
}

pub fn run_quiz_take(args: &TakeArgs, config: &CliConfig) -> Result<RunOutcome> {
    let (loader, quiz_id) = JsonQuizLoader::for_file(&args.file)?;
    let span = info_span!("attempt", quiz = %quiz_id);
    let _guard = span.enter();

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.paths.output_dir.clone());
    let store = FileSubmissionStore::new(&output_dir);
    let mut session = QuizSession::new(Arc::new(store), Box::new(WallClockTicker::start()));

    let sink = if args.no_autosave || !config.autosave.enabled {
        None
    } else {
        let sink = Arc::new(FileSnapshotSink::new(&output_dir));
        session = session.with_autosave(sink.clone(), config.autosave.clone());
        Some(sink)
    };

    if let Err(error) = session.load(&loader, &quiz_id, Utc::now()) {
        let mut message = error.user_message();
        if let SessionError::Load(load) = &error
            && let Some(suggestion) = load.suggestion()
        {
            message = format!("{message} {suggestion}");
        }
        return Err(anyhow::Error::new(error).context(message));
    }

    let input = LineReader::spawn(io::BufReader::new(io::stdin()));
    let mut stdout = io::stdout();
    let outcome = run_quiz(&mut session, &input, &mut stdout)?;

    if outcome == RunOutcome::Quit
        && let Some(sink) = sink
        && let Some(snapshot) = session.snapshot()
    {
        match sink.save(&snapshot) {
            Ok(()) => println!(
                "Progress saved to {}",
                sink.path_for(&quiz_id).display()
            ),
            Err(error) => warn!("could not save progress on exit: {error}"),
        }
    }
    Ok(outcome)
}

pub fn run_quiz_ratings(file: &Path) -> Result<()> {
    let content = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let ratings: Vec<Rating> =
        serde_json::from_str(&content).with_context(|| format!("parse {}", file.display()))?;
    print_ratings(&RatingSummary::from_ratings(&ratings));
    Ok(())
}
