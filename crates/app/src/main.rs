mod input;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use quiz_core::model::{OptionId, PassPolicy, Topic};
use services::{
    ActivationOutcome, AppServices, Clock, ConfigError, NoticeLog, NoticeSink, QuestionSource,
    QuizServiceConfig, QuizSessionController, SubmitOutcome, TeeNoticeSink, TracingNoticeSink,
    VerdictSource,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::input::{Choice, Command, HELP};
use crate::render::{NoticeLine, Screen};

/// Take a generated multiple-choice quiz in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Topic to generate questions for
    #[arg(short, long, env = "QUIZ_TOPIC", default_value = "Doppler Effect")]
    topic: String,

    /// Text file with source notes to ground the questions in
    #[arg(short, long)]
    notes: Option<PathBuf>,

    /// JSON file to load questions from instead of the generation service
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Judge answers locally instead of calling the verdict service
    #[arg(long)]
    offline_verdict: bool,

    /// Base URL of the quiz API (overrides QUIZ_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Correct answers needed to pass (overrides QUIZ_PASS_THRESHOLD)
    #[arg(long)]
    pass_threshold: Option<usize>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate the domain values taken from the command line.
fn session_inputs(args: &Args) -> Result<(Topic, Option<PassPolicy>), quiz_core::Error> {
    let topic = Topic::parse(args.topic.as_str())?;
    let policy = args.pass_threshold.map(PassPolicy::new).transpose()?;
    Ok((topic, policy))
}

fn build_config(
    args: &Args,
    policy: Option<PassPolicy>,
) -> Result<QuizServiceConfig, ConfigError> {
    let config = match &args.base_url {
        Some(raw) => QuizServiceConfig::from_env_with_base_url(raw)?,
        None => QuizServiceConfig::from_env()?,
    };
    Ok(match policy {
        Some(policy) => config.with_pass_policy(policy),
        None => config,
    })
}

fn flush_notices(log: &NoticeLog) {
    for notice in log.drain() {
        println!("{}", NoticeLine(&notice));
    }
}

fn show(controller: &QuizSessionController, log: &NoticeLog) {
    flush_notices(log);
    print!("{}", Screen(&controller.view()));
}

/// Resolve a typed choice against the options of the current question.
fn resolve_choice(controller: &QuizSessionController, choice: Choice) -> Option<OptionId> {
    match choice {
        Choice::Id(raw) => Some(OptionId::new(raw)),
        Choice::Position(position) => {
            let question = controller.current_question()?;
            question
                .options()
                .get(position - 1)
                .map(|option| option.id.clone())
                .or_else(|| Some(OptionId::new(position.to_string())))
        }
    }
}

async fn start(
    controller: &mut QuizSessionController,
    topic: Topic,
    notes: Option<String>,
    log: &NoticeLog,
) {
    println!("Generating questions for {topic}...");
    match controller.activate(topic, notes).await {
        ActivationOutcome::Loaded { questions } => debug!(questions, "quiz ready"),
        ActivationOutcome::Failed | ActivationOutcome::Stale => {}
    }
    show(controller, log);
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let (topic, policy) = session_inputs(&args)?;
    let config = build_config(&args, policy)?;
    let notes = match &args.notes {
        Some(path) => Some(tokio::fs::read_to_string(path).await?),
        None => None,
    };
    let questions = match &args.questions {
        Some(path) => QuestionSource::File(path.clone()),
        None => QuestionSource::Http,
    };
    let verdicts = if args.offline_verdict {
        VerdictSource::Local
    } else {
        VerdictSource::Http
    };

    let log = NoticeLog::new();
    let sinks: Vec<Arc<dyn NoticeSink + Send + Sync>> =
        vec![Arc::new(TracingNoticeSink), Arc::new(log.clone())];
    let services = AppServices::new(
        Clock::system(),
        config,
        questions,
        verdicts,
        Arc::new(TeeNoticeSink::new(sinks)),
    )?;
    let mut controller = services.quiz_session();

    start(&mut controller, topic, notes.clone(), &log).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match command {
            Command::Choose(choice) => {
                let Some(option) = resolve_choice(&controller, choice) else {
                    println!("No current question.");
                    continue;
                };
                match controller.select_option(option) {
                    Ok(()) => {
                        if !controller.state().is_last_question() {
                            controller.next();
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Command::Next => {
                if !controller.next() {
                    println!("Already at the last question.");
                }
            }
            Command::Previous => {
                if !controller.previous() {
                    println!("Already at the first question.");
                }
            }
            Command::GoTo(number) => {
                if number > controller.state().questions().len() {
                    println!("No question {number}.");
                } else {
                    controller.go_to(number - 1);
                }
            }
            Command::Submit => match controller.submit().await {
                Ok(SubmitOutcome::Recorded(verdict)) => {
                    debug!(passed = verdict.passed, "quiz submitted");
                }
                Ok(SubmitOutcome::Failed | SubmitOutcome::Stale) => {}
                Err(err) => println!("{err}"),
            },
            Command::Retry => controller.retry(),
            Command::Topic(raw) => match Topic::parse(raw) {
                Ok(topic) => {
                    start(&mut controller, topic, notes.clone(), &log).await;
                    continue;
                }
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            },
            Command::Show => {}
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }

        show(&controller, &log);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
