//! quiz: topic-balanced quiz sessions in the terminal.

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiz_core::model::{QuizSettings, TopicFilter};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{DEFAULT_DB_URL, load_bank, normalize_sqlite_url, prepare_sqlite_file};
use terminal::{QuizStep, Terminal};

#[derive(Parser)]
#[command(
    name = "quiz",
    version,
    about = "Topic-balanced quizzes with a local high-score ledger",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// SQLite database URL or path
    #[arg(long, global = true, env = "QUIZ_DB_URL", default_value = DEFAULT_DB_URL)]
    db: String,

    /// Question bank JSON file (defaults to the built-in bank)
    #[arg(long, global = true, env = "QUIZ_BANK")]
    bank: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Options for the default `play` command
    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Args, Clone)]
struct PlayArgs {
    /// Comma-separated topics; saved as the new preference
    #[arg(long)]
    topics: Option<String>,

    /// Questions per quiz
    #[arg(long, env = "QUIZ_LENGTH", default_value_t = QuizSettings::DEFAULT_QUIZ_LENGTH)]
    length: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz (default)
    Play(PlayArgs),

    /// Show the high-score table
    Scores {
        /// Rows to show
        #[arg(long, default_value_t = QuizSettings::DEFAULT_LEADERBOARD_SIZE)]
        limit: usize,
    },

    /// Delete all high scores
    ClearScores,

    /// Inspect or change the saved topic preference
    Topics {
        #[command(subcommand)]
        action: TopicsAction,
    },
}

#[derive(Subcommand)]
enum TopicsAction {
    /// List bank topics and the saved preference
    List,
    /// Save a comma-separated topic list
    Set { topics: String },
    /// Forget the saved preference
    Clear,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn settings_for(command: &Commands) -> Result<QuizSettings, quiz_core::Error> {
    let (length, limit) = match command {
        Commands::Play(args) => (args.length, QuizSettings::DEFAULT_LEADERBOARD_SIZE),
        Commands::Scores { limit } => (QuizSettings::DEFAULT_QUIZ_LENGTH, *limit),
        Commands::ClearScores | Commands::Topics { .. } => (
            QuizSettings::DEFAULT_QUIZ_LENGTH,
            QuizSettings::DEFAULT_LEADERBOARD_SIZE,
        ),
    };
    Ok(QuizSettings::new(
        length,
        QuizSettings::DEFAULT_LEDGER_CAPACITY,
        limit,
    )?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play(cli.play));

    let settings = settings_for(&command)?;
    let bank = load_bank(cli.bank.as_deref())?;
    let db_url = normalize_sqlite_url(&cli.db)?;
    prepare_sqlite_file(&db_url)?;
    let app = AppServices::new_sqlite(&db_url, Clock::system(), bank, settings).await?;

    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());

    match command {
        Commands::Play(args) => {
            if let Some(raw) = args.topics {
                app.preferences().save(&TopicFilter::parse_list(&raw)).await;
            }
            play(&app, &mut terminal).await?;
        }
        Commands::Scores { .. } => {
            terminal.show_scores(&app.ledger().top().await)?;
        }
        Commands::ClearScores => {
            app.ledger().clear().await;
            terminal.message("High scores cleared.")?;
        }
        Commands::Topics { action } => match action {
            TopicsAction::List => {
                let available = app.quiz_loop().bank().topics();
                terminal.show_topics(&available, &app.preferences().load().await)?;
            }
            TopicsAction::Set { topics } => {
                let filter = TopicFilter::parse_list(&topics);
                let known = app.quiz_loop().bank().topics();
                for topic in filter.topics().iter().filter(|t| !known.contains(t)) {
                    terminal.message(&format!("warning: no questions for topic {topic}"))?;
                }
                app.preferences().save(&filter).await;
                terminal.message(&format!("Saved topics: {}", filter.label()))?;
            }
            TopicsAction::Clear => {
                app.preferences().clear().await;
                terminal.message("Saved topics cleared.")?;
            }
        },
    }
    Ok(())
}

async fn play<R, W>(
    app: &AppServices,
    terminal: &mut Terminal<R, W>,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: io::BufRead,
    W: io::Write,
{
    let quiz = app.quiz_loop();
    let mut session = quiz.start_session().await;
    if session.fell_back() {
        terminal.message("No questions match the saved topics; using all topics.")?;
    }

    loop {
        match terminal.answer_all(&mut session)? {
            QuizStep::Ready => {}
            QuizStep::Restart => {
                session = quiz.restart(&session);
                continue;
            }
            QuizStep::Stopped => return Ok(()),
        }
        let outcome = quiz.submit(&mut session).await?;
        terminal.show_outcome(&outcome, &session.review().unwrap_or_default())?;
        if !terminal.confirm("Play again?")? {
            return Ok(());
        }
        session = quiz.restart(&session);
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionBank, QuestionId, QuestionKind, Topic};
    use quiz_core::time::fixed_now;
    use std::io::Cursor;

    fn app() -> AppServices {
        let questions = (1..=2)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    Topic::new("science").unwrap(),
                    format!("Q{id}"),
                    "",
                    QuestionKind::Boolean { answer: true },
                )
                .unwrap()
            })
            .collect();
        AppServices::in_memory(
            Clock::fixed(fixed_now()),
            QuestionBank::new(questions).unwrap(),
            QuizSettings::default(),
        )
    }

    #[tokio::test]
    async fn restart_mid_quiz_starts_over_and_records_one_score() {
        let app = app();
        let mut terminal = Terminal::new(Cursor::new("2\nr\n1\n1\nn\n"), Vec::new());
        play(&app, &mut terminal).await.unwrap();

        let text = String::from_utf8(terminal.into_output()).unwrap();
        assert_eq!(text.matches("Question 1 of 2").count(), 2);
        assert!(text.contains("You scored 2/2 (100%)"));

        let scores = app.ledger().top().await;
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].correct, 2);
    }
}
