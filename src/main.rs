use std::fs::OpenOptions;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quiz_review::{
    load_quiz_data, JsonFileStorage, Quiz, QuizData, QuizError, QuizStateManager, ReviewQuestion,
    StateStorage,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the quiz content from
    #[arg(short, long)]
    questions: PathBuf,

    /// Directory holding the saved progress
    #[arg(short, long, default_value = ".")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take quizzes in the terminal (default)
    Play,
    /// Print per-category progress and the review list
    Status,
    /// Forget one category's progress and review questions
    Reset {
        /// Category id as written in the quiz content
        category: String,
    },
    /// Wipe all saved progress and review questions
    Clear,
}

/// Log file used while the terminal UI owns the screen.
const PLAY_LOG_FILE: &str = "quiz-review.log";

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), QuizError> {
    match args.command.as_ref().unwrap_or(&Command::Play) {
        Command::Play => Quiz::open(&args.questions, &args.state_dir)?.run(),
        Command::Status => print_status(args),
        Command::Reset { category } => {
            let data = load_quiz_data(&args.questions)?;
            if data.category(category).is_none() {
                log::warn!("{} is not a category in {}", category, args.questions.display());
            }
            let mut manager = open_manager(args)?;
            manager.reset_category_progress(category)?;
            println!("Reset {}", category);
            Ok(())
        }
        Command::Clear => {
            // Works on the raw slot so an unreadable state file can be cleared too.
            let mut storage = JsonFileStorage::in_dir(&args.state_dir);
            storage.clear()?;
            log::info!("Cleared all quiz state");
            println!("Cleared {}", storage.path().display());
            Ok(())
        }
    }
}

/// Where log records go instead of stderr, if anywhere.
fn log_file(args: &Args) -> Option<PathBuf> {
    match args.command.as_ref().unwrap_or(&Command::Play) {
        Command::Play => Some(args.state_dir.join(PLAY_LOG_FILE)),
        _ => None,
    }
}

fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file(args) {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                // No logger at all: stderr would draw over the quiz screen.
                eprintln!("Logging disabled, cannot open {}: {}", path.display(), e);
                return;
            }
        }
    }
    builder.init();
}

fn open_manager(args: &Args) -> Result<QuizStateManager<JsonFileStorage>, QuizError> {
    let storage = JsonFileStorage::in_dir(&args.state_dir);
    log::debug!("Using saved state at {}", storage.path().display());
    Ok(QuizStateManager::new(storage)?)
}

fn print_status(args: &Args) -> Result<(), QuizError> {
    let data = load_quiz_data(&args.questions)?;
    let manager = open_manager(args)?;

    println!("{}", data.metadata.title);
    for category in &data.categories {
        let summary = manager.category_summary(&category.id, category.total_questions());
        print!(
            "  {:<24} {:>3}/{:<3} {:<12}",
            category.id,
            summary.total_answered,
            summary.total_questions,
            summary.status().label()
        );
        if summary.total_answered > 0 {
            print!(" {:5.1}%", summary.accuracy);
        }
        if summary.needs_review() {
            print!("  review: {}", summary.review_count);
        }
        println!();
    }

    print_review_list(&data, manager.get_review_questions());
    Ok(())
}

fn print_review_list(data: &QuizData, reviews: &[ReviewQuestion]) {
    if reviews.is_empty() {
        println!("Nothing to review.");
        return;
    }

    println!("Review list:");
    for review in reviews {
        let text = data
            .question(&review.category_id, review.question_index)
            .map_or("(question no longer exists)", |q| q.text.as_str());
        println!(
            "  {}#{} missed {}x, last {}: {}",
            review.category_id,
            review.question_index + 1,
            review.error_count,
            review.last_error_at.format("%Y-%m-%d %H:%M"),
            text
        );
    }
}
