use std::fmt;

use services::{AppServices, LessonSlot, SETUP_INSTRUCTIONS, StudySession, settings_from_env};
use tarot_core::catalog;
use tarot_core::model::{CardName, LessonContent};
use tarot_core::{Arcana, Screen};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCard(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCard(name) => write!(f, "unknown card: {name}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  tarot [browse]          [--db <sqlite_url>]");
    eprintln!("  tarot cards             [--db <sqlite_url>]");
    eprintln!("  tarot study <card name> [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:tarot.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TAROT_DB_URL, TAROT_AI_API_KEY, TAROT_AI_MODEL, TAROT_AI_BASE_URL,");
    eprintln!("  TAROT_AI_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Browse,
    Cards,
    Study(CardName),
}

struct Args {
    command: Command,
    db_url: String,
}

impl Args {
    fn parse(argv: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("TAROT_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://tarot.sqlite3".into(), normalize_sqlite_url);
        let mut positional = Vec::new();

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let command = match positional.split_first() {
            None => Command::Browse,
            Some((first, rest)) => match (first.as_str(), rest.is_empty()) {
                ("browse", true) => Command::Browse,
                ("cards", true) => Command::Cards,
                ("study", false) => {
                    let name = rest.join(" ");
                    if !catalog::contains(&name) {
                        return Err(ArgsError::UnknownCard(name));
                    }
                    Command::Study(CardName::new(name))
                }
                _ => return Err(ArgsError::UnknownArg(positional.join(" "))),
            },
        };

        Ok(Some(Self { command, db_url }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//
// ─── TERMINAL DRIVER ──────────────────────────────────────────────────────────
//

struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prompt and read one trimmed line. `None` on end of input.
    async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        println!("{prompt}");
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

fn print_cards(session: &StudySession, cards: &[CardName]) {
    for (index, card) in cards.iter().enumerate() {
        let mark = if session.is_complete(card) { "✓" } else { " " };
        println!("  {:>2}. [{mark}] {card}", index + 1);
    }
}

fn print_catalog(session: &StudySession) {
    for arcana in Arcana::ALL {
        let summary = session.completed().summary(arcana);
        println!(
            "{} ({}/{})",
            arcana.title(),
            summary.completed,
            summary.total
        );
        match arcana {
            Arcana::Major => print_cards(session, &catalog::major_arcana()),
            Arcana::Minor => {
                for (suit, cards) in catalog::minor_arcana() {
                    println!(" {}", suit.label());
                    print_cards(session, &cards);
                }
            }
        }
    }
}

fn print_lesson(lesson: &LessonContent) {
    println!();
    println!("== {} ==", lesson.name);
    println!();
    println!("{}", lesson.description);
    println!();
    println!("Historia:\n{}", lesson.story);
    println!();
    if !lesson.keywords.is_empty() {
        println!("Palabras clave: {}", lesson.keywords.join(", "));
    }
    println!("Al derecho: {}", lesson.upright_meaning);
    println!("Invertida: {}", lesson.reversed_meaning);
    println!();
}

/// Show the lesson in the slot and run its quiz. Returns `false` on end of input.
async fn run_lesson(
    session: &mut StudySession,
    term: &mut Terminal,
) -> Result<bool, Box<dyn std::error::Error>> {
    let questions = match session.slot() {
        LessonSlot::Ready { lesson, .. } => {
            print_lesson(lesson);
            lesson.quiz.clone()
        }
        LessonSlot::Failed { error, .. } => {
            println!("{}", error.user_message());
            return Ok(true);
        }
        LessonSlot::Idle | LessonSlot::Loading { .. } => return Ok(true),
    };

    loop {
        for (index, question) in questions.iter().enumerate() {
            println!("{}. {}", index + 1, question.question);
            for (n, option) in question.options.iter().enumerate() {
                println!("   {}) {option}", n + 1);
            }
            let choice = loop {
                let Some(line) = term.ask("Elige una opción:").await? else {
                    return Ok(false);
                };
                match line.parse::<usize>() {
                    Ok(n) if (1..=question.options.len()).contains(&n) => break n - 1,
                    _ => println!("Opción no válida."),
                }
            };
            session.answer(index, &question.options[choice])?;
        }

        let result = session.submit_quiz().await?;
        println!("Has acertado {} de {} preguntas.", result.correct, result.total);
        if result.passed {
            println!("¡Carta completada!");
            return Ok(true);
        }

        let Some(line) = term.ask("¿Intentar de nuevo? (s/n)").await? else {
            return Ok(false);
        };
        if !line.eq_ignore_ascii_case("s") {
            return Ok(true);
        }
        session.retry_quiz()?;
    }
}

async fn browse(
    session: &mut StudySession,
    term: &mut Terminal,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match session.navigation().screen() {
            Screen::Home => {
                println!("Curso Interactivo de Tarot");
                for (index, arcana) in Arcana::ALL.iter().enumerate() {
                    let summary = session.completed().summary(*arcana);
                    println!(
                        "  {}. {} ({}/{}) - {}",
                        index + 1,
                        arcana.title(),
                        summary.completed,
                        summary.total,
                        arcana.tagline()
                    );
                }
                let Some(line) = term.ask("Elige una categoría (q para salir):").await? else {
                    return Ok(());
                };
                match line.as_str() {
                    "1" => session.select_category(Arcana::Major)?,
                    "2" => session.select_category(Arcana::Minor)?,
                    "q" => return Ok(()),
                    _ => println!("Opción no válida."),
                }
            }
            Screen::CategoryGrid => {
                let Some(arcana) = session.navigation().selected_category() else {
                    session.home();
                    continue;
                };
                let cards = catalog::cards_for(arcana);
                println!("{}", arcana.title());
                print_cards(session, &cards);
                let Some(line) = term.ask("Elige una carta (b para volver):").await? else {
                    return Ok(());
                };
                if line == "b" {
                    session.back();
                    continue;
                }
                match line.parse::<usize>() {
                    Ok(n) if (1..=cards.len()).contains(&n) => {
                        println!("Generando lección...");
                        session.open_card(cards[n - 1].clone()).await?;
                    }
                    _ => println!("Opción no válida."),
                }
            }
            Screen::CardDetail => {
                if !run_lesson(session, term).await? {
                    return Ok(());
                }
                let retry = matches!(session.slot(), LessonSlot::Failed { .. });
                let prompt = if retry {
                    "r para reintentar, b para volver:"
                } else {
                    "b para volver:"
                };
                let Some(line) = term.ask(prompt).await? else {
                    return Ok(());
                };
                if retry && line == "r" {
                    if let Some(ticket) = session.retry() {
                        println!("Generando lección...");
                        let result = session.fetch(&ticket).await;
                        session.resolve(&ticket, result);
                    }
                } else {
                    session.back();
                }
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1)).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_tracing();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    tracing::debug!(db = %args.db_url, "opening progress database");
    let settings = settings_from_env()?;
    let services = AppServices::new_sqlite(&args.db_url, settings).await?;
    let mut session = services.start_session().await;

    if matches!(args.command, Command::Cards) {
        print_catalog(&session);
        return Ok(());
    }

    if !session.lessons_configured() {
        println!("{SETUP_INSTRUCTIONS}");
        return Ok(());
    }

    let mut term = Terminal::new();
    match args.command {
        Command::Study(card) => {
            let category = catalog::arcana_of(card.as_str()).unwrap_or(Arcana::Major);
            session.select_category(category)?;
            println!("Generando lección...");
            session.open_card(card).await?;
            run_lesson(&mut session, &mut term).await?;
            Ok(())
        }
        Command::Browse | Command::Cards => browse(&mut session, &mut term).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
