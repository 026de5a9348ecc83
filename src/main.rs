mod config;
mod engine;
mod phrases;
mod service;
mod session;
mod store;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use engine::diff::{SegmentKind, diff_chars};
use engine::pacing;
use phrases::seed_session;
use service::{ServiceError, Voice};
#[cfg(feature = "network")]
use service::{GrammarCheck, SpeechSynth, openai::OpenAi, textgears::TextGears};
use session::Session;
use session::puzzle::{ErrorSpan, Guess, Puzzle, PuzzleKind, PuzzleStatus};
use session::submit::{SubmitOutcome, apply_checked_guess, skip, submit_guess};
use store::json_store::SessionStore;

// A second of grace between the prompt appearing and the clock counting;
// reading the budget line takes about that long.
const SPEED_GRACE_SECS: f64 = 1.0;

#[derive(Parser)]
#[command(name = "dictee", version, about = "French phrase drill trainer")]
struct Cli {
    #[arg(short, long, help = "Session name to load or create")]
    session: Option<String>,

    #[arg(
        short,
        long,
        value_parser = parse_kind,
        help = "Puzzle kind for new sessions and --add (translate, dictate, speed)"
    )]
    kind: Option<PuzzleKind>,

    #[arg(long, value_name = "PHRASE", help = "Append a phrase to the session and exit")]
    add: Option<String>,

    #[arg(long, value_name = "INDEX", help = "Remove the puzzle at this index and exit")]
    remove: Option<usize>,

    #[arg(long, help = "List the session's puzzles and exit")]
    list: bool,

    #[arg(long, help = "Print the transcript of completed puzzles and exit")]
    transcript: bool,

    #[arg(long, help = "Voice for dictation audio (alloy, echo, fable, onyx, nova, shimmer)")]
    voice: Option<String>,

    #[arg(long, help = "Discard saved state for the session and exit")]
    reset: bool,
}

fn parse_kind(value: &str) -> Result<PuzzleKind, String> {
    match value {
        "translate" => Ok(PuzzleKind::Translate),
        "dictate" => Ok(PuzzleKind::Dictate),
        "speed" => Ok(PuzzleKind::Speed),
        other => Err(format!(
            "unknown kind '{other}' (expected translate, dictate, or speed)"
        )),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load()?;

    let session_key = cli
        .session
        .clone()
        .unwrap_or_else(|| config.session.clone());
    let kind = cli.kind.unwrap_or(PuzzleKind::Dictate);
    let store = SessionStore::new()?;

    if cli.reset {
        store.delete(&session_key)?;
        println!("Session '{session_key}' effacée.");
        return Ok(());
    }

    let mut session = store.load(&session_key).unwrap_or_else(|| {
        info!(key = session_key.as_str(), "seeding new session");
        seed_session(kind)
    });

    if let Some(phrase) = cli.add {
        session.insert_puzzle(kind, &phrase);
        store.save(&session_key, &session)?;
        println!("Phrase ajoutée ({} au total).", session.puzzles.len());
        return Ok(());
    }

    if let Some(index) = cli.remove {
        match session.remove_puzzle(index) {
            Some(removed) => {
                store.save(&session_key, &session)?;
                println!("Phrase retirée : {}", removed.prompt);
            }
            None => println!("Aucune phrase à l'index {index}."),
        }
        return Ok(());
    }

    if cli.list {
        list_session(&session);
        return Ok(());
    }

    if cli.transcript {
        print!("{}", session.transcript());
        return Ok(());
    }

    let voice = match cli.voice.as_deref() {
        Some(name) => Voice::from_name(name).unwrap_or_else(|| {
            warn!(name, "unknown voice, falling back to config");
            config.voice()
        }),
        None => config.voice(),
    };

    run_drill(&store, &session_key, &mut session, &config, voice)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dictee=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn list_session(session: &Session) {
    for (index, puzzle) in session.puzzles.iter().enumerate() {
        println!(
            "{index:>3} [{}] [{}] {} ({} essais, score {})",
            kind_label(puzzle.kind),
            status_label(puzzle.status),
            puzzle.prompt,
            puzzle.guesses.len(),
            puzzle.score
        );
    }
}

fn kind_label(kind: PuzzleKind) -> &'static str {
    match kind {
        PuzzleKind::Translate => "traduction",
        PuzzleKind::Dictate => "dictée",
        PuzzleKind::Speed => "vitesse",
    }
}

fn status_label(status: PuzzleStatus) -> &'static str {
    match status {
        PuzzleStatus::Pending => "en attente",
        PuzzleStatus::InProgress => "en cours",
        PuzzleStatus::Complete => "réussie",
        PuzzleStatus::Skipped => "passée",
    }
}

fn run_drill(
    store: &SessionStore,
    key: &str,
    session: &mut Session,
    config: &Config,
    voice: Voice,
) -> Result<()> {
    let clients = Clients::new(config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Application d'entraînement au français");
    println!("Commandes : 'skip' pour passer, 'quit' pour sortir.");

    loop {
        let Some(index) = session.active_index() else {
            println!("Session vide. Ajoutez des phrases avec --add.");
            return Ok(());
        };
        if session.is_finished() {
            println!();
            println!(
                "Session terminée ! Score total : {} | Meilleur score : {}",
                session.total_score(),
                session.max_score()
            );
            return Ok(());
        }

        println!();
        println!(
            "Score total : {} | Meilleur score : {}",
            session.total_score(),
            session.max_score()
        );

        let puzzle = session.puzzles[index].clone();
        println!(
            "Phrase {}/{} [{}]",
            index + 1,
            session.puzzles.len(),
            kind_label(puzzle.kind)
        );
        if let Some(last) = puzzle.guesses.last() {
            println!("Dernier essai : {}", last.text);
        }

        present_prompt(&puzzle, &clients, voice);

        let budget = (puzzle.kind == PuzzleKind::Speed).then(|| {
            pacing::time_budget(pacing::estimate_cps(&session.puzzles), &puzzle.prompt)
        });
        if let Some(budget) = budget {
            println!("Temps imparti : {budget:.1} s");
        }
        let started = (puzzle.kind == PuzzleKind::Speed).then(Instant::now);

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            store.save(key, session)?;
            return Ok(());
        };
        let input = line?;
        let elapsed = started.map(|t| (t.elapsed().as_secs_f64() - SPEED_GRACE_SECS).max(0.0));

        match input.trim() {
            "quit" => {
                store.save(key, session)?;
                println!("À bientôt !");
                return Ok(());
            }
            "skip" => {
                session.puzzles[index] = skip(&session.puzzles[index]);
                store.save(key, session)?;
                println!("Phrase passée.");
                continue;
            }
            _ => {}
        }

        let outcome = match submit(&clients, config, &puzzle, &input, elapsed) {
            Some(outcome) => outcome,
            None => continue,
        };

        let mut next = outcome.puzzle;
        if outcome.completed {
            println!("Réussi ! Score de la phrase : {}.", next.score);
            if let (Some(elapsed), Some(budget)) = (next.elapsed_secs, budget) {
                println!("Temps : {elapsed:.1} s (imparti : {budget:.1} s)");
            }
            let science_fact = roll_science_fact(config);
            if let Some(feedback) =
                clients.feedback(&session.puzzles[..index], &next, science_fact)
            {
                println!("Tuteur : {feedback}");
                next.feedback = Some(feedback);
            }
        } else if let Some(last) = next.guesses.last() {
            render_errors(last);
        }

        session.puzzles[index] = next;
        store.save(key, session)?;
    }
}

/// Route a guess to its error source: translations go through a grammar
/// checker when one is configured, everything else through the word diff.
/// A checker failure records nothing so the attempt can simply be retried.
fn submit(
    clients: &Clients,
    config: &Config,
    puzzle: &Puzzle,
    input: &str,
    elapsed: Option<f64>,
) -> Option<SubmitOutcome> {
    if puzzle.kind == PuzzleKind::Translate && !input.is_empty() {
        match clients.check(input, &config.language) {
            Some(Ok(errors)) => return Some(apply_checked_guess(puzzle, input, errors)),
            Some(Err(err)) => {
                println!("Vérification impossible ({err}) ; rien n'est enregistré.");
                return None;
            }
            None => {
                println!("Aucun vérificateur configuré ; comparaison mot à mot.");
            }
        }
    }
    Some(submit_guess(puzzle, input, elapsed))
}

fn present_prompt(puzzle: &Puzzle, clients: &Clients, voice: Voice) {
    match puzzle.kind {
        PuzzleKind::Translate => println!("Traduisez : {}", puzzle.prompt),
        PuzzleKind::Dictate | PuzzleKind::Speed => match write_audio(clients, puzzle, voice) {
            Some(path) => println!("Écoutez : {}", path.display()),
            None => println!("Écrivez : {}", puzzle.prompt),
        },
    }
}

/// Synthesize the prompt and park the mp3 next to the session files.
/// Returns None when no synthesizer is configured or the call failed; the
/// caller then shows the phrase instead.
fn write_audio(clients: &Clients, puzzle: &Puzzle, voice: Voice) -> Option<PathBuf> {
    let bytes = clients.synthesize(&puzzle.prompt, voice)?;
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dictee")
        .join("audio");
    if let Err(err) = fs::create_dir_all(&dir) {
        warn!(error = %err, "could not create audio directory");
        return None;
    }
    let path = dir.join(format!("{}.mp3", puzzle.id));
    match fs::write(&path, bytes) {
        Ok(()) => Some(path),
        Err(err) => {
            warn!(error = %err, "could not write audio file");
            None
        }
    }
}

/// Underline each error span and show corrections. Spans carry character
/// offsets, so the caret line is built in characters too.
fn render_errors(guess: &Guess) {
    println!("  {}", guess.text);
    let mut carets = vec![' '; guess.text.chars().count() + 1];
    for span in &guess.errors {
        if span.length == 0 {
            if span.offset < carets.len() {
                carets[span.offset] = '^';
            }
        } else {
            for i in span.offset..(span.offset + span.length).min(carets.len()) {
                carets[i] = '^';
            }
        }
    }
    println!("  {}", carets.into_iter().collect::<String>());

    for span in &guess.errors {
        let Some(better) = &span.better else {
            continue;
        };
        let wrong: String = guess
            .text
            .chars()
            .skip(span.offset)
            .take(span.length)
            .collect();
        if wrong.trim().is_empty() {
            println!("  attendu : {better}");
        } else {
            println!("  {} -> {}", wrong.trim_end(), char_hint(wrong.trim_end(), better));
        }
    }
}

/// Character-level view of a correction: wrong characters in brackets,
/// missing ones in parentheses. "va" against "vais" reads "va(is)".
fn char_hint(wrong: &str, better: &str) -> String {
    let mut out = String::new();
    for segment in diff_chars(wrong, better) {
        match segment.kind {
            SegmentKind::Unchanged => out.push_str(&segment.text),
            SegmentKind::Removed => {
                out.push('[');
                out.push_str(&segment.text);
                out.push(']');
            }
            SegmentKind::Added => {
                out.push('(');
                out.push_str(&segment.text);
                out.push(')');
            }
        }
    }
    out
}

fn roll_science_fact(config: &Config) -> bool {
    rand::thread_rng().gen_bool(config.science_fact_chance.clamp(0.0, 1.0))
}

#[cfg(feature = "network")]
struct Clients {
    openai: Option<OpenAi>,
    textgears: Option<TextGears>,
}

#[cfg(feature = "network")]
impl Clients {
    fn new(config: &Config) -> Self {
        Self {
            openai: OpenAi::from_config(config),
            textgears: TextGears::from_config(config),
        }
    }

    /// Grammar check with TextGears first, the word-verdict checker as the
    /// fallback. None means no checker is configured at all.
    fn check(&self, text: &str, language: &str) -> Option<Result<Vec<ErrorSpan>, ServiceError>> {
        let findings = if let Some(tg) = &self.textgears {
            tg.check(text, language)
        } else if let Some(oa) = &self.openai {
            oa.check(text, language)
        } else {
            return None;
        };
        Some(findings.map(|f| f.into_iter().map(Into::into).collect()))
    }

    fn synthesize(&self, text: &str, voice: Voice) -> Option<Vec<u8>> {
        let openai = self.openai.as_ref()?;
        match openai.synthesize(text, voice) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(error = %err, "speech synthesis failed, showing text instead");
                None
            }
        }
    }

    fn feedback(&self, prior: &[Puzzle], current: &Puzzle, science_fact: bool) -> Option<String> {
        let openai = self.openai.as_ref()?;
        match openai.feedback(prior, current, science_fact) {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "feedback request failed");
                None
            }
        }
    }
}

#[cfg(not(feature = "network"))]
struct Clients;

#[cfg(not(feature = "network"))]
impl Clients {
    fn new(_config: &Config) -> Self {
        Clients
    }

    fn check(&self, _text: &str, _language: &str) -> Option<Result<Vec<ErrorSpan>, ServiceError>> {
        None
    }

    fn synthesize(&self, _text: &str, _voice: Voice) -> Option<Vec<u8>> {
        None
    }

    fn feedback(
        &self,
        _prior: &[Puzzle],
        _current: &Puzzle,
        _science_fact: bool,
    ) -> Option<String> {
        None
    }
}
