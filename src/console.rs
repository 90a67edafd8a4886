//! Text front end: every line typed at the prompt becomes one [`Command`].

use std::fmt::{self, Write as _};

use crate::app::App;
use crate::features::{DictionaryBack, DictionaryMode, Panel};
use crate::quiz::{AnswerOutcome, Highlight, HintOutcome, QuizPhase, ANSWER_COUNT};
use crate::settings::percent_label;
use crate::words::Language;

pub const HELP_TEXT: &str = "\
Tracking:   found <id> | lost | tap [id]
Home:       scan | dict | quiz | settings | home
Camera:     info | quiz | walk | attack | say | reset
Dictionary: list | search <text> | select <id> | say | sound | back
Quiz:       answer <1-4> | hint
Settings:   sfx <0-1> | voice <0-1> | count <n> | autogen on|off
Other:      status | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scan,
    Found(String),
    Lost,
    Tap(Option<String>),
    Info,
    Reset,
    Walk,
    Attack,
    Dictionary,
    Search(String),
    Select(String),
    List,
    Say,
    Sound,
    Back,
    Quiz,
    Answer(usize),
    Hint,
    Settings,
    Sfx(f32),
    Voice(f32),
    Count(u32),
    AutoGenerate(bool),
    Home,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidArgument { command: &'static str, value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::Unknown(name) => write!(f, "unknown command '{}', type 'help'", name),
            ParseError::MissingArgument(command) => write!(f, "'{}' needs an argument", command),
            ParseError::InvalidArgument { command, value } => {
                write!(f, "'{}' is not a valid argument for '{}'", value, command)
            }
        }
    }
}

impl std::error::Error for ParseError {}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn invalid(command: &'static str, value: &str) -> ParseError {
    ParseError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

fn volume(command: &'static str, rest: &str) -> Result<f32, ParseError> {
    let raw = required(command, rest)?;
    match raw.parse::<f32>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(invalid(command, raw)),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "scan" => Command::Scan,
            "found" => Command::Found(required("found", rest)?.to_string()),
            "lost" => Command::Lost,
            "tap" => Command::Tap((!rest.is_empty()).then(|| rest.to_string())),
            "info" => Command::Info,
            "reset" => Command::Reset,
            "walk" => Command::Walk,
            "attack" => Command::Attack,
            "dict" => Command::Dictionary,
            // an empty search shows everything
            "search" => Command::Search(rest.to_string()),
            "select" => Command::Select(required("select", rest)?.to_string()),
            "list" => Command::List,
            "say" => Command::Say,
            "sound" => Command::Sound,
            "back" => Command::Back,
            "quiz" => Command::Quiz,
            "answer" => {
                let raw = required("answer", rest)?;
                match raw.parse::<usize>() {
                    Ok(n) if (1..=ANSWER_COUNT).contains(&n) => Command::Answer(n - 1),
                    _ => return Err(invalid("answer", raw)),
                }
            }
            "hint" => Command::Hint,
            "settings" => Command::Settings,
            "sfx" => Command::Sfx(volume("sfx", rest)?),
            "voice" => Command::Voice(volume("voice", rest)?),
            "count" => {
                let raw = required("count", rest)?;
                match raw.parse::<u32>() {
                    Ok(n) if n > 0 => Command::Count(n),
                    _ => return Err(invalid("count", raw)),
                }
            }
            "autogen" => match required("autogen", rest)?.to_lowercase().as_str() {
                "on" => Command::AutoGenerate(true),
                "off" => Command::AutoGenerate(false),
                _ => return Err(invalid("autogen", rest)),
            },
            "home" => Command::Home,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Runs one command and returns the text to show for it.
pub fn execute(app: &mut App, command: Command) -> String {
    match command {
        Command::Scan => {
            app.open_scan();
            render_scan(app)
        }
        Command::Found(id) => {
            app.target_found(&id);
            render_panel(app)
        }
        Command::Lost => {
            app.target_lost();
            render_panel(app)
        }
        Command::Tap(hit) => {
            app.tap(hit);
            "Tap queued".to_string()
        }
        Command::Info => {
            if app.view_info() {
                render_dictionary(app)
            } else {
                "Nothing is being tracked".to_string()
            }
        }
        Command::Walk => played(app.walk(), "Walking"),
        Command::Attack => played(app.attack(), "Attacking"),
        Command::Dictionary => {
            app.open_dictionary();
            render_dictionary(app)
        }
        Command::Search(text) => {
            app.search(&text);
            render_dictionary(app)
        }
        Command::Select(id) => {
            if app.select_word(&id) {
                render_dictionary(app)
            } else {
                format!("No word with id '{}'", id)
            }
        }
        Command::List => render_dictionary(app),
        Command::Say => {
            let spoken = match app.panel() {
                Panel::Scan => app.pronounce(),
                Panel::Dictionary => app.play_word(),
                _ => false,
            };
            played(spoken, "Playing pronunciation")
        }
        Command::Sound => {
            let played_sound = app.panel() == Panel::Dictionary && app.play_word_sound();
            played(played_sound, "Playing sound")
        }
        Command::Back => match app.panel() {
            Panel::Dictionary => match app.dictionary_back() {
                DictionaryBack::ToList => render_dictionary(app),
                DictionaryBack::ToScan | DictionaryBack::ToHome => render_panel(app),
            },
            Panel::Home => render_panel(app),
            _ => {
                app.back_to_home();
                render_panel(app)
            }
        },
        Command::Reset => {
            if app.reset_scan() {
                render_scan(app)
            } else {
                "Nothing to reset".to_string()
            }
        }
        Command::Quiz => {
            // the camera's quiz button keeps the tracked card
            if app.panel() != Panel::Scan || !app.quiz_from_scan() {
                app.open_quiz();
            }
            render_quiz(app)
        }
        Command::Answer(index) => {
            let outcome = app.answer(index);
            let mut out = match outcome {
                AnswerOutcome::Correct => "Correct!".to_string(),
                AnswerOutcome::Wrong => "Wrong!".to_string(),
                AnswerOutcome::Ignored => "Not accepting answers right now".to_string(),
            };
            if outcome != AnswerOutcome::Ignored {
                out.push('\n');
                out.push_str(&render_quiz(app));
            }
            out
        }
        Command::Hint => match app.hint() {
            HintOutcome::Played => "Playing hint".to_string(),
            HintOutcome::AlreadyAnswered => "Already answered".to_string(),
            HintOutcome::CoolingDown => "Hint is cooling down".to_string(),
            HintOutcome::LimitReached => "No hints left".to_string(),
            HintOutcome::Unavailable => "No hint for this question".to_string(),
        },
        Command::Settings => {
            app.open_settings();
            render_settings(app)
        }
        Command::Sfx(value) => {
            app.set_sfx_volume(value);
            render_settings(app)
        }
        Command::Voice(value) => {
            app.set_voice_volume(value);
            render_settings(app)
        }
        Command::Count(count) => {
            let auto = app.context().settings.quiz_auto_generate;
            app.save_quiz_settings(count, auto);
            render_settings(app)
        }
        Command::AutoGenerate(auto) => {
            let count = app.context().settings.quiz_question_count;
            app.save_quiz_settings(count, auto);
            render_settings(app)
        }
        Command::Home => {
            app.back_to_home();
            render_panel(app)
        }
        Command::Status => render_panel(app),
        Command::Help => HELP_TEXT.to_string(),
        Command::Quit => "Bye!".to_string(),
    }
}

fn played(ok: bool, text: &str) -> String {
    if ok {
        text.to_string()
    } else {
        "Not available here".to_string()
    }
}

/// Describes whatever panel is on screen.
pub fn render_panel(app: &App) -> String {
    match app.panel() {
        Panel::Home => "[Home] scan | dict | quiz | settings".to_string(),
        Panel::Scan => render_scan(app),
        Panel::Dictionary => render_dictionary(app),
        Panel::Quiz => render_quiz(app),
        Panel::Settings => render_settings(app),
    }
}

pub fn render_scan(app: &App) -> String {
    let view = app.scan().view();
    let mut out = format!("[Scan] state: {}", app.context().app_state.state());
    if view.scan_prompt_visible {
        out.push_str("\nPoint the camera at a picture card");
    }
    if let Some(word) = &view.detected {
        let _ = write!(
            out,
            "\n{} / {} ({})",
            word.name(Language::English),
            word.name(Language::Vietnamese),
            word.pronunciation
        );
        if view.actions_visible {
            out.push_str("\nActions: info | quiz | say");
            if word.has_animations() {
                let _ = write!(out, " | walk | attack  [playing {}]", app.scan().animation_name());
            }
        }
    }
    if view.reset_visible {
        out.push_str("\nreset to scan another card");
    }
    out
}

pub fn render_dictionary(app: &App) -> String {
    let dictionary = app.dictionary();
    let mut out = String::new();
    match (dictionary.mode(), dictionary.selected_word()) {
        (DictionaryMode::Detail, Some(word)) => {
            let _ = writeln!(out, "[Dictionary] {}", word.id);
            let _ = writeln!(
                out,
                "{} / {} ({})",
                word.name(Language::English),
                word.name(Language::Vietnamese),
                word.pronunciation
            );
            let _ = writeln!(out, "{}", word.description(Language::English));
            let _ = write!(out, "{}", word.description(Language::Vietnamese));
        }
        _ => {
            let entries = dictionary.entries();
            let _ = write!(out, "[Dictionary] {} word(s)", entries.len());
            if !dictionary.query().is_empty() {
                let _ = write!(out, " matching '{}'", dictionary.query());
            }
            for word in entries {
                let _ = write!(
                    out,
                    "\n  {:<16} {} / {}",
                    word.id, word.english_name, word.vietnamese_name
                );
            }
        }
    }
    out
}

pub fn render_quiz(app: &App) -> String {
    let engine = app.quiz().engine();
    if let Some(result) = engine.result() {
        return format!(
            "[Quiz] Finished: {}/{} ({:.0}%)",
            result.correct,
            result.total,
            result.percentage()
        );
    }
    let question = match engine.current_question() {
        Some(question) => question,
        None => return "[Quiz] No questions available".to_string(),
    };

    let mut out = format!(
        "[Quiz] {}\n{}\n{}",
        engine.progress_text().unwrap_or_default(),
        question.question_en,
        question.question_vi
    );
    for (i, button) in engine.buttons().iter().enumerate() {
        let mark = match button.highlight {
            Highlight::Normal => " ",
            Highlight::Correct => "+",
            Highlight::Wrong => "x",
        };
        let _ = write!(out, "\n {} {}. {}", mark, i + 1, button.label);
    }
    if matches!(engine.phase(), QuizPhase::AwaitingAnswer) && engine.hint_enabled() {
        let _ = write!(
            out,
            "\nhint ({}/{} used)",
            engine.hints_used(),
            engine.config().max_hints
        );
    }
    out
}

pub fn render_settings(app: &App) -> String {
    let settings = &app.context().settings;
    format!(
        "[Settings]\nSFX:   {}\nVoice: {}\nQuiz questions: {}\nAuto-generate:  {}",
        percent_label(settings.sfx_volume),
        percent_label(settings.voice_volume),
        settings.quiz_question_count,
        if settings.quiz_auto_generate { "on" } else { "off" }
    )
}
