use std::rc::Rc;

use ar_lingo::app::App;
use ar_lingo::app_state::AppStateManager;
use ar_lingo::audio::{AudioManager, LogBackend};
use ar_lingo::config::AppConfig;
use ar_lingo::console::{self, Command};
use ar_lingo::context::{AppContext, InputQueue};
use ar_lingo::features::{ArScan, Panel, QuizPanel};
use ar_lingo::quiz::QuizData;
use ar_lingo::settings::{JsonFileStore, Settings};
use ar_lingo::words::WordDatabase;
use dotenv::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> HandlerResult {
    // .env is optional, the process environment works too
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting AR Lingo...");

    let config = AppConfig::from_env()?;

    println!("Loading the word database from {}", config.words_path.display());
    let words = WordDatabase::load(&config.words_path)?;
    println!("{} word(s) loaded", words.len());

    let authored = match &config.quiz_path {
        Some(path) => {
            println!("Loading the quiz from {}", path.display());
            QuizData::load(path)?
        }
        None => QuizData::default(),
    };

    let store = JsonFileStore::open(&config.settings_path)?;
    let settings = Settings::load(&store);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let ctx = AppContext {
        app_state: AppStateManager::new(),
        words: Rc::new(words),
        audio: AudioManager::new(Box::new(LogBackend), config.feedback.clone()),
        settings,
        store: Box::new(store),
        input: InputQueue::default(),
        rng,
    };
    let scan = ArScan::new(config.auto_show_actions, config.animation_duration);
    let quiz = QuizPanel::new(config.quiz.clone(), authored);
    let mut app = App::new(ctx, scan, quiz);

    println!("{}", console::HELP_TEXT);
    println!("{}", console::render_panel(&app));

    run(&mut app, &config).await
}

async fn run(app: &mut App, config: &AppConfig) -> HandlerResult {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_tick = Instant::now();
    // timers move the quiz on by themselves, so redraw when it changes
    let mut last_quiz_view = String::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                app.tick(now - last_tick);
                last_tick = now;

                if app.panel() == Panel::Quiz {
                    let view = console::render_quiz(app);
                    if view != last_quiz_view {
                        println!("{}", view);
                        last_quiz_view = view;
                    }
                }
            }
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        println!("{}", console::execute(app, command));
                        if app.panel() == Panel::Quiz {
                            last_quiz_view = console::render_quiz(app);
                        }
                    }
                    Err(console::ParseError::Empty) => {}
                    Err(err) => println!("{}", err),
                }
            }
        }
    }

    app.shutdown();
    println!("Bye!");
    Ok(())
}
