//! Zen Sprint headless driver
//!
//! Plays sessions with the autoplay bot on a simulated clock, records them to
//! the local progress file and prints a summary.
//!
//! Usage: `zen-sprint [difficulty] [theme] [--seed N] [--max-levels N] [--data PATH]`
//! Progress is kept in `--data` / `$ZEN_SPRINT_DATA` (default `zen-sprint-progress.json`).

use std::path::PathBuf;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use zen_sprint::{Settings, Theme};
use zen_sprint::feedback::FeedbackManager;
use zen_sprint::highscores::format_age;
use zen_sprint::persistence::{ProgressStore, now_ms};
use zen_sprint::sim::{
    Autoplay, DifficultyLevel, GameEvent, Session, SessionPhase, TickInput, tick,
};

/// Simulated frame length (ms)
const FRAME_MS: u64 = 16;

#[derive(Parser)]
#[command(name = "zen-sprint")]
#[command(about = "Play Zen Sprint with the autoplay bot and record the results")]
struct Args {
    /// Difficulty: easy, medium or hard
    #[arg(default_value = "medium", value_parser = parse_difficulty)]
    difficulty: DifficultyLevel,

    /// Colour theme
    #[arg(
        default_value = "midnight",
        ignore_case = true,
        value_parser = PossibleValuesParser::new(Theme::names())
    )]
    theme: String,

    /// RNG seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many completed levels
    #[arg(long, default_value_t = 5)]
    max_levels: u32,

    /// Progress file
    #[arg(long, env = "ZEN_SPRINT_DATA", default_value = "zen-sprint-progress.json")]
    data: PathBuf,
}

fn parse_difficulty(s: &str) -> Result<DifficultyLevel, String> {
    DifficultyLevel::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let mut settings = Settings {
        difficulty: args.difficulty,
        theme: args.theme,
        ..Settings::default()
    };
    settings.normalize();
    let seed = args.seed.unwrap_or_else(now_ms);
    let max_levels = args.max_levels;

    let store = ProgressStore::load_or_default(args.data);
    let best_before = store.leaderboard.top_score();

    log::info!(
        "Zen Sprint starting: {} / {} (seed {})",
        settings.difficulty.as_str(),
        settings.theme().name,
        seed
    );

    let mut session = Session::new(
        seed,
        settings.game_config(),
        FeedbackManager::from_settings(&settings),
        store,
    );
    let mut bot = Autoplay::new(seed ^ 0x5EED);

    let mut now = now_ms();
    let mut levels_played = 0;
    session.start(settings.difficulty, now);

    loop {
        now += FRAME_MS;
        let taps = bot.choose_taps(&session.snapshot());
        for event in tick(&mut session, &TickInput { taps }, now) {
            match event {
                GameEvent::Started { level, focus_color } => {
                    println!("Level {level}: tap {focus_color}");
                }
                GameEvent::LevelComplete { level, total_score } => {
                    println!("  level {level} complete, total {total_score}");
                }
                GameEvent::GameOver { level, total_score } => {
                    println!("  game over on level {level}, total {total_score}");
                    if total_score > 0 && best_before.is_none_or(|best| total_score > best) {
                        println!("  new high score!");
                    }
                }
                _ => {}
            }
        }

        match session.phase() {
            SessionPhase::Running => {}
            SessionPhase::LevelComplete => {
                levels_played += 1;
                if levels_played >= max_levels {
                    break;
                }
                session.next_level(now);
            }
            SessionPhase::GameOver | SessionPhase::Idle => break,
        }
    }

    let state = session.state();
    println!(
        "\nFinal: level {} | total {} | best combo {} | accuracy {}%",
        state.level,
        state.total_score,
        state.max_combo,
        state.accuracy()
    );

    let store = session.sink();
    let stats = &store.stats;
    println!(
        "Lifetime: {} games, {} levels, {} points, streak {} (best {})",
        stats.total_games_played,
        stats.levels_completed,
        stats.total_score,
        store.streak.current_streak,
        store.streak.longest_streak
    );
    let insights = store.insights();
    println!(
        "Trend: {:?} {}% | best time {:?}",
        insights.trend, insights.trend_percentage, insights.best_time_of_day
    );

    if !store.leaderboard.is_empty() {
        println!("\nHigh scores:");
        let wall = now_ms();
        for (i, entry) in store.leaderboard.entries.iter().enumerate() {
            println!(
                "{:>2}. {:>6}  L{} {:<6} combo {:<3} {}",
                i + 1,
                entry.score,
                entry.level,
                entry.difficulty.as_str(),
                entry.max_combo,
                format_age(entry.timestamp, wall)
            );
        }
    }
}
