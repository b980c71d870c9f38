//! # slide2048 CLI
//!
//! Command-line interface for playing 2048 interactively (optionally with
//! timer-driven autoplay) or running headless simulations with a choice of
//! move policies.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slide2048_core::identity::{IdentityProvider, LocalIdentity, User};
use slide2048_core::leaderboard::{record_final_score, top_scores, InMemoryLeaderboard, ScoreEntry};
use slide2048_core::{best_move, Autoplay, Direction, GameSession};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slide2048")]
#[command(author, version, about = "Play 2048 in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long, conflicts_with = "episodes")]
    interactive: bool,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "greedy")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,

    /// Start interactive mode with autoplay switched on
    #[arg(long)]
    autoplay: bool,

    /// Autoplay tick period in milliseconds
    #[arg(long, default_value = "150")]
    interval_ms: u64,

    /// Play as this locally signed-in player; final scores go on the leaderboard
    #[arg(long)]
    player: Option<String>,

    /// Log filter (e.g. "debug", "slide2048_core=trace"); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// One-ply heuristic search
    Greedy,
    /// Random valid moves
    Random,
    /// Cycle through actions: Left, Down, Right, Up
    Cycle,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let identity = match &args.player {
        Some(name) => LocalIdentity::signed_in(name),
        None => LocalIdentity::anonymous(),
    };

    match args.episodes {
        Some(episodes) if !args.interactive => run_headless(&args, episodes, &identity),
        _ => run_interactive(&args, &identity),
    }
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

// =============================================================================
// Interactive mode
// =============================================================================

/// Everything the interactive loop reacts to, delivered through one channel so
/// key presses and autoplay ticks are handled strictly one at a time.
enum Event {
    Input(InputAction),
    Tick,
}

/// What the loop should do after handling one event.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Redraw,
    Skip,
    Quit,
}

/// State of one interactive run.
struct Interactive {
    session: GameSession,
    autoplay: Autoplay,
    leaderboard: InMemoryLeaderboard,
    user: Option<User>,
    recorded: bool,
    message: String,
}

impl Interactive {
    fn new(seed: u64, autoplay_on: bool, user: Option<User>) -> Self {
        let mut autoplay = Autoplay::new();
        if autoplay_on {
            autoplay.enable();
        }
        Interactive {
            session: GameSession::new(seed),
            autoplay,
            leaderboard: InMemoryLeaderboard::new(),
            user,
            recorded: false,
            message: String::new(),
        }
    }

    /// Apply one event. The status message is only replaced when the screen
    /// is about to change, so idle ticks and ignored keys keep it visible.
    fn handle(&mut self, event: Event) -> Flow {
        let result = match event {
            Event::Tick => match self.autoplay.tick(&mut self.session) {
                Some(result) => result,
                None => return Flow::Skip,
            },
            Event::Input(InputAction::Move(direction)) => {
                let result = self.session.apply(direction);
                if !result.changed {
                    return Flow::Skip;
                }
                result
            }
            Event::Input(InputAction::Hint) => {
                let Some(direction) = best_move(self.session.grid()) else {
                    return Flow::Skip;
                };
                self.message = format!("  Hint: {direction}");
                return Flow::Redraw;
            }
            Event::Input(InputAction::ToggleAutoplay) => {
                let on = self.autoplay.toggle();
                info!(enabled = on, "autoplay toggled");
                return Flow::Redraw;
            }
            Event::Input(InputAction::Restart) => {
                self.session.reset();
                self.recorded = false;
                self.message.clear();
                return Flow::Redraw;
            }
            Event::Input(InputAction::Quit) => return Flow::Quit,
            Event::Input(InputAction::None) => return Flow::Skip,
        };

        self.message.clear();
        if result.points_gained > 0 {
            self.message = format!("  +{} points!", result.points_gained);
        }

        if self.session.is_over() && !self.recorded {
            self.recorded = true;
            record_final_score(self.session.state(), self.user.as_ref(), &mut self.leaderboard);
            self.message.push_str(&format!(
                "\n  *** GAME OVER ***\n  Final Score: {}\n  Max Tile: {}\n",
                self.session.score(),
                self.session.max_tile()
            ));
            if self.user.is_some() {
                self.message.push_str(&format_leaderboard(&top_scores(&self.leaderboard)));
            }
            self.message.push_str("\n  Press R to restart or Q to quit");
        }

        Flow::Redraw
    }
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive(args: &Args, identity: &dyn IdentityProvider) -> Result<()> {
    let _raw = RawMode::enable().context("failed to switch terminal to raw mode")?;

    let (tx, rx) = mpsc::channel();
    spawn_input_reader(tx.clone());
    spawn_ticker(tx, Duration::from_millis(args.interval_ms.max(1)));

    let mut game = Interactive::new(args.seed, args.autoplay, identity.current_user());
    redraw(&game)?;

    for event in rx {
        match game.handle(event) {
            Flow::Redraw => redraw(&game)?,
            Flow::Skip => {}
            Flow::Quit => break,
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<Event>) {
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut buffer = [0u8; 3];
        loop {
            let bytes_read = match stdin.read(&mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            let action = parse_input(&buffer[..bytes_read]);
            if tx.send(Event::Input(action)).is_err() {
                break;
            }
        }
    });
}

/// Periodic autoplay clock. Ticks are only requests; the main loop decides
/// whether autoplay is on.
fn spawn_ticker(tx: mpsc::Sender<Event>, period: Duration) {
    thread::spawn(move || loop {
        thread::sleep(period);
        if tx.send(Event::Tick).is_err() {
            break;
        }
    });
}

fn redraw(game: &Interactive) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H")?; // Clear screen
    writeln!(out, "=== 2048 ===")?;
    writeln!(
        out,
        "Controls: WASD or Arrow Keys | H hint | P autoplay [{}] | R restart | Q quit\n",
        if game.autoplay.is_enabled() { "on" } else { "off" }
    )?;
    write!(out, "{}", game.session)?;
    if !game.message.is_empty() {
        writeln!(out, "{}", game.message)?;
    }
    out.flush().context("failed to flush stdout")
}

// =============================================================================
// Headless mode
// =============================================================================

/// Run headless simulation mode.
fn run_headless(args: &Args, episodes: u32, identity: &dyn IdentityProvider) -> Result<()> {
    let mut total_score: u64 = 0;
    let mut max_tile_overall: u32 = 0;
    let mut scores: Vec<u64> = Vec::with_capacity(episodes as usize);
    let mut max_tiles: Vec<u32> = Vec::with_capacity(episodes as usize);
    let mut leaderboard = InMemoryLeaderboard::new();
    let user = identity.current_user();

    // Separate RNG for action selection so tile spawns stay seed-determined
    let mut action_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1000));

    for episode in 0..episodes {
        let episode_seed = args.seed.wrapping_add(episode as u64);
        let mut session = GameSession::new(episode_seed);
        let mut steps = 0;
        let mut action_cycle = 0;

        while !session.is_over() && (args.max_steps == 0 || steps < args.max_steps) {
            let action = match args.policy {
                Policy::Greedy => best_move(session.grid()),
                Policy::Random => select_random_action(&session, &mut action_rng),
                Policy::Cycle => select_cycle_action(&session, &mut action_cycle),
            };

            let Some(direction) = action else {
                break; // No valid actions
            };
            session.apply(direction);
            steps += 1;

            if args.verbose {
                println!("Episode {} Step {}: {:?}", episode + 1, steps, direction);
                print!("{}", session);
            }
        }

        let score = session.score();
        let max_tile = session.max_tile();
        debug!(episode = episode + 1, score, max_tile, steps, "episode finished");

        record_final_score(session.state(), user.as_ref(), &mut leaderboard);
        scores.push(score);
        max_tiles.push(max_tile);
        total_score += score;
        max_tile_overall = max_tile_overall.max(max_tile);

        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}",
                episode + 1,
                score,
                max_tile,
                steps
            );
        }
    }

    let mut out = io::stdout().lock();
    write_summary(&mut out, args, episodes, total_score, max_tile_overall, scores, &max_tiles)?;
    if user.is_some() {
        write!(out, "{}", format_leaderboard(&top_scores(&leaderboard)))?;
    }
    out.flush().context("failed to flush stdout")
}

/// Output results in parseable `key=value` format.
fn write_summary(
    out: &mut impl Write,
    args: &Args,
    episodes: u32,
    total_score: u64,
    max_tile_overall: u32,
    mut scores: Vec<u64>,
    max_tiles: &[u32],
) -> io::Result<()> {
    if episodes == 0 {
        writeln!(out, "episodes=0")?;
        return Ok(());
    }

    let avg_score = total_score as f64 / episodes as f64;
    scores.sort_unstable();
    let mid = scores.len() / 2;
    let median_score = if scores.len() % 2 == 0 {
        (scores[mid - 1] as f64 + scores[mid] as f64) / 2.0
    } else {
        scores[mid] as f64
    };

    let mut tile_counts: BTreeMap<u32, u32> = BTreeMap::new();
    for &tile in max_tiles {
        *tile_counts.entry(tile).or_insert(0) += 1;
    }

    writeln!(out, "=== Simulation Results ===")?;
    writeln!(out, "episodes={}", episodes)?;
    writeln!(out, "policy={:?}", args.policy)?;
    writeln!(out, "seed={}", args.seed)?;
    writeln!(out, "max_steps={}", args.max_steps)?;
    writeln!(out, "avg_score={:.2}", avg_score)?;
    writeln!(out, "median_score={:.2}", median_score)?;
    writeln!(out, "min_score={}", scores.first().unwrap_or(&0))?;
    writeln!(out, "max_score={}", scores.last().unwrap_or(&0))?;
    writeln!(out, "max_tile_overall={}", max_tile_overall)?;

    let distribution: Vec<String> = tile_counts
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    writeln!(out, "tile_distribution={}", distribution.join(","))
}

fn format_leaderboard(entries: &[ScoreEntry]) -> String {
    let mut text = String::from("\n  === Top Scores ===\n");
    if entries.is_empty() {
        text.push_str("  (none yet)\n");
    }
    for (rank, entry) in entries.iter().enumerate() {
        text.push_str(&format!("  {:>2}. {:<16} {:>8}\n", rank + 1, entry.user_name, entry.score));
    }
    text
}

/// Select a random valid action.
fn select_random_action(session: &GameSession, rng: &mut SmallRng) -> Option<Direction> {
    let legal = session.legal_moves();
    let valid: Vec<Direction> = Direction::all()
        .into_iter()
        .zip(legal)
        .filter(|&(_, ok)| ok)
        .map(|(d, _)| d)
        .collect();

    if valid.is_empty() {
        None
    } else {
        Some(valid[rng.gen_range(0..valid.len())])
    }
}

/// Select action in a cycle: Left, Down, Right, Up.
fn select_cycle_action(session: &GameSession, cycle: &mut usize) -> Option<Direction> {
    let order = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];
    let legal = session.legal_moves();

    // Try actions in cycle order, starting from current position
    for _ in 0..4 {
        let direction = order[*cycle % 4];
        *cycle += 1;
        if legal[direction as usize] {
            return Some(direction);
        }
    }

    None
}

// =============================================================================
// Terminal input
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Hint,
    ToggleAutoplay,
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'h'] | [b'H'] => InputAction::Hint,
        [b'p'] | [b'P'] => InputAction::ToggleAutoplay,
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,

        _ => InputAction::None,
    }
}

/// Puts the terminal in unbuffered, no-echo mode and restores it on drop.
struct RawMode {
    #[cfg(unix)]
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> io::Result<Self> {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        // SAFETY: termios is plain data and tcgetattr fully initialises it on success.
        unsafe {
            let mut original: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut original) != 0 {
                return Err(io::Error::last_os_error());
            }
            let mut raw = original;
            raw.c_lflag &= !(libc::ICANON | libc::ECHO);
            raw.c_cc[libc::VMIN] = 1;
            raw.c_cc[libc::VTIME] = 0;
            if libc::tcsetattr(fd, libc::TCSANOW, &raw) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(RawMode { original })
        }
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        // SAFETY: restores the attributes captured in `enable`.
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

// On non-Unix systems interactive mode needs Enter after each key
#[cfg(not(unix))]
impl RawMode {
    fn enable() -> io::Result<Self> {
        Ok(RawMode {})
    }
}
