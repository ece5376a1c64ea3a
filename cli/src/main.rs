use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mineflood_core::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, about = "Generate and probe minesweeper boards", long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place mines and print the resulting board
    Generate {
        #[command(flatten)]
        board: BoardArgs,

        /// Print the grid as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Derive board dimensions and mine count from a difficulty
    Scale {
        #[arg(long, value_enum)]
        mode: Mode,

        /// Use this rank instead of rolling one for the mode
        #[arg(long)]
        rank: Option<u32>,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[arg(long, default_value_t = 0)]
        gap: u32,
    },
    /// Generate a board, reveal one cell and print the report
    Reveal {
        #[command(flatten)]
        board: BoardArgs,

        #[arg(long)]
        row: Coord,

        #[arg(long)]
        column: Coord,
    },
}

#[derive(Args, Debug)]
struct BoardArgs {
    #[arg(long)]
    rows: Coord,

    #[arg(long)]
    columns: Coord,

    #[arg(long)]
    mines: CellCount,
}

impl BoardArgs {
    fn config(&self) -> Result<GameConfig> {
        GameConfig::new(self.rows, self.columns, self.mines).context("invalid board arguments")
    }
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum Mode {
    Easy,
    Normal,
    Hard,
    Custom,
    Random,
}

impl From<Mode> for DifficultyMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Easy => DifficultyMode::Easy,
            Mode::Normal => DifficultyMode::Normal,
            Mode::Hard => DifficultyMode::Hard,
            Mode::Custom => DifficultyMode::Custom,
            Mode::Random => DifficultyMode::Random,
        }
    }
}

#[derive(Serialize)]
struct ScaleOutput {
    difficulty: Difficulty,
    viewport: Viewport,
    config: GameConfig,
}

#[derive(Serialize)]
struct RevealOutput {
    report: RevealReport,
    notifications: Vec<Notification>,
    board: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let seed = cli.seed.unwrap_or_else(random_seed);
    log::debug!("seed: {}", seed);
    let mut rng = SeededRandom::new(seed);

    match cli.command {
        Command::Generate { board, json } => {
            let grid = RowCappedGenerator::new(&mut rng).generate(board.config()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                for line in render_grid(&grid) {
                    println!("{line}");
                }
            }
        }
        Command::Scale {
            mode,
            rank,
            width,
            height,
            gap,
        } => {
            let viewport = Viewport::new(width, height).with_grid_gap(gap);
            let difficulty = match rank {
                Some(rank) => Difficulty {
                    mode: mode.into(),
                    rank,
                },
                None => Difficulty::roll(mode.into(), viewport, &mut rng),
            };
            let config = difficulty.board_config(viewport, &mut rng)?;
            let output = ScaleOutput {
                difficulty,
                viewport,
                config,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Reveal { board, row, column } => {
            let mut game = GameSession::initialize(board.config()?, &mut rng)?;
            game.take_notifications();

            let report = game
                .reveal((row, column))
                .with_context(|| format!("cannot reveal ({row}, {column})"))?;
            let output = RevealOutput {
                report,
                notifications: game.take_notifications().into_vec(),
                board: render_session(&game)?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Full layout, mines as `*`, empty cells as `.`.
fn render_grid(grid: &Grid) -> Vec<String> {
    (0..grid.rows())
        .map(|row| {
            (0..grid.columns())
                .map(|column| match grid[(row, column)] {
                    CellValue::Mine => '*',
                    CellValue::Proximity(0) => '.',
                    CellValue::Proximity(count) => char::from(b'0' + count),
                })
                .collect()
        })
        .collect()
}

/// What a player would currently see.
fn render_session(game: &GameSession) -> Result<Vec<String>> {
    let grid = game.grid();
    (0..grid.rows())
        .map(|row| -> Result<String> {
            (0..grid.columns())
                .map(|column| -> Result<char> {
                    Ok(match game.cell_view((row, column))? {
                        CellView::Hidden => '#',
                        CellView::Flagged => 'F',
                        CellView::Open(0) => '.',
                        CellView::Open(count) => char::from(b'0' + count),
                        CellView::Exploded => 'X',
                        CellView::Mine => '*',
                    })
                })
                .collect()
        })
        .collect()
}
