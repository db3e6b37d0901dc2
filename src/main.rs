use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use arcade_host::logging::init_tracing;
use arcade_host::{
    HighScoreStore, HostConfig, Leaderboard, LoadOutcome, ScoreEntry, SqliteStorage, Submission,
};

const USAGE: &str = "usage: arcade-host [scores | submit <player> <score>]";

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config_path = std::env::var("ARCADE_CONFIG").ok().map(PathBuf::from);
    let config = HostConfig::load(config_path).context("failed to load host configuration")?;

    let origin = config.origin_url()?;
    let storage = SqliteStorage::new(&origin, config.data_dir.as_deref())
        .context("failed to open local storage")?;
    let store = HighScoreStore::new(storage, config.scores.storage_key.clone())
        .with_capacity(config.scores.capacity)
        .with_ranking(config.scores.ranking);

    match args.first().map(String::as_str) {
        None | Some("scores") => match store.query() {
            LoadOutcome::Loaded(board) => {
                print_board(&board);
                Ok(())
            }
            LoadOutcome::Corrupt(err) => {
                Err(anyhow!(err).context(format!("`{}` is not a leaderboard", store.key())))
            }
            LoadOutcome::Unavailable(err) => {
                Err(anyhow!(err).context("local storage is unavailable"))
            }
        },
        Some("submit") => {
            let player = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
            let score = args
                .get(2)
                .ok_or_else(|| anyhow!(USAGE))?
                .parse::<i64>()
                .context("score must be an integer")?;
            match store.submit(ScoreEntry::new(player.clone(), score))? {
                Submission::Recorded(board) => {
                    print_board(&board);
                    match board.rank_of(player) {
                        Some(rank) => println!("{player} is #{}", rank + 1),
                        None => println!("{player} did not make the board"),
                    }
                    Ok(())
                }
                Submission::Skipped => Err(anyhow!("local storage is unavailable")),
            }
        }
        Some(other) => Err(anyhow!("unknown command `{other}`\n{USAGE}")),
    }
}

fn print_board(board: &Leaderboard) {
    if board.is_empty() {
        println!("no scores recorded");
        return;
    }
    println!("{:>3}  {:<24} {:>10}", "#", "player", "score");
    for (rank, entry) in board.iter().enumerate() {
        println!("{:>3}  {:<24} {:>10}", rank + 1, entry.player, entry.score);
    }
}
