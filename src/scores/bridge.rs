use std::rc::Rc;

use tracing::{debug, warn};

use super::{HighScoreStore, LoadOutcome, ScoreEntry, Submission};
use crate::ports::AppPorts;
use crate::storage::LocalStorage;

/// Serve `saveScore` and `getScores` requests from `store`, answering on
/// `receiveScores`.
///
/// A skipped or failed save sends nothing. A query always answers, with an
/// empty board when the stored one cannot be read.
pub fn connect<S>(ports: &AppPorts, store: Rc<HighScoreStore<S>>)
where
    S: LocalStorage + 'static,
{
    {
        let store = Rc::clone(&store);
        let reply = ports.receive_scores.clone();
        ports.save_score.subscribe(move |(player, score): &(String, i64)| {
            match store.submit(ScoreEntry::new(player.clone(), *score)) {
                Ok(Submission::Recorded(board)) => {
                    reply.send(board);
                }
                Ok(Submission::Skipped) => {
                    debug!(player = %player, score, "score dropped; storage unavailable");
                }
                Err(err) => {
                    warn!(key = %store.key(), error = %err, "failed to persist leaderboard");
                }
            }
        });
    }

    let reply = ports.receive_scores.clone();
    ports.get_scores.subscribe(move |_: &()| {
        let outcome = store.query();
        match &outcome {
            LoadOutcome::Loaded(_) => {}
            LoadOutcome::Corrupt(err) => {
                warn!(key = %store.key(), error = %err, "stored leaderboard is unreadable");
            }
            LoadOutcome::Unavailable(err) => {
                warn!(key = %store.key(), error = %err, "leaderboard read failed");
            }
        }
        reply.send(outcome.into_leaderboard());
    });
}
