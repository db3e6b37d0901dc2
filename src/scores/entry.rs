use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: String,
    pub score: i64,
}

impl ScoreEntry {
    pub fn new(player: impl Into<String>, score: i64) -> Self {
        Self {
            player: player.into(),
            score,
        }
    }
}

impl From<(String, i64)> for ScoreEntry {
    fn from((player, score): (String, i64)) -> Self {
        Self { player, score }
    }
}

/// Ranked score entries as persisted: a JSON array of `{player, score}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ScoreEntry> {
        self.entries
    }

    /// Position of the first entry recorded for `player`, if any.
    pub fn rank_of(&self, player: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.player == player)
    }
}

impl From<Vec<ScoreEntry>> for Leaderboard {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for Leaderboard {
    type Item = ScoreEntry;
    type IntoIter = std::vec::IntoIter<ScoreEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Leaderboard {
    type Item = &'a ScoreEntry;
    type IntoIter = std::slice::Iter<'a, ScoreEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_array() {
        let board = Leaderboard::from(vec![ScoreEntry::new("B", 9), ScoreEntry::new("A", 5)]);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(
            json,
            r#"[{"player":"B","score":9},{"player":"A","score":5}]"#
        );
    }

    #[test]
    fn ignores_unknown_fields() {
        let board: Leaderboard =
            serde_json::from_str(r#"[{"player":"A","score":3,"level":2}]"#).unwrap();
        assert_eq!(board.entries(), &[ScoreEntry::new("A", 3)]);
        assert_eq!(board.rank_of("A"), Some(0));
        assert_eq!(board.rank_of("Z"), None);
    }

    #[test]
    fn rejects_fractional_scores() {
        let parsed = serde_json::from_str::<Leaderboard>(r#"[{"player":"A","score":1.5}]"#);
        assert!(parsed.is_err());
    }
}
