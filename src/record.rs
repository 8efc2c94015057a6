use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Sentinel used by the dataset when a match produced no winner
pub const NO_RESULT: &str = "No Result";

/// How a decided match was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WinMethod {
    /// The side batting first defended its total
    Runs,
    /// The chasing side reached the target
    Wickets,
}

impl WinMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "runs" => Some(WinMethod::Runs),
            "wickets" => Some(WinMethod::Wickets),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WinMethod::Runs => "Runs",
            WinMethod::Wickets => "Wickets",
        }
    }
}

impl fmt::Display for WinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the toss winner chose to do first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TossDecision {
    Bat,
    Field,
}

impl TossDecision {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bat" | "batting" => Some(TossDecision::Bat),
            "field" | "fielding" | "bowl" | "bowling" => Some(TossDecision::Field),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TossDecision::Bat => "Bat",
            TossDecision::Field => "Field",
        }
    }
}

impl fmt::Display for TossDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One played (or abandoned) match
///
/// Records are produced by the loader, which guarantees:
/// - `team1 != team2`
/// - `margin` and `won_by` are `None` whenever `winner` is `None`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchRecord {
    /// Match date, `None` when the source value could not be parsed
    pub date: Option<NaiveDate>,
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub toss_winner: String,
    pub toss_decision: TossDecision,
    /// Winning side, `None` for a "No Result"
    pub winner: Option<String>,
    pub won_by: Option<WinMethod>,
    /// Victory margin in units of `won_by`
    pub margin: Option<f64>,
    /// Player of the match
    pub potm: Option<String>,
}

impl MatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn won_by_team(&self, team: &str) -> bool {
        self.winner.as_deref() == Some(team)
    }

    /// Winner name, or the "No Result" sentinel
    pub fn winner_label(&self) -> &str {
        self.winner.as_deref().unwrap_or(NO_RESULT)
    }
}

/// The immutable, ordered match table shared by every report
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<MatchRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every team named on either side, sorted by name
    pub fn teams(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| [r.team1.as_str(), r.team2.as_str()])
            .collect()
    }

    pub fn venues(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.venue.as_str()).collect()
    }

    /// Records with a recorded winner
    pub fn decided(&self) -> impl Iterator<Item = &MatchRecord> + '_ {
        self.records.iter().filter(|r| r.is_decided())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(team1: &str, team2: &str, venue: &str) -> MatchRecord {
        MatchRecord {
            date: None,
            team1: team1.to_string(),
            team2: team2.to_string(),
            venue: venue.to_string(),
            toss_winner: team1.to_string(),
            toss_decision: TossDecision::Field,
            winner: None,
            won_by: None,
            margin: None,
            potm: None,
        }
    }

    #[test]
    fn parses_methods_and_decisions_case_insensitively() {
        assert_eq!(WinMethod::parse(" wickets "), Some(WinMethod::Wickets));
        assert_eq!(WinMethod::parse("RUNS"), Some(WinMethod::Runs));
        assert_eq!(WinMethod::parse("D/L"), None);
        assert_eq!(TossDecision::parse("Bowl"), Some(TossDecision::Field));
        assert_eq!(TossDecision::parse("bat"), Some(TossDecision::Bat));
        assert_eq!(TossDecision::parse(""), None);
    }

    #[test]
    fn teams_are_the_union_of_both_sides() {
        let dataset = Dataset::from_records(vec![
            record("Lahore Qalandars", "Karachi Kings", "Gaddafi Stadium"),
            record("Karachi Kings", "Peshawar Zalmi", "National Stadium"),
        ]);
        let teams: Vec<&str> = dataset.teams().into_iter().collect();
        assert_eq!(teams, vec!["Karachi Kings", "Lahore Qalandars", "Peshawar Zalmi"]);
        assert_eq!(dataset.venues().len(), 2);
    }

    #[test]
    fn undecided_record_reports_sentinel() {
        let r = record("A", "B", "V");
        assert!(!r.is_decided());
        assert_eq!(r.winner_label(), NO_RESULT);
        assert!(r.involves("B"));
        assert!(!r.won_by_team("A"));
    }
}
