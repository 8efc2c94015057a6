use crate::error::LoadError;
use crate::record::{Dataset, MatchRecord, NO_RESULT, TossDecision, WinMethod};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Day, abbreviated month, two digit year, e.g. `17-Feb-25`
pub const DATE_FORMAT: &str = "%d-%b-%y";

/// One CSV row exactly as it appears in the file
///
/// Every column is read as text so that a single bad date or margin
/// degrades to an absent value instead of failing deserialization.
/// Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Team_1")]
    team1: String,
    #[serde(rename = "Team_2")]
    team2: String,
    #[serde(rename = "Venue")]
    venue: String,
    #[serde(rename = "Toss_Winner")]
    toss_winner: String,
    #[serde(rename = "Toss_Decision")]
    toss_decision: String,
    #[serde(rename = "Winning_Team")]
    winning_team: String,
    #[serde(rename = "Won_By")]
    won_by: String,
    #[serde(rename = "Margin")]
    margin: String,
    #[serde(rename = "POTM")]
    potm: String,
}

/// Load the match table from a CSV file
///
/// # Arguments
/// * `path` - Path to the CSV file to load
///
/// # Returns
/// * `Result<Dataset, LoadError>` - The loaded table or the first fatal error
///
/// # Examples
/// ```no_run
/// use psl_dashboard::loader::load_dataset;
///
/// match load_dataset("psl_2025_matches.csv") {
///     Ok(dataset) => println!("Loaded {} matches", dataset.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let reader = csv::Reader::from_path(path)?;
    let dataset = read_records(reader)?;
    info!(
        "loaded {} match records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Load the match table from any reader holding CSV text with a header row
pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    read_records(csv::Reader::from_reader(reader))
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, LoadError> {
    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result?;
        records.push(normalize(raw, idx + 1)?);
    }
    Ok(Dataset::from_records(records))
}

/// Turn a raw row into a validated record
///
/// `row` is 1-based and only used for error and log messages.
fn normalize(raw: RawRow, row: usize) -> Result<MatchRecord, LoadError> {
    let team1 = required(&raw.team1, row, "Team_1")?;
    let team2 = required(&raw.team2, row, "Team_2")?;
    if team1 == team2 {
        return Err(LoadError::SameTeams { row, team: team1 });
    }

    let toss_decision =
        TossDecision::parse(&raw.toss_decision).ok_or_else(|| LoadError::InvalidTossDecision {
            row,
            value: raw.toss_decision.clone(),
        })?;

    let date = parse_date(&raw.date);
    if date.is_none() {
        warn!("row {}: unparseable date {:?}, treating as absent", row, raw.date);
    }

    let winner = match parse_winner(&raw.winning_team) {
        Some(w) => Some(resolve_team(&w, &team1, &team2).ok_or(LoadError::UnknownWinner {
            row,
            winner: w,
        })?),
        None => None,
    };

    // Margin and method only mean something for a decided match
    let (won_by, margin) = if winner.is_some() {
        let won_by = WinMethod::parse(&raw.won_by);
        if won_by.is_none() {
            warn!("row {}: decided match without a win method ({:?})", row, raw.won_by);
        }
        let margin = parse_margin(&raw.margin);
        if margin.is_none() && !raw.margin.trim().is_empty() {
            warn!("row {}: unparseable margin {:?}, treating as absent", row, raw.margin);
        }
        (won_by, margin)
    } else {
        (None, None)
    };

    Ok(MatchRecord {
        date,
        team1,
        team2,
        venue: raw.venue.trim().to_string(),
        toss_winner: raw.toss_winner.trim().to_string(),
        toss_decision,
        winner,
        won_by,
        margin,
        potm: optional(&raw.potm),
    })
}

fn required(value: &str, row: usize, column: &'static str) -> Result<String, LoadError> {
    optional(value).ok_or(LoadError::MissingValue { row, column })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a `17-Feb-25` style date, `None` if it does not match
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parse a numeric margin, `None` for blanks and garbage
pub fn parse_margin(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|m| m.is_finite())
}

fn parse_winner(raw: &str) -> Option<String> {
    optional(raw).filter(|w| !w.eq_ignore_ascii_case(NO_RESULT))
}

/// The side a name refers to, ignoring ASCII case
fn resolve_team(name: &str, team1: &str, team2: &str) -> Option<String> {
    [team1, team2]
        .into_iter()
        .find(|team| team.eq_ignore_ascii_case(name))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Date,Team_1,Team_2,Venue,Toss_Winner,Toss_Decision,Winning_Team,Won_By,Margin,POTM\n";

    fn load(rows: &str) -> Result<Dataset, LoadError> {
        from_reader(format!("{HEADER}{rows}").as_bytes())
    }

    #[test]
    fn parses_dates_in_abbreviated_month_format() {
        assert_eq!(parse_date("11-Apr-25"), NaiveDate::from_ymd_opt(2025, 4, 11));
        assert_eq!(parse_date("2025-04-11"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn margins_degrade_to_absent() {
        assert_eq!(parse_margin("12"), Some(12.0));
        assert_eq!(parse_margin(" 7.0 "), Some(7.0));
        assert_eq!(parse_margin("-"), None);
        assert_eq!(parse_margin("NaN"), None);
    }

    #[test]
    fn no_result_clears_margin_and_method() {
        let dataset =
            load("12-Apr-25,A,B,V,A,Bat,No Result,Runs,10,\n").expect("row should load");
        let r = &dataset.records()[0];
        assert_eq!(r.winner, None);
        assert_eq!(r.won_by, None);
        assert_eq!(r.margin, None);
        assert_eq!(r.potm, None);
    }

    #[test]
    fn bad_date_and_margin_do_not_fail_the_load() {
        let dataset =
            load("someday,A,B,V,A,Field,B,Wickets,lots,X\n").expect("row should load");
        let r = &dataset.records()[0];
        assert_eq!(r.date, None);
        assert_eq!(r.margin, None);
        assert_eq!(r.won_by, Some(WinMethod::Wickets));
        assert_eq!(r.winner.as_deref(), Some("B"));
    }

    #[test]
    fn same_team_on_both_sides_is_fatal() {
        let err = load("12-Apr-25,A,A,V,A,Bat,A,Runs,10,X\n").unwrap_err();
        assert!(matches!(err, LoadError::SameTeams { row: 1, .. }));
    }

    #[test]
    fn winner_is_matched_to_its_side_ignoring_case() {
        let dataset = load(
            "12-Apr-25,Lahore Qalandars,Karachi Kings,V,Karachi Kings,Bat,lahore qalandars,Runs,10,X\n",
        )
        .expect("row should load");
        let r = &dataset.records()[0];
        assert_eq!(r.winner.as_deref(), Some("Lahore Qalandars"));
        assert!(r.won_by_team("Lahore Qalandars"));
    }

    #[test]
    fn winner_who_did_not_play_is_fatal() {
        let err = load("12-Apr-25,A,B,V,A,Bat,C,Runs,10,X\n").unwrap_err();
        match err {
            LoadError::UnknownWinner { row, winner } => {
                assert_eq!(row, 1);
                assert_eq!(winner, "C");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_toss_decision_is_fatal() {
        let err = load("12-Apr-25,A,B,V,A,Pass,A,Runs,10,X\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidTossDecision { row: 1, .. }));
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = from_reader("Date,Team_1\n12-Apr-25,A\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_dataset("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
