use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use psl_dashboard::reports;
use psl_dashboard::{Dataset, LoadError, TossDecision, WinMethod, load_dataset};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn sample() -> Dataset {
    load_dataset(fixture_path("psl_sample.csv")).expect("fixture should load")
}

#[test]
fn loads_every_row_in_table_order() {
    let dataset = sample();
    assert_eq!(dataset.len(), 13);

    let first = &dataset.records()[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 4, 11));
    assert_eq!(first.team1, "Islamabad United");
    assert_eq!(first.team2, "Lahore Qalandars");
    assert_eq!(first.toss_decision, TossDecision::Bat);
    assert_eq!(first.winner.as_deref(), Some("Islamabad United"));
    assert_eq!(first.won_by, Some(WinMethod::Wickets));
    assert_eq!(first.margin, Some(8.0));
    assert_eq!(first.potm.as_deref(), Some("Jason Holder"));

    let last = &dataset.records()[12];
    assert_eq!(last.team1, "Multan Sultans");
    assert_eq!(last.date, NaiveDate::from_ymd_opt(2025, 4, 22));
}

#[test]
fn no_result_rows_never_carry_a_margin() {
    let dataset = sample();
    for record in dataset.records() {
        if record.winner.is_none() {
            assert_eq!(record.margin, None);
            assert_eq!(record.won_by, None);
        }
        assert_ne!(record.team1, record.team2);
    }
    let abandoned = &dataset.records()[6];
    assert_eq!(abandoned.winner, None);
    assert_eq!(abandoned.potm, None);
}

#[test]
fn bad_fields_degrade_to_absent() {
    let dataset = sample();
    let unrecorded_margin = &dataset.records()[8];
    assert_eq!(unrecorded_margin.margin, None);
    assert_eq!(unrecorded_margin.won_by, Some(WinMethod::Runs));

    let undated = &dataset.records()[9];
    assert_eq!(undated.date, None);
    assert_eq!(undated.margin, Some(7.0));
}

#[test]
fn missing_file_aborts_the_load() {
    let err = load_dataset(fixture_path("missing.csv")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}

#[test]
fn malformed_file_aborts_the_load() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "Date,Team_1,Team_2,Venue").unwrap();
    writeln!(file, "11-Apr-25,A,B,V").unwrap();
    file.flush().unwrap();

    let err = load_dataset(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Csv(_)));
}

#[test]
fn reloading_the_same_file_gives_identical_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let copy = dir.path().join("matches.csv");
    fs::copy(fixture_path("psl_sample.csv"), &copy).expect("copy fixture");

    let first = load_dataset(&copy).unwrap();
    let second = load_dataset(&copy).unwrap();
    assert_eq!(first, second);

    let render = |d: &Dataset| {
        serde_json::json!({
            "overview": reports::overview(d),
            "team_performance": reports::team_performance(d),
            "head_to_head": reports::head_to_head(d),
            "recent_matches": reports::recent_matches(d),
            "margin_distribution": reports::margin_distribution(d),
        })
    };
    assert_eq!(render(&first), render(&second));
}
