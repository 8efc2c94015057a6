//! Read-only projections of the match table.
//!
//! Every function here takes the whole [`Dataset`] and returns a
//! serializable result: summary numbers, a [`Chart`] description, or both.
//! None of them depends on another's output and none mutates anything.
//!
//! Count tables are ordered by count descending with ties broken by label
//! ascending, so repeated calls on the same table give identical output.

use crate::chart::{
    BarTrace, Chart, ChartKind, ColorBar, Font, HeatmapTrace, HistogramTrace, Layout, LineStyle,
    LineTrace, Marker, PieTrace, Trace, Values,
};
use crate::record::{Dataset, MatchRecord, WinMethod};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

const PRIMARY: &str = "#00a8cc";
const ACCENT: &str = "#ff6b6b";
const TEAL: &str = "#4ecdc4";
const GOLD: &str = "#ffd93d";

/// Number of matches shown by [`recent_matches`]
pub const RECENT_LIMIT: usize = 10;

/// Number of players shown by [`player_of_match`]
pub const POTM_LIMIT: usize = 10;

/// Displayed when a value is absent
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overview {
    pub total_matches: usize,
    pub total_teams: usize,
    pub total_venues: usize,
    pub win_by_wickets: usize,
    pub win_by_runs: usize,
}

/// Wins and appearances of one team
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team: String,
    pub wins: usize,
    pub total_matches: usize,
    /// `wins / total_matches * 100`, rounded to 2 decimals
    pub win_percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamPerformance {
    pub data: Vec<TeamRecord>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WinPercentage {
    pub data: Vec<TeamRecord>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TossImpact {
    pub toss_winner_won: usize,
    pub toss_winner_lost: usize,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VenueStats {
    pub venues: Vec<CategoryCount>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WinMethodBreakdown {
    pub methods: Vec<CategoryCount>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarginDistribution {
    pub runs: Vec<f64>,
    pub wickets: Vec<f64>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerOfMatch {
    pub players: Vec<CategoryCount>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TossDecisionSplit {
    pub decisions: Vec<CategoryCount>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub match_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchTimeline {
    pub points: Vec<TimelinePoint>,
    pub chart: Chart,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeadToHead {
    pub teams: Vec<String>,
    /// `matrix[i][j]`: wins of `teams[i]` in matches against `teams[j]`
    pub matrix: Vec<Vec<u32>>,
    pub chart: Chart,
}

/// A match as shown in the recent matches list
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentMatch {
    pub date: String,
    pub team1: String,
    pub team2: String,
    pub winner: String,
    pub venue: String,
    pub potm: Option<String>,
    pub margin: String,
}

pub fn overview(dataset: &Dataset) -> Overview {
    let method_count = |method: WinMethod| {
        dataset
            .records()
            .iter()
            .filter(|r| r.won_by == Some(method))
            .count()
    };

    Overview {
        total_matches: dataset.len(),
        total_teams: dataset.teams().len(),
        total_venues: dataset.venues().len(),
        win_by_wickets: method_count(WinMethod::Wickets),
        win_by_runs: method_count(WinMethod::Runs),
    }
}

/// Per-team wins, most wins first
///
/// Only teams with at least one recorded win appear.
pub fn team_records(dataset: &Dataset) -> Vec<TeamRecord> {
    count_by(dataset.decided().map(|r| r.winner_label()))
        .into_iter()
        .map(|CategoryCount { label, count }| {
            let total_matches = dataset.records().iter().filter(|r| r.involves(&label)).count();
            TeamRecord {
                win_percentage: round2(count as f64 / total_matches as f64 * 100.0),
                team: label,
                wins: count,
                total_matches,
            }
        })
        .collect()
}

pub fn team_performance(dataset: &Dataset) -> TeamPerformance {
    let data = team_records(dataset);
    let teams = data.iter().map(|t| t.team.clone()).collect();
    let wins: Vec<f64> = data.iter().map(|t| t.wins as f64).collect();
    let labels = data.iter().map(|t| t.wins.to_string()).collect();

    let chart = Chart::new(
        ChartKind::Bar,
        Layout::new("Team Performance - Total Wins")
            .axes("Team", "Number of Wins")
            .hide_legend(),
    )
    .with_trace(Trace::Bar(
        BarTrace::vertical(teams, wins)
            .named("Wins")
            .marker(Marker::solid(PRIMARY))
            .labels(labels),
    ));

    TeamPerformance { data, chart }
}

pub fn win_percentage(dataset: &Dataset) -> WinPercentage {
    let mut data = team_records(dataset);
    data.sort_by(|a, b| a.win_percentage.total_cmp(&b.win_percentage));

    let teams = data.iter().map(|t| t.team.clone()).collect();
    let pcts: Vec<f64> = data.iter().map(|t| t.win_percentage).collect();
    let labels = pcts.iter().map(|p| format!("{p:?}%")).collect();
    let marker = Marker {
        showscale: Some(true),
        colorbar: Some(ColorBar::titled("Win %")),
        ..Marker::scaled(pcts.clone(), "Viridis")
    };

    let chart = Chart::new(
        ChartKind::HorizontalBar,
        Layout::new("Team Win Percentage").axes("Win Percentage (%)", "Team"),
    )
    .with_trace(Trace::Bar(
        BarTrace::horizontal(teams, pcts).marker(marker).labels(labels),
    ));

    WinPercentage { data, chart }
}

pub fn toss_impact(dataset: &Dataset) -> TossImpact {
    let (won, lost) = dataset.decided().fold((0, 0), |(won, lost), r| {
        if r.won_by_team(&r.toss_winner) {
            (won + 1, lost)
        } else {
            (won, lost + 1)
        }
    });

    let pie = PieTrace {
        marker: Some(Marker::slices(&[PRIMARY, ACCENT])),
        ..PieTrace::new(
            vec!["Toss Winner Won".into(), "Toss Winner Lost".into()],
            vec![won as f64, lost as f64],
            0.4,
        )
    };
    let chart = Chart::new(
        ChartKind::Pie,
        Layout::new("Toss Impact - Did Toss Winners Win the Match?"),
    )
    .with_trace(Trace::Pie(pie));

    TossImpact {
        toss_winner_won: won,
        toss_winner_lost: lost,
        chart,
    }
}

pub fn venue_stats(dataset: &Dataset) -> VenueStats {
    let venues = count_by(dataset.records().iter().map(|r| r.venue.as_str()));
    let (labels, values) = split_counts(&venues);

    let pie = PieTrace {
        textinfo: "label+value",
        textfont: Font { size: 11 },
        ..PieTrace::new(labels, values, 0.3)
    };
    let chart = Chart::new(ChartKind::Pie, Layout::new("Matches Played at Each Venue"))
        .with_trace(Trace::Pie(pie));

    VenueStats { venues, chart }
}

pub fn win_method(dataset: &Dataset) -> WinMethodBreakdown {
    let methods = count_by(dataset.decided().filter_map(|r| r.won_by.map(|m| m.label())));
    let (labels, values) = split_counts(&methods);
    let text = methods.iter().map(|m| m.count.to_string()).collect();

    let chart = Chart::new(
        ChartKind::Bar,
        Layout::new("Wins by Method (Runs vs Wickets)").axes("Winning Method", "Number of Wins"),
    )
    .with_trace(Trace::Bar(
        BarTrace::vertical(labels, values)
            .marker(Marker::per_point(&[TEAL, ACCENT]))
            .labels(text),
    ));

    WinMethodBreakdown { methods, chart }
}

pub fn margin_distribution(dataset: &Dataset) -> MarginDistribution {
    let margins_for = |method: WinMethod| -> Vec<f64> {
        dataset
            .decided()
            .filter(|r| r.won_by == Some(method))
            .filter_map(|r| r.margin)
            .collect()
    };
    let runs = margins_for(WinMethod::Runs);
    let wickets = margins_for(WinMethod::Wickets);

    let histogram = |values: &[f64], name: &str, color: &str, nbinsx: u32| {
        Trace::Histogram(HistogramTrace {
            x: values.to_vec(),
            name: name.to_string(),
            marker: Marker::solid(color),
            opacity: 0.7,
            nbinsx,
        })
    };

    let chart = Chart::new(
        ChartKind::Histogram,
        Layout::new("Distribution of Victory Margins")
            .axes("Margin", "Frequency")
            .overlay(),
    )
    .with_trace(histogram(&runs, "Runs", PRIMARY, 15))
    .with_trace(histogram(&wickets, "Wickets", ACCENT, 10));

    MarginDistribution {
        runs,
        wickets,
        chart,
    }
}

pub fn player_of_match(dataset: &Dataset) -> PlayerOfMatch {
    let mut players = count_by(dataset.records().iter().filter_map(|r| r.potm.as_deref()));
    players.truncate(POTM_LIMIT);

    let (names, awards) = split_counts(&players);
    let text = players.iter().map(|p| p.count.to_string()).collect();
    let marker = Marker {
        showscale: Some(false),
        ..Marker::scaled(awards.clone(), "Blues")
    };

    let chart = Chart::new(
        ChartKind::HorizontalBar,
        Layout::new("Top 10 Players by POTM Awards")
            .axes("Number of Awards", "Player")
            .height(500),
    )
    .with_trace(Trace::Bar(
        BarTrace::horizontal(names, awards).marker(marker).labels(text),
    ));

    PlayerOfMatch { players, chart }
}

pub fn toss_decision(dataset: &Dataset) -> TossDecisionSplit {
    let decisions = count_by(dataset.records().iter().map(|r| r.toss_decision.label()));
    let (labels, values) = split_counts(&decisions);

    let pie = PieTrace {
        marker: Some(Marker::slices(&[TEAL, GOLD])),
        ..PieTrace::new(labels, values, 0.4)
    };
    let chart = Chart::new(
        ChartKind::Pie,
        Layout::new("Toss Decision Preference (Bat vs Field)"),
    )
    .with_trace(Trace::Pie(pie));

    TossDecisionSplit { decisions, chart }
}

/// Cumulative match count by date
///
/// Records without a date are left out.
pub fn match_timeline(dataset: &Dataset) -> MatchTimeline {
    let mut dates: Vec<NaiveDate> = dataset.records().iter().filter_map(|r| r.date).collect();
    dates.sort();

    let points: Vec<TimelinePoint> = dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| TimelinePoint {
            date,
            match_count: i + 1,
        })
        .collect();

    let line = LineTrace {
        x: Values::Text(
            points
                .iter()
                .map(|p| p.date.format("%Y-%m-%d").to_string())
                .collect(),
        ),
        y: points.iter().map(|p| p.match_count as f64).collect(),
        mode: "lines+markers",
        line: LineStyle {
            color: PRIMARY.to_string(),
            width: 2,
        },
        marker: Marker {
            size: Some(6),
            ..Marker::default()
        },
        fill: Some("tozeroy"),
        fillcolor: Some("rgba(0, 168, 204, 0.2)".to_string()),
    };
    let chart = Chart::new(
        ChartKind::Line,
        Layout::new("Tournament Timeline - Cumulative Matches").axes("Date", "Cumulative Match Count"),
    )
    .with_trace(Trace::Line(line));

    MatchTimeline { points, chart }
}

/// Win matrix over every ordered pair of teams
///
/// Cost is O(teams² × records), fine for a single season.
pub fn head_to_head(dataset: &Dataset) -> HeadToHead {
    let teams: Vec<String> = dataset.teams().into_iter().map(str::to_string).collect();

    let matrix: Vec<Vec<u32>> = teams
        .iter()
        .map(|team| {
            teams
                .iter()
                .map(|opponent| {
                    if team == opponent {
                        return 0;
                    }
                    dataset
                        .records()
                        .iter()
                        .filter(|r| r.involves(team) && r.won_by_team(team) && r.involves(opponent))
                        .count() as u32
                })
                .collect()
        })
        .collect();

    let heatmap = HeatmapTrace {
        z: matrix.clone(),
        x: teams.clone(),
        y: teams.clone(),
        colorscale: "Blues",
        text: matrix.clone(),
        texttemplate: "%{text}",
        textfont: Font { size: 12 },
        colorbar: ColorBar::titled("Wins"),
    };
    let chart = Chart::new(
        ChartKind::Heatmap,
        Layout::new("Head-to-Head: Wins Matrix")
            .axes("Opponent", "Team")
            .height(500)
            .font_size(11),
    )
    .with_trace(Trace::Heatmap(heatmap));

    HeadToHead {
        teams,
        matrix,
        chart,
    }
}

/// The last [`RECENT_LIMIT`] records of the table, newest date first
///
/// Undated records sort after dated ones. Equal dates keep table order.
pub fn recent_matches(dataset: &Dataset) -> Vec<RecentMatch> {
    let records = dataset.records();
    let mut recent: Vec<&MatchRecord> = records[records.len().saturating_sub(RECENT_LIMIT)..]
        .iter()
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    recent
        .into_iter()
        .map(|r| RecentMatch {
            date: r
                .date
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            team1: r.team1.clone(),
            team2: r.team2.clone(),
            winner: r.winner_label().to_string(),
            venue: r.venue.clone(),
            potm: r.potm.clone(),
            margin: format_margin(r),
        })
        .collect()
}

/// `"<integer> <method>"`, or [`NOT_AVAILABLE`] without a margin
pub fn format_margin(record: &MatchRecord) -> String {
    match (record.margin, record.won_by) {
        (Some(margin), Some(method)) => format!("{} {}", margin.trunc() as i64, method),
        (Some(margin), None) => format!("{}", margin.trunc() as i64),
        (None, _) => NOT_AVAILABLE.to_string(),
    }
}

/// Every charted report, keyed by its endpoint name
pub fn charts(dataset: &Dataset) -> Vec<(&'static str, Chart)> {
    vec![
        ("team_performance", team_performance(dataset).chart),
        ("win_percentage", win_percentage(dataset).chart),
        ("toss_impact", toss_impact(dataset).chart),
        ("venue_stats", venue_stats(dataset).chart),
        ("win_method", win_method(dataset).chart),
        ("margin_distribution", margin_distribution(dataset).chart),
        ("player_of_match", player_of_match(dataset).chart),
        ("toss_decision", toss_decision(dataset).chart),
        ("match_timeline", match_timeline(dataset).chart),
        ("head_to_head", head_to_head(dataset).chart),
    ]
}

fn count_by<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut counts: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    // stable: equal counts stay in label order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn split_counts(counts: &[CategoryCount]) -> (Vec<String>, Vec<f64>) {
    counts
        .iter()
        .map(|c| (c.label.clone(), c.count as f64))
        .unzip()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
