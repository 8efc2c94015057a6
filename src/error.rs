use std::net::AddrParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems while loading the match table
///
/// Any of these aborts startup; there is no partial load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: missing value for column {column}")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: team {team} cannot play itself")]
    SameTeams { row: usize, team: String },

    #[error("row {row}: winner {winner} did not play in this match")]
    UnknownWinner { row: usize, winner: String },

    #[error("row {row}: unrecognized toss decision {value:?}")]
    InvalidTossDecision { row: usize, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
}
