/*!
# PSL Match Dashboard

A browser dashboard for one season of Pakistan Super League matches, built in Rust.

## Overview

The match table is read from a CSV file once at startup and kept in memory,
immutable, for the life of the process. Every dashboard panel is backed by a
report function that projects the table into summary numbers and a chart
description, recomputed on each request.

## Architecture

### Frontend Layer
- **Technologies**: HTML, CSS, JavaScript, Plotly
- A single page fetches every `/api/...` endpoint and hands the returned
  chart descriptions to Plotly unchanged

### Backend Layer
- **Technologies**: Rust, axum, tokio
- **Core Components**:
  - Loader - Parses and validates the CSV into a `Dataset`
  - Reports - Twelve independent, pure projections of the dataset
  - Charts - Typed chart descriptions that serialize as Plotly figures
  - Renderer - Draws the same chart descriptions to PNG with plotters

## Modules

- **record**: Match record, win method, toss decision and the `Dataset` table
- **loader**: CSV loading and per-field normalization
- **chart**: Chart description types
- **reports**: Report functions and their result types
- **config**: Data path, bind address and static directory
- **error**: Load and configuration errors
- **app**: Routing and handlers (feature `web`)
- **render**: PNG snapshots (feature `web`)

## REST API Endpoints

All endpoints are `GET`, take no parameters and return JSON.

- `/api/overview` - Match, team and venue counts, wins by method
- `/api/team_performance`, `/api/win_percentage` - Per-team wins
- `/api/toss_impact`, `/api/toss_decision` - Toss analysis
- `/api/venue_stats`, `/api/win_method`, `/api/margin_distribution`
- `/api/player_of_match` - Top award winners
- `/api/match_timeline` - Cumulative matches by date
- `/api/head_to_head` - Win matrix between teams
- `/api/recent_matches` - Last ten matches, newest first
*/

pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod reports;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod render;

pub use chart::{Chart, ChartKind};
pub use config::Config;
pub use error::{ConfigError, LoadError};
pub use loader::{from_reader, load_dataset};
pub use record::{Dataset, MatchRecord, TossDecision, WinMethod};
