//! Fixture lookup → odds fetch → top picks, shared by the CLI and the
//! JSON server.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::api::{find_fixture_for_team, ApiFootballClient, FixtureRecord};
use crate::error::{FetchError, OddsError};
use crate::markets::{top_picks, Pick};

#[derive(Debug, Error)]
pub enum PicksError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no upcoming fixture found for {team}")]
    NoFixture { team: String },

    #[error(transparent)]
    Odds(#[from] OddsError),
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureSummary {
    pub id: u64,
    pub kickoff: Option<DateTime<Utc>>,
    pub home: String,
    pub away: String,
}

impl From<&FixtureRecord> for FixtureSummary {
    fn from(record: &FixtureRecord) -> Self {
        Self {
            id: record.id(),
            kickoff: record.kickoff(),
            home: record.home_team().to_string(),
            away: record.away_team().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamPicks {
    pub fixture: FixtureSummary,
    pub picks: Vec<Pick>,
}

/// What to look for
#[derive(Debug, Clone)]
pub struct PicksRequest {
    pub league_id: u32,
    pub season: Option<u16>,
    pub team: String,
    pub min_probability: f64,
    pub limit: usize,
}

/// Next fixture of `team` in the league and its most probable 1X2 outcomes
pub async fn find_team_picks(
    client: &ApiFootballClient,
    request: &PicksRequest,
) -> Result<TeamPicks, PicksError> {
    let fixtures = client
        .fetch_upcoming_fixtures(request.league_id, request.season)
        .await?;

    let fixture = find_fixture_for_team(&fixtures, &request.team).ok_or_else(|| {
        PicksError::NoFixture {
            team: request.team.clone(),
        }
    })?;
    let summary = FixtureSummary::from(fixture);

    info!(
        "Evaluating fixture {}: {} vs {}",
        summary.id, summary.home, summary.away
    );

    let offers = client.fetch_odds_for_fixture(summary.id, None).await?;
    let picks = top_picks(
        &offers,
        &summary.home,
        &summary.away,
        request.min_probability,
        request.limit,
    )?;

    info!(
        "{} picks at or above {:.0}% for fixture {}",
        picks.len(),
        request.min_probability * 100.0,
        summary.id
    );

    Ok(TeamPicks {
        fixture: summary,
        picks,
    })
}
