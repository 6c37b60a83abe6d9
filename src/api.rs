//! API-Football v3 client
//!
//! One HTTP request per call, no caching and no retries. Responses are
//! unwrapped from the `{ "errors": ..., "response": ... }` envelope and
//! decoded into the typed records below.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;

const API_KEY_HEADER: &str = "x-apisports-key";
const RATE_REMAINING_HEADER: &str = "x-ratelimit-requests-remaining";

/// One fixture as listed by `/fixtures`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct FixtureRecord {
    pub fixture: FixtureInfo,
    pub league: LeagueRef,
    pub teams: Teams,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct FixtureInfo {
    pub id: u64,
    pub date: Option<DateTime<Utc>>,
    pub status: FixtureStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct FixtureStatus {
    pub short: String,
    pub long: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct LeagueRef {
    pub id: u64,
    pub name: String,
    pub season: Option<u16>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Teams {
    pub home: TeamRef,
    pub away: TeamRef,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct TeamRef {
    pub id: u64,
    pub name: String,
}

impl FixtureRecord {
    pub fn id(&self) -> u64 {
        self.fixture.id
    }

    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        self.fixture.date
    }

    pub fn home_team(&self) -> &str {
        &self.teams.home.name
    }

    pub fn away_team(&self) -> &str {
        &self.teams.away.name
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team() == team || self.away_team() == team
    }
}

/// One entry of `/odds`: a fixture and every bookmaker quoting it
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OddsRecord {
    pub fixture: FixtureInfo,
    pub bookmakers: Vec<OddsOffer>,
}

/// A bookmaker's markets for one fixture
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct OddsOffer {
    pub id: u64,
    #[serde(rename = "name")]
    pub bookmaker: String,
    pub bets: Vec<Bet>,
}

/// A betting market, e.g. "Match Winner"
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Bet {
    pub id: u64,
    pub name: String,
    pub values: Vec<BetValue>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct BetValue {
    #[serde(deserialize_with = "de_label")]
    pub value: String,
    /// API-Football sends odds as strings ("1.85")
    #[serde(deserialize_with = "de_lenient_f64")]
    pub odd: Option<f64>,
}

/// Subset of `/teams/statistics` the evaluators can use
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct TeamStatistics {
    pub team: TeamRef,
    pub fixtures: FixtureCounts,
    pub goals: GoalStats,
    pub failed_to_score: SplitCount,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct FixtureCounts {
    pub played: SplitCount,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GoalStats {
    #[serde(rename = "for")]
    pub scored: GoalSplit,
    pub against: GoalSplit,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GoalSplit {
    pub total: SplitCount,
    pub average: SplitAverage,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SplitCount {
    pub home: Option<u32>,
    pub away: Option<u32>,
    pub total: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SplitAverage {
    #[serde(deserialize_with = "de_lenient_f64")]
    pub home: Option<f64>,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub away: Option<f64>,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub total: Option<f64>,
}

impl TeamStatistics {
    /// Percentage (0-100) of home matches in which the team scored
    pub fn home_scoring_pct(&self) -> Option<f64> {
        scoring_pct(self.fixtures.played.home, self.failed_to_score.home)
    }

    /// Percentage (0-100) of away matches in which the team scored
    pub fn away_scoring_pct(&self) -> Option<f64> {
        scoring_pct(self.fixtures.played.away, self.failed_to_score.away)
    }
}

fn scoring_pct(played: Option<u32>, failed: Option<u32>) -> Option<f64> {
    let played = played.filter(|p| *p > 0)?;
    let failed = failed.unwrap_or(0).min(played);
    Some(f64::from(played - failed) / f64::from(played) * 100.0)
}

fn de_lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn de_label<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// First fixture with `team` on either side
pub fn find_fixture_for_team<'a>(
    fixtures: &'a [FixtureRecord],
    team: &str,
) -> Option<&'a FixtureRecord> {
    fixtures.iter().find(|f| f.involves(team))
}

/// Thin API-Football client
#[derive(Clone)]
pub struct ApiFootballClient {
    api_key: Option<String>,
    secret_path: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiFootballClient {
    pub fn new(config: &Config) -> Result<Self> {
        // HTTP client with timeouts
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key: config.api_key.clone(),
            secret_path: config.secret_path.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> std::result::Result<&str, FetchError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| FetchError::MissingCredential {
                secret_path: self.secret_path.clone(),
            })
    }

    /// Upcoming fixtures of a league, optionally restricted to one season
    pub async fn fetch_upcoming_fixtures(
        &self,
        league_id: u32,
        season: Option<u16>,
    ) -> std::result::Result<Vec<FixtureRecord>, FetchError> {
        let mut params = vec![("league", league_id.to_string())];
        if let Some(season) = season {
            params.push(("season", season.to_string()));
        }

        let fixtures: Vec<FixtureRecord> = self.get("/fixtures", &params).await?;
        info!("Fetched {} fixtures for league {}", fixtures.len(), league_id);
        Ok(fixtures)
    }

    /// Every bookmaker offer for a fixture, optionally from one bookmaker
    pub async fn fetch_odds_for_fixture(
        &self,
        fixture_id: u64,
        bookmaker: Option<&str>,
    ) -> std::result::Result<Vec<OddsOffer>, FetchError> {
        let mut params = vec![("fixture", fixture_id.to_string())];
        if let Some(bookmaker) = bookmaker {
            params.push(("bookmaker", bookmaker.to_string()));
        }

        let records: Vec<OddsRecord> = self.get("/odds", &params).await?;
        let offers: Vec<OddsOffer> = records.into_iter().flat_map(|r| r.bookmakers).collect();
        info!("Fetched {} bookmaker offers for fixture {}", offers.len(), fixture_id);
        Ok(offers)
    }

    /// Season statistics of a team within a league
    pub async fn fetch_team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: u16,
    ) -> std::result::Result<TeamStatistics, FetchError> {
        let params = vec![
            ("team", team_id.to_string()),
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ];
        self.get("/teams/statistics", &params).await
    }

    async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> std::result::Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let api_key = self.api_key()?;
        let body = self.get_body(api_key, endpoint, params).await?;
        Ok(parse_envelope(endpoint, &body)?)
    }

    async fn get_body(&self, api_key: &str, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, params);

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", endpoint))?;

        // Log API usage from headers
        if let Some(remaining) = response.headers().get(RATE_REMAINING_HEADER) {
            info!(
                "API requests remaining today: {}",
                remaining.to_str().unwrap_or("?")
            );
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "API-Football error (status {}): {}",
                status,
                body
            ));
        }

        Ok(body)
    }
}

/// Unwrap the API-Football envelope. A non-empty `errors` (array or object)
/// is a failure even on HTTP 200; a missing `response` decodes as `T::default()`.
fn parse_envelope<T>(endpoint: &str, body: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let envelope: Value = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse {} response", endpoint))?;

    if let Some(errors) = envelope.get("errors") {
        if has_errors(errors) {
            return Err(anyhow!("API-Football error: {}", errors));
        }
    }

    match envelope.get("response") {
        None | Some(Value::Null) => Ok(T::default()),
        Some(response) => serde_json::from_value(response.clone())
            .with_context(|| format!("Failed to decode {} response", endpoint)),
    }
}

fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
