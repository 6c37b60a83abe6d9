//! Football Value CLI
//!
//! Expected-value checks for Over 2.5, BTTS and 1X2 bets, plus fixture,
//! odds and statistics lookups against API-Football.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use football_value::api::{ApiFootballClient, TeamStatistics};
use football_value::config::Config;
use football_value::evaluator::{
    evaluate_btts, evaluate_over25, evaluate_result_from_odds, BttsInput, Over25Input,
};
use football_value::markets::is_match_winner_bet;
use football_value::picks::{find_team_picks, PicksRequest};
use football_value::server::{self, AppState};

#[derive(Parser)]
#[command(name = "football-value")]
#[command(author, version, about = "Football betting expected-value CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Over 2.5 goals analysis
    Over {
        /// Home side's average goals
        #[arg(long)]
        home_goals: f64,

        /// Away side's average goals
        #[arg(long)]
        away_goals: f64,

        /// Percentage of matches with over 2.5 goals (0-100)
        #[arg(long)]
        over25_pct: f64,

        /// Decimal odd for Over 2.5
        #[arg(long)]
        odd: f64,

        /// Key attacking players are missing
        #[arg(long)]
        offensive_absences: bool,
    },

    /// Both-Teams-To-Score analysis
    Btts {
        /// Percentage of matches the home side scored in (0-100)
        #[arg(long)]
        home_pct: f64,

        /// Percentage of matches the away side scored in (0-100)
        #[arg(long)]
        away_pct: f64,

        /// Decimal odd for BTTS
        #[arg(long)]
        odd: f64,

        /// Low-scoring recent history
        #[arg(long)]
        low_scoring: bool,

        /// At least one side defends strongly
        #[arg(long)]
        strong_defense: bool,
    },

    /// 1X2 result analysis from the three decimal odds
    #[command(name = "result", alias = "resultado")]
    MatchResult {
        #[arg(long)]
        home_odd: f64,

        #[arg(long)]
        draw_odd: f64,

        #[arg(long)]
        away_odd: f64,
    },

    /// List upcoming fixtures of a league
    Fixtures {
        #[arg(long)]
        league_id: u32,

        #[arg(long)]
        season: Option<u16>,
    },

    /// Show 1X2 odds for a fixture
    Odds {
        #[arg(long)]
        fixture_id: u64,

        /// Restrict to one bookmaker id
        #[arg(long)]
        bookmaker: Option<String>,
    },

    /// Show a team's season statistics as evaluator inputs
    Stats {
        #[arg(long)]
        team_id: u32,

        #[arg(long)]
        league_id: u32,

        #[arg(long)]
        season: u16,
    },

    /// Most probable 1X2 outcomes for a team's next fixture
    Picks {
        #[arg(long)]
        league_id: u32,

        #[arg(long)]
        season: Option<u16>,

        /// Team name exactly as API-Football spells it
        #[arg(long)]
        team: String,

        /// Minimum normalized probability (0-1)
        #[arg(long)]
        min_probability: Option<f64>,

        /// Maximum number of picks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run the JSON server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("football_value=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Over {
            home_goals,
            away_goals,
            over25_pct,
            odd,
            offensive_absences,
        } => {
            let eval = evaluate_over25(&Over25Input {
                home_goals,
                away_goals,
                over25_pct,
                odd,
                offensive_absences,
            })?;
            println!(
                "Over 2.5: Probability={:.1}% | Expected Value={:.2}",
                eval.probability * 100.0,
                eval.expected_value
            );
        }
        Commands::Btts {
            home_pct,
            away_pct,
            odd,
            low_scoring,
            strong_defense,
        } => {
            let eval = evaluate_btts(&BttsInput {
                home_pct,
                away_pct,
                odd,
                low_scoring,
                strong_defense,
            })?;
            println!(
                "BTTS: Probability={:.1}% | Expected Value={:.2}",
                eval.probability * 100.0,
                eval.expected_value
            );
        }
        Commands::MatchResult {
            home_odd,
            draw_odd,
            away_odd,
        } => {
            for eval in evaluate_result_from_odds(home_odd, draw_odd, away_odd)? {
                println!(
                    "{}: Prob={:.1}% | Odd={} | EV={:.2}",
                    eval.label,
                    eval.probability * 100.0,
                    eval.odd,
                    eval.expected_value
                );
            }
        }
        Commands::Fixtures { league_id, season } => {
            let config = Config::from_env()?;
            let client = ApiFootballClient::new(&config)?;
            let fixtures = client.fetch_upcoming_fixtures(league_id, season).await?;
            if fixtures.is_empty() {
                println!("No fixtures found.");
                return Ok(());
            }
            for f in &fixtures {
                let date = f
                    .kickoff()
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "TBD".to_string());
                println!("{}: {} vs {} @ {}", f.id(), f.home_team(), f.away_team(), date);
            }
        }
        Commands::Odds {
            fixture_id,
            bookmaker,
        } => {
            let config = Config::from_env()?;
            let client = ApiFootballClient::new(&config)?;
            let offers = client
                .fetch_odds_for_fixture(fixture_id, bookmaker.as_deref())
                .await?;
            if offers.is_empty() {
                println!("No odds found for the fixture.");
                return Ok(());
            }
            for offer in &offers {
                println!("Bookmaker: {}", offer.bookmaker);
                for bet in offer.bets.iter().filter(|b| is_match_winner_bet(&b.name)) {
                    println!("  Market: {}", bet.name);
                    for val in &bet.values {
                        let odd = val
                            .odd
                            .map(|o| o.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!("    {}: {}", val.value, odd);
                    }
                }
            }
        }
        Commands::Stats {
            team_id,
            league_id,
            season,
        } => {
            let config = Config::from_env()?;
            let client = ApiFootballClient::new(&config)?;
            let stats = client
                .fetch_team_statistics(team_id, league_id, season)
                .await?;
            print_statistics(&stats);
        }
        Commands::Picks {
            league_id,
            season,
            team,
            min_probability,
            limit,
        } => {
            let config = Config::from_env()?;
            let client = ApiFootballClient::new(&config)?;
            let request = PicksRequest {
                league_id,
                season,
                team,
                min_probability: min_probability.unwrap_or(config.min_pick_probability),
                limit: limit.unwrap_or(config.max_picks),
            };
            let result = find_team_picks(&client, &request).await?;

            let date = result
                .fixture
                .kickoff
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| "TBD".to_string());
            println!("Match: {} vs {}", result.fixture.home, result.fixture.away);
            println!("Date: {}", date);

            if result.picks.is_empty() {
                println!(
                    "No 1X2 bets with probability >= {:.0}%.",
                    request.min_probability * 100.0
                );
            } else {
                for pick in &result.picks {
                    let eval = &pick.evaluation;
                    println!(
                        "{} ({}): Probability={:.1}% | Odd={} | Expected Value={:.2}",
                        eval.label,
                        pick.bookmaker,
                        eval.probability * 100.0,
                        eval.odd,
                        eval.expected_value
                    );
                }
            }
        }
        Commands::Serve { port } => {
            let config = Config::from_env()?;
            let port = port.unwrap_or(config.server_port);
            let state = AppState::new(&config).context("Failed to build server state")?;
            info!("Football Value v{}", env!("CARGO_PKG_VERSION"));
            server::serve(state, port).await?;
        }
    }

    Ok(())
}

fn print_statistics(stats: &TeamStatistics) {
    let fmt_opt = |v: Option<f64>| {
        v.map(|x| format!("{:.2}", x))
            .unwrap_or_else(|| "-".to_string())
    };

    println!("Team: {} ({})", stats.team.name, stats.team.id);
    println!(
        "Goals scored avg: home={} away={} total={}",
        fmt_opt(stats.goals.scored.average.home),
        fmt_opt(stats.goals.scored.average.away),
        fmt_opt(stats.goals.scored.average.total)
    );
    println!(
        "Goals conceded avg: home={} away={} total={}",
        fmt_opt(stats.goals.against.average.home),
        fmt_opt(stats.goals.against.average.away),
        fmt_opt(stats.goals.against.average.total)
    );
    println!(
        "Scored in: home={}% away={}%",
        fmt_opt(stats.home_scoring_pct()),
        fmt_opt(stats.away_scoring_pct())
    );
}
