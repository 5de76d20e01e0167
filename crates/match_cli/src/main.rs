//! Match CLI
//!
//! Roster file (JSON or YAML) → single match or Monte Carlo batch

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use match_core::{aggregate, simulate_batch, MatchSimulator, MatchStatsV2, RosterFile, SimConfig, Team, TeamStatsV2};

#[derive(Parser)]
#[command(name = "match_cli")]
#[command(about = "Simulate football matches from a roster file", long_about = None)]
#[command(version = match_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one match
    Simulate {
        /// Roster file with home_team and away_team (.json, .yaml, .yml)
        #[arg(long)]
        roster: PathBuf,

        /// Match length in minutes (1-120)
        #[arg(long, default_value_t = 90)]
        minutes: u16,

        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Simulation config overrides (.json, .yaml, .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the event log as JSON
        #[arg(long)]
        log: bool,
    },

    /// Simulate many matches and report results
    Batch {
        /// Roster file with home_team and away_team (.json, .yaml, .yml)
        #[arg(long)]
        roster: PathBuf,

        /// Number of matches
        #[arg(long, default_value_t = 1000)]
        matches: u32,

        /// Match length in minutes (1-120)
        #[arg(long, default_value_t = 90)]
        minutes: u16,

        /// Seed of the first match; match i uses seed + i
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Simulation config overrides (.json, .yaml, .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Dump the merged statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { roster, minutes, seed, config, log } => {
            let (home, away) = load_teams(&roster)?;
            let config = load_config(config.as_deref())?;

            let mut sim = MatchSimulator::new(home.clone(), away.clone(), minutes, seed)?.with_config(config)?;
            let events = sim.run();
            let stats = aggregate(events, &home, &away);

            if log {
                println!("{}", serde_json::to_string_pretty(events)?);
            }
            print_match(&stats, minutes, seed);
        }

        Commands::Batch { roster, matches, minutes, seed, config, json } => {
            let (home, away) = load_teams(&roster)?;
            let config = load_config(config.as_deref())?;

            let report = simulate_batch(&home, &away, minutes, matches, seed, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report.stats)?);
                return Ok(());
            }

            println!("{} vs {}: {} matches of {} minutes", home.name, away.name, report.matches, minutes);
            println!(
                "   {} wins:  {:>6} ({:.1}%)",
                home.name,
                report.home_wins,
                report.home_win_rate() * 100.0
            );
            println!("   Draws:  {:>6} ({:.1}%)", report.draws, report.draw_rate() * 100.0);
            println!(
                "   {} wins:  {:>6} ({:.1}%)",
                away.name,
                report.away_wins,
                report.away_win_rate() * 100.0
            );
            println!("   Average goals: {:.2} - {:.2}", report.home_goals_avg, report.away_goals_avg);
            println!("   Most common scores:");
            for (score, count) in report.top_scores(5) {
                println!("      {score:<7} {count}");
            }
        }
    }

    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

fn load_teams(path: &Path) -> Result<(Team, Team)> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading roster {}", path.display()))?;
    let roster = if is_yaml(path) { RosterFile::from_yaml_str(&text)? } else { RosterFile::from_json_str(&text)? };
    roster.into_teams().with_context(|| format!("invalid roster {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = if is_yaml(path) { SimConfig::from_yaml_str(&text) } else { SimConfig::from_json_str(&text) };
    config.with_context(|| format!("invalid config {}", path.display()))
}

fn print_match(stats: &MatchStatsV2, minutes: u16, seed: u64) {
    let (home_goals, away_goals) = stats.score();
    println!("{} {} - {} {}  ({} min, seed {})", stats.home, home_goals, away_goals, stats.away, minutes, seed);
    for name in [&stats.home, &stats.away] {
        if let Some(team) = stats.team(name) {
            print_team(stats, team);
        }
    }
}

fn print_team(stats: &MatchStatsV2, team: &TeamStatsV2) {
    println!("\n{}", team.name);
    println!(
        "   Chances:  {}/{} created",
        team.creator_off.successes(),
        team.creator_off.attempts()
    );
    println!(
        "   Finishes: {}/{} won",
        team.finisher_off.successes(),
        team.finisher_off.attempts()
    );
    println!(
        "   Shots:    {} ({} on target, {} goals)",
        team.shooting.shots(),
        team.shooting.shots_on(),
        team.shooting.goals()
    );

    let Some(players) = stats.player.get(&team.name) else { return };
    for player in players.values().filter(|p| p.goals() > 0 || p.assists() > 0) {
        println!("   {:<24} {} goals, {} assists", player.name, player.goals(), player.assists());
    }
    for player in players.values().filter(|p| p.is_goalkeeper()) {
        let gk = &player.goalkeeper_stats;
        println!("   {:<24} {} saves from {} on target", player.name, gk.saves(), gk.shots_on_target());
    }
}
