use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use engine::api::{sample_hero, simulate_fight_many, FightConfig, FightStats, LuckPolicy};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "simulate-fights")]
#[command(about = "Monte Carlo sim: many fights vs one foe")]
struct Args {
    /// Builtin foe id (orc, ogre, wild_dog)
    #[arg(long, default_value = "orc")]
    foe: String,

    /// Foe sheet file (YAML or JSON); overrides --foe
    #[arg(long)]
    foe_file: Option<PathBuf>,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Luck policy: never | always | a numeric threshold
    #[arg(long, default_value = "always")]
    luck: String,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// Override the sample hero's skill
    #[arg(long)]
    hero_skill: Option<i32>,

    /// Override the sample hero's stamina
    #[arg(long)]
    hero_stamina: Option<i32>,

    /// Override the sample hero's luck
    #[arg(long)]
    hero_luck: Option<i32>,

    /// Emit the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct RunReport {
    foe: String,
    trials: u32,
    seed: u64,
    stats: FightStats,
}

fn parse_policy(s: &str) -> Result<LuckPolicy> {
    match s {
        "never" => Ok(LuckPolicy::Never),
        "always" => Ok(LuckPolicy::Always),
        other => other
            .parse::<i32>()
            .map(LuckPolicy::Threshold)
            .map_err(|_| anyhow::anyhow!("luck policy must be never, always, or a number")),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut hero = sample_hero();
    if let Some(v) = args.hero_skill {
        hero.skill = v;
    }
    if let Some(v) = args.hero_stamina {
        hero.stamina = v;
    }
    if let Some(v) = args.hero_luck {
        hero.luck = v;
    }

    let foe_label = args
        .foe_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| args.foe.clone());
    let cfg = FightConfig {
        foe_path: args.foe_file.map(|p| p.display().to_string()),
        foe_id: Some(args.foe.clone()),
        seed: args.seed,
        luck_policy: parse_policy(&args.luck)?,
        hero: Some(hero),
        max_rounds: args.max_rounds,
    };
    let stats = simulate_fight_many(cfg, args.trials)?;

    if args.json {
        let report = RunReport {
            foe: foe_label,
            trials: args.trials,
            seed: args.seed,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let pct = |n: u32| 100.0 * n as f64 / stats.trials as f64;
    println!(
        "[SIM] {} x{}: hero {:.1}% | foe {:.1}% | draw {:.1}%",
        foe_label,
        stats.trials,
        pct(stats.hero_wins),
        pct(stats.foe_wins),
        pct(stats.draws)
    );
    println!(
        "[SIM] avg rounds {:.1}, avg hero stamina left {:.1}",
        stats.avg_rounds, stats.avg_hero_stamina_left
    );
    Ok(())
}
