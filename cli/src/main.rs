use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use encoding_rs::UTF_8;
use engine::api::{sample_hero, simulate_fight, FightConfig, LuckPolicy};
use engine::session::{Session, Snapshot};
use engine::Dice;

#[derive(Subcommand)]
enum Cmd {
    /// Roll custom dice and show the breakdown
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of dice
        #[arg(long, default_value_t = 2)]
        count: u32,
        /// Faces per die
        #[arg(long, default_value_t = 6)]
        sides: u32,
    },
    /// Roll a fresh hero and print the save document (stdout)
    Hero {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Simulate one fight and print the combat log
    Fight {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Builtin foe id (orc, ogre, wild_dog)
        #[arg(long, default_value = "orc")]
        foe: String,
        /// Foe sheet file (YAML or JSON); overrides --foe
        #[arg(long)]
        foe_file: Option<PathBuf>,
        /// Luck policy: never | always | a numeric threshold
        #[arg(long, default_value = "always")]
        luck: String,
        /// Safety cap on attack rounds
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
    },
    /// Load a save file and summarize the tracked state
    Load {
        /// Path to a JSON save (browser exports welcome, BOM and all)
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = "ff-companion")]
#[command(about = "Fighting Fantasy solo-play companion harness")]
struct Cli {
    /// Verbose engine diagnostics
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn parse_policy(s: &str) -> anyhow::Result<LuckPolicy> {
    match s {
        "never" => Ok(LuckPolicy::Never),
        "always" => Ok(LuckPolicy::Always),
        other => other
            .parse::<i32>()
            .map(LuckPolicy::Threshold)
            .map_err(|_| anyhow::anyhow!("luck policy must be never, always, or a number")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        engine::init_tracing();
    }
    match cli.cmd {
        Cmd::Roll { seed, count, sides } => {
            let mut dice = Dice::from_seed(seed);
            let breakdown = dice.roll_custom(count, sides);
            let parts = breakdown
                .rolls
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(" + ");
            println!("{parts} = {}", breakdown.total);
        }
        Cmd::Hero { seed } => {
            let mut dice = Dice::from_seed(seed);
            let session = Session::new_game(&mut dice);
            println!("{}", serde_json::to_string_pretty(&session.to_snapshot())?);
        }
        Cmd::Fight {
            seed,
            foe,
            foe_file,
            luck,
            max_rounds,
            hero_skill,
            hero_stamina,
            hero_luck,
        } => {
            let mut hero = sample_hero();
            if let Some(v) = hero_skill {
                hero.skill = v;
            }
            if let Some(v) = hero_stamina {
                hero.stamina = v;
            }
            if let Some(v) = hero_luck {
                hero.luck = v;
            }
            let cfg = FightConfig {
                foe_path: foe_file.map(|p| p.display().to_string()),
                foe_id: Some(foe),
                seed,
                luck_policy: parse_policy(&luck)?,
                hero: Some(hero),
                max_rounds,
            };
            let result = simulate_fight(cfg)?;
            for line in &result.log {
                println!("{line}");
            }
        }
        Cmd::Load { file } => {
            let bytes = fs::read(&file)
                .with_context(|| format!("failed to read save: {}", file.display()))?;
            // Browser exports sometimes carry a BOM; decode handles it.
            let (text, _, _) = UTF_8.decode(&bytes);
            let snapshot: Snapshot = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse save: {}", file.display()))?;
            let session = Session::from_snapshot(snapshot);
            print_summary(&session);
        }
    }
    Ok(())
}

fn print_summary(session: &Session) {
    let p = &session.player;
    println!(
        "Hero: skill {}/{}, stamina {}/{}, luck {}/{}, magic {}/{}",
        p.skill, p.max_skill, p.stamina, p.max_stamina, p.luck, p.max_luck, p.magic, p.max_magic
    );
    let potion = match (p.potion, p.potion_used) {
        (Some(kind), false) => format!("{kind:?} (unused)"),
        (Some(kind), true) => format!("{kind:?} (used)"),
        (None, _) => "none".to_string(),
    };
    println!("Meals: {}  Potion: {}", p.meals, potion);
    println!(
        "Modifiers: damage done {:+}, damage received {:+}, skill bonus {:+}",
        session.modifiers.damage_done,
        session.modifiers.damage_received,
        session.modifiers.skill_bonus
    );
    let prepared: Vec<_> = session.spells.prepared().collect();
    println!(
        "Spells ({}/{}): {}",
        prepared.len(),
        session.spells.limit(),
        if prepared.is_empty() { "none".to_string() } else { prepared.join(", ") }
    );
    if session.roster.is_empty() {
        println!("Enemies: none");
        return;
    }
    println!("Enemies:");
    for (i, enemy) in session.roster.iter().enumerate() {
        let tag = if enemy.is_copy { " [ally]" } else { "" };
        println!(
            "  {}. {} (skill {}, stamina {}) [id {}]{tag}",
            i + 1,
            enemy.name,
            enemy.skill,
            enemy.stamina,
            enemy.id
        );
    }
}
