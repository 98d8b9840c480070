use engine::modifiers::EnemyModifiers;
use engine::player::{Potion, StatsBlock};
use engine::roster::EnemySpec;
use engine::session::{Session, Snapshot};
use engine::Dice;

#[test]
fn new_game_rolls_within_the_book_ranges() {
    let mut dice = Dice::from_seed(2025);
    let session = Session::new_game(&mut dice);
    let p = &session.player;
    assert!((7..=12).contains(&p.skill));
    assert!((14..=24).contains(&p.stamina));
    assert!((7..=12).contains(&p.luck));
    assert!((8..=18).contains(&p.magic));
    assert_eq!(p.skill, p.max_skill);
    assert_eq!(p.stamina, p.max_stamina);
    assert_eq!(p.luck, p.max_luck);
    assert_eq!(p.meals, 10);
    assert!(session.roster.is_empty());
    assert_eq!(session.spells.limit(), p.magic as usize);
    assert_eq!(session.initial, p.initial_stats());
}

#[test]
fn snapshot_round_trip_preserves_the_session() {
    let mut dice = Dice::from_seed(7);
    let mut session = Session::new_game(&mut dice);
    session.modifiers.damage_done = 1;
    session.modifiers.skill_bonus = -2;
    let first = session.roster.add(
        EnemySpec {
            name: Some("Gargoyle".to_string()),
            skill: 9,
            stamina: 11,
            modifiers: EnemyModifiers { damage_received: -1, ..Default::default() },
            ..Default::default()
        },
        false,
    );
    session.roster.add(EnemySpec { skill: 6, stamina: 5, ..Default::default() }, false);
    session.roster.copy_from(first).unwrap();
    session.spells.prepare("Creature Copy");
    session.spells.prepare("Weakness");

    let json = serde_json::to_string(&session.to_snapshot()).unwrap();
    let restored = Session::from_snapshot(serde_json::from_str(&json).unwrap());

    assert_eq!(restored.player, session.player);
    assert_eq!(restored.initial, session.initial);
    assert_eq!(restored.modifiers, session.modifiers);
    assert_eq!(restored.roster, session.roster);
    assert_eq!(
        restored.spells.prepared().collect::<Vec<_>>(),
        session.spells.prepared().collect::<Vec<_>>()
    );
    assert_eq!(restored.spells.limit(), session.spells.limit());
}

#[test]
fn browser_style_save_loads_with_legacy_modifiers_and_junk() {
    let doc = r#"{
        "player": {
            "skill": "10", "stamina": 99, "luck": 8, "magic": 9,
            "maxSkill": 10, "maxStamina": 20, "maxLuck": 11, "maxMagic": 9,
            "meals": 3, "potion": "Potion of Fortune", "potionUsed": false
        },
        "initialStats": {"skill": 10, "stamina": 20, "luck": 11, "magic": 9},
        "playerModifiers": {"damageDone": 500, "damageReceived": "nope", "skillBonus": -1},
        "enemies": [
            {"id": 4, "name": "Mummy", "skill": 7, "stamina": 12,
             "modifiers": {"damageDealt": 5}},
            {"name": "Shadow", "skill": "6", "stamina": "4",
             "modifiers": {"mode": "delta", "damageReceived": "-2"}}
        ],
        "spells": {"prepared": ["Creature Copy"], "limit": 9},
        "notes": "scribbles the engine must ignore",
        "book": 2,
        "pageNumber": 117
    }"#;
    let snapshot: Snapshot = serde_json::from_str(doc).unwrap();
    let session = Session::from_snapshot(snapshot);

    // Stats clamp to their maxima; strings coerce.
    assert_eq!(session.player.skill, 10);
    assert_eq!(session.player.stamina, 20);
    assert_eq!(session.player.potion, Some(Potion::Fortune));
    assert_eq!(session.modifiers.damage_done, 99);
    assert_eq!(session.modifiers.damage_received, 0);
    assert_eq!(session.modifiers.skill_bonus, -1);

    // Legacy absolute 5 damage becomes delta +3; delta form passes through.
    let mummy = session.roster.by_id(4).unwrap();
    assert_eq!(mummy.modifiers.damage_dealt, 3);
    let shadow = session.roster.iter().find(|e| e.name == "Shadow").unwrap();
    assert_eq!(shadow.modifiers.damage_received, -2);
    assert_eq!(shadow.skill, 6);
    assert_eq!(shadow.stamina, 4);

    // Counter resumes past the highest id seen.
    let mut roster = session.roster.clone();
    assert!(roster.add(EnemySpec { skill: 1, stamina: 1, ..Default::default() }, false) >= 5);

    assert_eq!(session.spells.prepared().collect::<Vec<_>>(), vec!["Creature Copy"]);
    assert_eq!(session.spells.limit(), 9);
}

#[test]
fn missing_maxima_are_repaired_from_initial_stats() {
    let doc = r#"{
        "player": {"skill": 8, "stamina": 15, "luck": 6, "magic": 7},
        "initialStats": {"skill": 9, "stamina": 18, "luck": 10, "magic": 12}
    }"#;
    let snapshot: Snapshot = serde_json::from_str(doc).unwrap();
    let session = Session::from_snapshot(snapshot);
    assert_eq!(session.player.max_skill, 9);
    assert_eq!(session.player.max_stamina, 18);
    assert_eq!(session.player.max_luck, 10);
    assert_eq!(session.player.max_magic, 12);
    assert_eq!(session.player.skill, 8);
}

#[test]
fn meals_and_potions_follow_the_book() {
    let mut dice = Dice::from_seed(11);
    let mut session = Session::new_game(&mut dice);
    session.player.stamina = 1;

    assert!(session.player.eat_meal());
    assert_eq!(session.player.stamina, 5);
    assert_eq!(session.player.meals, 9);

    session.player.meals = 0;
    let stamina = session.player.stamina;
    assert!(!session.player.eat_meal());
    assert_eq!(session.player.stamina, stamina);

    session.player.potion = Some(Potion::Fortune);
    let old_max = session.player.max_luck;
    assert_eq!(session.player.drink_potion(), Some(Potion::Fortune));
    assert_eq!(session.player.max_luck, old_max + 1);
    assert_eq!(session.player.luck, session.player.max_luck);
    // Single use.
    assert_eq!(session.player.drink_potion(), None);
}

#[test]
fn spell_book_respects_its_limit_and_order() {
    let mut dice = Dice::from_seed(3);
    let mut session = Session::new_game(&mut dice);
    let mut book = engine::session::SpellBook::with_limit(2);
    assert!(book.prepare("Fire"));
    assert!(book.prepare("Fear"));
    assert!(!book.prepare("Fire"), "duplicates are refused");
    assert!(!book.prepare("Levitate"), "the book is full");
    assert_eq!(book.prepared().collect::<Vec<_>>(), vec!["Fire", "Fear"]);
    assert!(book.forget("Fire"));
    assert!(book.prepare("Levitate"));
    assert_eq!(book.prepared().collect::<Vec<_>>(), vec!["Fear", "Levitate"]);
    // Session books start empty with the magic roll as the limit.
    assert_eq!(session.spells.count(), 0);
    assert!(session.spells.prepare("Creature Copy"));
}
