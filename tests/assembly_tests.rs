//! Character assembly integration tests.
//!
//! These tests load features from JSON the way a content loader would,
//! then assemble characters against them end to end.

use tabletop_effects::character::{Assembler, Character};
use tabletop_effects::content::{ContentLibrary, ContentRegistry, RawFeature, SharedContent, Spell};
use tabletop_effects::core::{Fixed, RulesConfig};
use tabletop_effects::effects::{ActionKind, DefenseKind, EffectsContainer, EffectsLoader, ProficiencyKind};
use tabletop_effects::error::{BuildError, ChoiceError, EvalError};
use tabletop_effects::rules::{parse_stat_change, Timing};

const FEATURES: &str = r#"[
    {
        "key": "unarmored_defense",
        "name": "Unarmored Defense",
        "effects": [
            { "stat_changes": ["AC EARLY SET 10", "AC NORMAL ADD DEX_MOD", "AC NORMAL ADD CON_MOD"] }
        ]
    },
    {
        "key": "rage",
        "name": "Rage",
        "effects": [
            { "actions": { "bonus_action": { "Rage": "Enter a rage for one minute." } } },
            {
                "conditions": ["RAGING == true"],
                "defenses": { "resistance": ["bludgeoning", "piercing", "slashing"] },
                "stat_changes": ["MELEE_DAMAGE NORMAL ADD RAGE_DAMAGE"]
            }
        ]
    },
    {
        "key": "brutal_critical",
        "name": "Brutal Critical",
        "effects": [
            { "conditions": ["CLASS_LEVEL >= 9"], "stat_changes": ["CRIT_DICE NORMAL ADD 1"] }
        ]
    },
    {
        "key": "primal_knowledge",
        "name": "Primal Knowledge",
        "effects": [
            { "choices": [{ "attribute_name": "PRIMAL_SKILL", "amount": 1, "groups": ["barbarian_skills"] }] }
        ],
        "choosables": [
            {
                "attribute_name": "PRIMAL_SKILL",
                "grant_as": "skill",
                "options": {
                    "Athletics": { "effects": ["ATHLETICS_BONUS ADD 1"], "proficiencies": { "skill": ["Athletics"] } }
                }
            }
        ]
    },
    {
        "key": "fey_touched",
        "name": "Fey Touched",
        "effects": [
            { "bonus_spells": [{ "spell": "misty_step", "casting_attribute": "CHA" }] }
        ]
    }
]"#;

/// Log to the test output; set `RUST_LOG=tabletop_effects=debug` to see it.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn library() -> ContentRegistry {
    init_tracing();
    let raw: Vec<RawFeature> = serde_json::from_str(FEATURES).unwrap();
    let mut content = ContentRegistry::new();
    let errors = content.load_features(&EffectsLoader::default(), &raw);
    assert!(errors.is_empty(), "{errors:?}");

    content.register_group("barbarian_skills", ["Athletics", "Intimidation", "Survival"]);
    content.register_spell(Spell::new("misty_step", "Misty Step", 2));
    content
}

fn barbarian() -> Character {
    Character::new("Grona")
        .with_base("DEX_MOD", Fixed::from_int(2))
        .with_base("CON_MOD", Fixed::from_int(3))
        .with_base("RAGING", Fixed::from(false))
        .with_base("MELEE_DAMAGE", Fixed::ZERO)
        .with_constant("CLASS_LEVEL", Fixed::from_int(5))
        .with_constant("RAGE_DAMAGE", Fixed::from_int(2))
        .with_feature("unarmored_defense")
        .with_feature("rage")
        .with_feature("brutal_critical")
        .with_feature("primal_knowledge")
}

/// A full build applies active features and reports open choices.
#[test]
fn test_barbarian_build() {
    let content = library();
    let assembly = Assembler::assemble(&barbarian(), &content);

    assert!(assembly.is_clean(), "{:?}", assembly.errors());
    assert_eq!(assembly.attributes().get("AC"), Some(Fixed::from_int(15)));
    assert_eq!(assembly.attributes().get("MELEE_DAMAGE"), Some(Fixed::ZERO));
    assert!(!assembly.attributes().contains("CRIT_DICE"));

    assert_eq!(assembly.unresolved_choices().len(), 1);
    assert_eq!(assembly.unresolved_choices()[0].attribute_name(), "PRIMAL_SKILL");
    assert!(!assembly.is_complete());

    let grants = assembly.grants();
    assert_eq!(
        grants.actions.description(ActionKind::BonusAction, "Rage"),
        Some("Enter a rage for one minute.")
    );
    assert!(!grants.defenses.contains(DefenseKind::Resistance, "slashing"));
}

/// Changing a base value flips activation on the next build.
#[test]
fn test_raging_build() {
    let content = library();
    let raging = barbarian().with_base("RAGING", Fixed::from(true));
    let assembly = Assembler::assemble(&raging, &content);

    assert_eq!(assembly.attributes().get("MELEE_DAMAGE"), Some(Fixed::from_int(2)));
    let defenses = &assembly.grants().defenses;
    let resisted: Vec<_> = defenses.of(DefenseKind::Resistance).collect();
    assert_eq!(resisted, vec!["bludgeoning", "piercing", "slashing"]);
}

/// A pick with its own option container uses it.
#[test]
fn test_option_container_materializes() {
    let content = library();
    let character = barbarian().with_selection("PRIMAL_SKILL", ["Athletics"]);
    let assembly = Assembler::assemble(&character, &content);

    assert!(assembly.is_complete());
    assert_eq!(assembly.attributes().get("ATHLETICS_BONUS"), Some(Fixed::ONE));
    assert!(assembly
        .grants()
        .proficiencies
        .contains(ProficiencyKind::Skill, "Athletics"));
}

/// A pick without its own option falls back to a proficiency grant.
#[test]
fn test_group_pick_materializes_proficiency() {
    let content = library();
    let character = barbarian().with_selection("PRIMAL_SKILL", ["Survival"]);
    let assembly = Assembler::assemble(&character, &content);

    assert!(assembly.is_complete());
    assert!(!assembly.attributes().contains("ATHLETICS_BONUS"));
    assert!(assembly
        .grants()
        .proficiencies
        .contains(ProficiencyKind::Skill, "Survival"));
}

/// Invalid picks are reported and materialize nothing.
#[test]
fn test_invalid_pick() {
    let content = library();
    let character = barbarian().with_selection("PRIMAL_SKILL", ["Arcana"]);
    let assembly = Assembler::assemble(&character, &content);

    assert_eq!(
        assembly.errors(),
        &[BuildError::Choice(ChoiceError::UnknownOption {
            attribute: "PRIMAL_SKILL".into(),
            option: "Arcana".into()
        })]
    );
    assert!(assembly.unresolved_choices().is_empty());
    assert!(assembly.grants().proficiencies.of(ProficiencyKind::Skill).next().is_none());
}

/// Level-gated features switch on at their level.
#[test]
fn test_level_gate() {
    let content = library();
    let level_nine = barbarian().with_constant("CLASS_LEVEL", Fixed::from_int(9));
    let assembly = Assembler::assemble(&level_nine, &content);

    assert_eq!(assembly.attributes().get("CRIT_DICE"), Some(Fixed::ONE));
}

/// Missing references are collected alongside everything else.
#[test]
fn test_problems_are_collected() {
    let content = library();
    let character = Character::new("Broken")
        .with_feature("unarmored_defense")
        .with_feature("wild_shape")
        .with_decision(
            EffectsContainer::new().with_stat_change(parse_stat_change("HP NORMAL DIV ZERO").unwrap()),
        )
        .with_base("ZERO", Fixed::ZERO)
        .with_base("HP", Fixed::from_int(8));

    let assembly = Assembler::assemble(&character, &content);
    let errors = assembly.errors();

    assert!(errors.contains(&BuildError::UnknownFeature("wild_shape".into())));
    assert!(errors.contains(&BuildError::Eval(EvalError::DivisionByZero { attribute: "HP".into() })));
    assert!(errors.contains(&BuildError::Eval(EvalError::MissingIdentifier("DEX_MOD".into()))));
    assert!(assembly.has_fatal());
    assert_eq!(assembly.attributes().get("HP"), Some(Fixed::from_int(8)));
    assert_eq!(assembly.attributes().get("AC"), Some(Fixed::from_int(10)));
}

/// A class and a background may both offer a skill pick under one name.
#[test]
fn test_same_named_choices_across_features() {
    let raw: Vec<RawFeature> = serde_json::from_str(
        r#"[
            {
                "key": "fighter",
                "name": "Fighter",
                "effects": [{ "choices": [{ "attribute_name": "SKILL_PROFICIENCY", "amount": 1, "groups": ["class_skills"] }] }],
                "choosables": [{ "attribute_name": "SKILL_PROFICIENCY", "grant_as": "skill" }]
            },
            {
                "key": "acolyte",
                "name": "Acolyte",
                "effects": [{ "choices": [{ "attribute_name": "SKILL_PROFICIENCY", "amount": 1, "groups": ["bg_skills"] }] }],
                "choosables": [{ "attribute_name": "SKILL_PROFICIENCY", "grant_as": "skill" }]
            }
        ]"#,
    )
    .unwrap();
    let mut content = ContentRegistry::new();
    assert!(content.load_features(&EffectsLoader::default(), &raw).is_empty());
    content.register_group("class_skills", ["Athletics", "Survival"]);
    content.register_group("bg_skills", ["Insight", "Religion"]);

    let character = Character::new("Brother Tam")
        .with_feature("fighter")
        .with_feature("acolyte")
        .with_feature_selection("fighter", "SKILL_PROFICIENCY", ["Athletics"])
        .with_feature_selection("acolyte", "SKILL_PROFICIENCY", ["Insight"]);
    let assembly = Assembler::assemble(&character, &content);

    assert!(assembly.is_complete(), "{:?}", assembly.errors());
    let proficiencies = &assembly.grants().proficiencies;
    assert!(proficiencies.contains(ProficiencyKind::Skill, "Athletics"));
    assert!(proficiencies.contains(ProficiencyKind::Skill, "Insight"));

    // One unscoped pick cannot satisfy both groups.
    let shared = Character::new("Brother Tam")
        .with_feature("fighter")
        .with_feature("acolyte")
        .with_selection("SKILL_PROFICIENCY", ["Athletics"]);
    let assembly = Assembler::assemble(&shared, &content);
    assert_eq!(
        assembly.errors(),
        &[BuildError::Choice(ChoiceError::UnknownOption {
            attribute: "SKILL_PROFICIENCY".into(),
            option: "Athletics".into()
        })]
    );
}

/// A gate that fails to load keeps its feature switched off.
#[test]
fn test_malformed_gate_never_applies() {
    let raw: Vec<RawFeature> = serde_json::from_str(
        r#"[{
            "key": "capstone",
            "name": "Capstone",
            "effects": [{ "conditions": ["class_level >= 20"], "stat_changes": ["STR NORMAL ADD 4"] }]
        }]"#,
    )
    .unwrap();
    let mut content = ContentRegistry::new();
    let errors = content.load_features(&EffectsLoader::default(), &raw);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source_name, "capstone");

    let character = Character::new("Novice")
        .with_base("STR", Fixed::from_int(10))
        .with_constant("CLASS_LEVEL", Fixed::ONE)
        .with_feature("capstone");
    let assembly = Assembler::assemble(&character, &content);
    assert_eq!(assembly.attributes().get("STR"), Some(Fixed::from_int(10)));
}

/// Bonus spells resolve to their content entries.
#[test]
fn test_bonus_spell() {
    let content = library();
    let character = Character::new("Wren").with_feature("fey_touched");
    let assembly = Assembler::assemble(&character, &content);

    assert!(assembly.is_clean());
    let spells = assembly.bonus_spells();
    assert_eq!(spells.len(), 1);
    assert_eq!(spells[0].spell.level, 2);
    assert_eq!(spells[0].casting_attribute.as_deref(), Some("CHA"));
}

/// Assembly is pure: the same inputs give the same result every time.
#[test]
fn test_rebuild_is_deterministic() {
    let content = library();
    let character = barbarian().with_selection("PRIMAL_SKILL", ["Athletics"]);

    let first = Assembler::assemble(&character, &content);
    let second = Assembler::assemble(&character, &content);
    assert_eq!(first, second);
}

/// Simple effects in loaded content follow the configured timing.
#[test]
fn test_configured_simple_effect_timing() {
    let loader = EffectsLoader::new(RulesConfig::new().with_simple_effect_timing(Timing::Latest));
    let raw: Vec<RawFeature> = serde_json::from_str(
        r#"[{ "key": "heavy", "name": "Heavy", "effects": [{ "effects": ["SPEED SET 25"], "stat_changes": ["SPEED LATE ADD 10"] }] }]"#,
    )
    .unwrap();
    let mut content = ContentRegistry::new();
    assert!(content.load_features(&loader, &raw).is_empty());

    let character = Character::new("Tank")
        .with_base("SPEED", Fixed::from_int(30))
        .with_feature("heavy");
    let assembly = Assembler::assemble(&character, &content);
    assert_eq!(assembly.attributes().get("SPEED"), Some(Fixed::from_int(25)));
}

/// Characters can be assembled on several threads against shared content.
#[test]
fn test_parallel_assembly() {
    let shared = SharedContent::new(library());

    let handles: Vec<_> = (0..4)
        .map(|level| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let character = barbarian().with_constant("CLASS_LEVEL", Fixed::from_int(6 + level));
                let library = shared.read().unwrap();
                assert!(library.get_feature("rage").is_some());
                Assembler::assemble(&character, &*library)
                    .attributes()
                    .contains("CRIT_DICE")
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, false, true]);
}
