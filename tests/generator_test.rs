use ean_forge::core::codec;
use ean_forge::{
    CodecError, Constraint, ConstraintEngine, Ean13, GeneratorSettings, Prefix, SharedExclusions,
};
use std::collections::HashSet;

fn siblings(prefix: &str) -> Vec<Ean13> {
    (0..10)
        .map(|last| codec::encode_str(&format!("{}{}", prefix, last)).unwrap())
        .collect()
}

#[test]
fn test_same_seed_same_sequence() {
    let constraint = Constraint::with_prefix("978".parse().unwrap());
    let mut first = ConstraintEngine::seeded(2024, GeneratorSettings::default());
    let mut second = ConstraintEngine::seeded(2024, GeneratorSettings::default());

    let a = first.generate_many(&constraint, 20).unwrap();
    let b = second.generate_many(&constraint, 20).unwrap();
    assert_eq!(a, b);
    assert!(a.iter().all(|code| code.to_string().starts_with("978")));
}

#[test]
fn test_only_free_code_is_found() {
    let prefix: Prefix = "40063813339".parse().unwrap();
    let mut excluded: HashSet<Ean13> = siblings("40063813339").into_iter().collect();
    let free: Ean13 = "4006381333931".parse().unwrap();
    assert!(excluded.remove(&free));

    let constraint = Constraint::new(prefix, &excluded);
    let mut engine = ConstraintEngine::seeded(1, GeneratorSettings::default());
    assert_eq!(engine.generate(&constraint).unwrap(), free);
}

#[test]
fn test_scan_reaches_free_code_after_threshold() {
    let prefix: Prefix = "40063813339".parse().unwrap();
    let mut excluded: HashSet<Ean13> = siblings("40063813339").into_iter().collect();
    let free: Ean13 = "4006381333931".parse().unwrap();
    excluded.remove(&free);

    // a single random draw before scanning
    let settings = GeneratorSettings {
        max_attempts: 11,
        scan_threshold: 1,
        time_budget: None,
    };
    for seed in 0..20 {
        let constraint = Constraint::new(prefix.clone(), &excluded);
        let mut engine = ConstraintEngine::seeded(seed, settings.clone());
        assert_eq!(engine.generate(&constraint).unwrap(), free, "seed {}", seed);
    }
}

#[test]
fn test_full_exclusion_is_exhausted() {
    let excluded: HashSet<Ean13> = siblings("40063813339").into_iter().collect();
    let constraint = Constraint::new("40063813339".parse().unwrap(), &excluded);
    let mut engine = ConstraintEngine::seeded(9, GeneratorSettings::default());

    match engine.generate(&constraint) {
        Err(CodecError::Exhausted { attempts }) => assert!(attempts >= 10),
        other => panic!("expected exhaustion, got {:?}", other),
    }
}

#[test]
fn test_generate_many_fills_small_space() {
    let constraint = Constraint::with_prefix("40063813339".parse().unwrap());
    let mut engine = ConstraintEngine::seeded(5, GeneratorSettings::default());

    let codes = engine.generate_many(&constraint, 10).unwrap();
    let unique: HashSet<Ean13> = codes.iter().copied().collect();
    assert_eq!(unique.len(), 10);
    let expected: HashSet<Ean13> = siblings("40063813339").into_iter().collect();
    assert_eq!(unique, expected);

    assert!(matches!(
        engine.generate_many(&constraint, 11),
        Err(CodecError::Exhausted { .. })
    ));
}

#[test]
fn test_concurrent_generators_claim_disjoint_codes() {
    let shared = SharedExclusions::default();
    let prefix: Prefix = "4006381333".parse().unwrap();

    std::thread::scope(|scope| {
        for seed in 0..4u64 {
            let shared = &shared;
            let prefix = prefix.clone();
            scope.spawn(move || {
                let mut engine = ConstraintEngine::seeded(seed, GeneratorSettings::default());
                let mut claimed = 0;
                while claimed < 25 {
                    let code = engine
                        .generate(&Constraint::new(prefix.clone(), shared))
                        .unwrap();
                    if shared.claim(code) {
                        claimed += 1;
                    }
                }
            });
        }
    });

    assert_eq!(shared.len(), 100);
}
