use hll_estimator::{BuiltinHash, Config, Estimator, HashFunction, WyHash64};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

/// Average estimate over `runs` estimators, each fed `n` random 16-byte elements.
fn average_estimate<H: HashFunction>(
    runs: u64,
    n: usize,
    create: impl Fn() -> Estimator<H>,
) -> f64 {
    let mut total = 0.0;
    for run in 0..runs {
        let mut rng = StdRng::seed_from_u64(run);
        let mut estimator = create();
        for _ in 0..n {
            let element: [u8; 16] = rng.gen();
            estimator.observe(&element).unwrap();
        }
        total += estimator.estimate() as f64;
    }
    total / runs as f64
}

fn nominal_error(estimator: &Estimator<impl HashFunction>) -> f64 {
    1.04 / (estimator.register_count() as f64).sqrt()
}

#[test_case(70.0 ; "accuracy 70")]
#[test_case(90.0 ; "accuracy 90")]
#[test_case(97.0 ; "accuracy 97")]
fn test_fnv1a_accuracy(accuracy: f64) {
    let n = 100_000;
    let create = || Estimator::with_accuracy(accuracy).unwrap();
    let bound = 2.0 * nominal_error(&create());
    let avg = average_estimate(16, n, create);
    let relative_error = (avg - n as f64).abs() / n as f64;
    assert!(relative_error < bound, "avg = {avg}, bound = {bound}");
}

/// Key shapes seen in practice: counters and short formatted identifiers.
#[derive(Clone, Copy, Debug)]
enum Keys {
    Sequential,
    UserId,
}

impl Keys {
    fn key(self, i: u64) -> Vec<u8> {
        match self {
            Keys::Sequential => i.to_le_bytes().to_vec(),
            Keys::UserId => format!("user-{i}").into_bytes(),
        }
    }
}

/// Average estimate of the default configuration fed `n` structured keys: one
/// unsalted estimator plus `runs - 1` salted ones.
fn average_structured_estimate(accuracy: f64, keys: Keys, runs: u64, n: u64) -> f64 {
    let mut total = 0.0;
    for run in 0..runs {
        let mut estimator = if run == 0 {
            Estimator::with_accuracy(accuracy).unwrap()
        } else {
            Config::default()
                .accuracy(accuracy)
                .seed(run)
                .build()
                .unwrap()
        };
        for i in 0..n {
            estimator.observe(&keys.key(i)).unwrap();
        }
        total += estimator.estimate() as f64;
    }
    total / runs as f64
}

#[test_case(70.0, Keys::Sequential ; "sequential accuracy 70")]
#[test_case(90.0, Keys::Sequential ; "sequential accuracy 90")]
#[test_case(97.0, Keys::Sequential ; "sequential accuracy 97")]
#[test_case(70.0, Keys::UserId ; "user id accuracy 70")]
#[test_case(90.0, Keys::UserId ; "user id accuracy 90")]
#[test_case(97.0, Keys::UserId ; "user id accuracy 97")]
fn test_default_hash_structured_keys(accuracy: f64, keys: Keys) {
    let n = 100_000;
    let bound = 2.0 * nominal_error(&Estimator::with_accuracy(accuracy).unwrap());
    let avg = average_structured_estimate(accuracy, keys, 16, n);
    let relative_error = (avg - n as f64).abs() / n as f64;
    assert!(
        relative_error < bound,
        "keys = {keys:?}, avg = {avg}, bound = {bound}"
    );
}

#[test]
fn test_wyhash_accuracy() {
    let n = 100_000;
    let create = || {
        Config::default()
            .hash_function(WyHash64::default())
            .build()
            .unwrap()
    };
    let bound = 2.0 * nominal_error(&create());
    let avg = average_estimate(16, n, create);
    let relative_error = (avg - n as f64).abs() / n as f64;
    assert!(relative_error < bound, "avg = {avg}, bound = {bound}");
}

#[test]
fn test_seeded_accuracy() {
    let n = 50_000;
    let mut total = 0.0;
    let runs = 16;
    for seed in 0..runs {
        let mut estimator = Config::default()
            .accuracy(95.0)
            .hash_function(BuiltinHash::from(WyHash64::default()))
            .seed(seed)
            .build()
            .unwrap();
        for i in 0..n as u64 {
            estimator.observe(&i.to_le_bytes()).unwrap();
        }
        total += estimator.estimate() as f64;
    }
    let avg = total / runs as f64;
    let relative_error = (avg - n as f64).abs() / n as f64;
    assert!(relative_error < 2.0 * 1.04 / 512f64.sqrt(), "avg = {avg}");
}

#[test]
fn test_duplicates_do_not_inflate_estimate() {
    let mut once = Estimator::with_accuracy(95.0).unwrap();
    let mut repeated = Estimator::with_accuracy(95.0).unwrap();
    for i in 0u32..10_000 {
        once.observe(&i.to_le_bytes()).unwrap();
        for _ in 0..5 {
            repeated.observe(&i.to_le_bytes()).unwrap();
        }
    }
    assert_eq!(once.registers(), repeated.registers());
    assert_eq!(once.estimate(), repeated.estimate());
}

#[test]
fn test_estimate_grows_with_cardinality() {
    let mut estimator = Estimator::with_accuracy(99.0).unwrap();
    let mut previous = estimator.estimate();
    for chunk in 0u32..10 {
        for i in chunk * 10_000..(chunk + 1) * 10_000 {
            estimator.observe(&i.to_le_bytes()).unwrap();
        }
        let estimate = estimator.estimate();
        assert!(estimate >= previous);
        previous = estimate;
    }
}
