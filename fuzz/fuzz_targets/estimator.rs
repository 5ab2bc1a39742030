#![no_main]

use hll_estimator::Config;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // first byte picks accuracy in (0, 100), rest is split into elements
    let accuracy = (f64::from(data[0]) + 1.0) * 99.0 / 257.0;
    let mut estimator = Config::default()
        .accuracy(accuracy)
        .seed(wyhash(data, 0))
        .build()
        .unwrap();
    let bound = 64 - estimator.index_bits();

    let mut previous = estimator.estimate();
    for chunk in data[1..].chunks(4) {
        estimator.observe(chunk).unwrap();
        assert!(estimator.registers().iter().all(|&r| u32::from(r) <= bound));
        let estimate = estimator.estimate();
        assert!(estimate >= previous);
        assert_eq!(estimator.estimate(), estimate);
        previous = estimate;
    }
    assert!(estimator.size_of() >= estimator.register_count());
});
