use hll_estimator::{Config, Estimator, WyHash64};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut estimator1 = Estimator::with_accuracy(95.0)?;
    for i in 0u32..10_000 {
        estimator1.observe(&i.to_le_bytes())?;
    }
    println!("estimator1 = {:?}", estimator1);

    let mut estimator2 = Config::default()
        .accuracy(99.0)
        .hash_function(WyHash64::default())
        .seed(42)
        .build()?;
    for word in "the quick brown fox jumps over the lazy dog the end".split(' ') {
        estimator2.observe(word.as_bytes())?;
    }
    println!("estimator2 = {:?}", estimator2);

    match Estimator::with_accuracy(100.0) {
        Ok(_) => unreachable!(),
        Err(err) => println!("accuracy 100 rejected: {}", err),
    }
    Ok(())
}
