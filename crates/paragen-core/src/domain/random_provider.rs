//! Process-wide random number facility.
//!
//! A single seedable global source feeds per-thread generators, so that
//! concurrent evaluations never share generator state and a run can be made
//! reproducible with [set_seed]. Provides uniform reals in [0, 1), uniform
//! integers, normal deviates and shuffles.

use rand::distr::{Distribution, StandardUniform, uniform::SampleUniform};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngExt, SeedableRng};
use std::cell::RefCell;
use std::ops::Range;
use std::sync::{Arc, LazyLock, Mutex};

static GLOBAL_RNG: LazyLock<Arc<Mutex<SmallRng>>> =
    LazyLock::new(|| Arc::new(Mutex::new(SmallRng::from_rng(&mut rand::rng()))));

thread_local! {
    static TLS_RNG: RefCell<SmallRng> = RefCell::new({
        let mut global = GLOBAL_RNG.lock().unwrap();
        SmallRng::seed_from_u64(global.next_u64())
    });
}

fn with_rng<R>(f: impl FnOnce(&mut SmallRng) -> R) -> R {
    TLS_RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Seeds the global source and re-seeds the calling thread's generator from
/// it, making subsequent draws on this thread reproducible.
pub fn set_seed(seed: u64) {
    {
        let mut global = GLOBAL_RNG.lock().unwrap();
        *global = SmallRng::seed_from_u64(seed);
    }
    TLS_RNG.with(|cell| {
        let mut global = GLOBAL_RNG.lock().unwrap();
        *cell.borrow_mut() = SmallRng::seed_from_u64(global.next_u64());
    });
}

/// A uniform draw. For floating point types the value lies in [0, 1).
#[inline(always)]
pub fn random<T>() -> T
where
    T: SampleUniform,
    StandardUniform: Distribution<T>,
{
    with_rng(|rng| rng.random())
}

/// A uniform draw from the given range.
pub fn range<T>(range: Range<T>) -> T
where
    T: SampleUniform + PartialOrd,
{
    with_rng(|rng| rng.random_range(range))
}

/// A random boolean that is true with probability `prob`.
#[inline(always)]
pub fn bool(prob: f64) -> bool {
    with_rng(|rng| rng.random_bool(prob.clamp(0.0, 1.0)))
}

/// A normal deviate via the Box-Muller transform.
pub fn gaussian(mean: f64, std_dev: f64) -> f64 {
    with_rng(|rng| {
        let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = rng.random();
        let z0: f64 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z0
    })
}

/// Shuffles the given slice in place.
pub fn shuffle<T>(items: &mut [T]) {
    with_rng(|rng| items.shuffle(rng));
}
