use crate::context::Context;
use log::trace;
use rand::{
    rngs::StdRng,
    seq::SliceRandom,
    Rng,
    RngCore,
    SeedableRng,
};

/// The single stream of randomness for a run. Population initialization, the daily shuffle,
/// movement and infection decisions all draw from the same generator, in that order, so a
/// fixed seed reproduces a whole trajectory.
pub struct RandomSource {
    rng: Box<dyn RngCore>,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        RandomSource {
            rng: Box::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Wraps an arbitrary generator. Mostly useful for forcing specific draws.
    pub fn from_rng<R: RngCore + 'static>(rng: R) -> Self {
        RandomSource { rng: Box::new(rng) }
    }

    /// Resets the generator state deterministically.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Box::new(StdRng::seed_from_u64(seed));
    }

    /// A uniform draw in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// A uniform integer in `[0, bound)`. Panics if `bound` is not positive.
    pub fn next_int(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive, got {bound}");
        self.rng.random_range(0..bound)
    }

    /// Inverse-transform sample from a negative exponential with the given mean, truncated to
    /// an integer: `floor(-mean * ln(1 - u))`.
    pub fn sample_neg_exp(&mut self, mean: f64) -> u32 {
        let u = self.next_uniform();
        (-mean * (1.0 - u).ln()).floor() as u32
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

pub trait ContextRandomExt {
    /// Installs a `RandomSource` seeded with `seed`, replacing (and so resetting) any existing one.
    fn init_random(&mut self, seed: u64);

    /// Installs a `RandomSource` backed by the given generator.
    fn init_random_with<R: RngCore + 'static>(&mut self, rng: R);

    /// Gets the run's random source.
    /// Note that this will panic if `init_random` was not called yet.
    fn random_source(&mut self) -> &mut RandomSource;

    fn sample_uniform(&mut self) -> f64 {
        self.random_source().next_uniform()
    }

    fn sample_int(&mut self, bound: i32) -> i32 {
        self.random_source().next_int(bound)
    }

    fn sample_neg_exp(&mut self, mean: f64) -> u32 {
        self.random_source().sample_neg_exp(mean)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        self.random_source().shuffle(items);
    }
}

impl ContextRandomExt for Context {
    fn init_random(&mut self, seed: u64) {
        trace!("initializing random module with seed {seed}");
        match self.try_get_data_container_mut::<RandomSource>() {
            Some(random_source) => random_source.set_seed(seed),
            None => {
                self.insert_data_container(RandomSource::from_seed(seed));
            }
        }
    }

    fn init_random_with<R: RngCore + 'static>(&mut self, rng: R) {
        self.insert_data_container(RandomSource::from_rng(rng));
    }

    fn random_source(&mut self) -> &mut RandomSource {
        self.try_get_data_container_mut::<RandomSource>()
            .expect("You must initialize the random number generator with a seed")
    }
}

/// A generator whose every uniform draw is the same value. Used to force infection decisions.
#[cfg(test)]
pub(crate) struct FixedUniform(u64);

#[cfg(test)]
impl FixedUniform {
    pub(crate) fn new(draw: f64) -> Self {
        assert!((0.0..1.0).contains(&draw));
        // `f64` sampling keeps the top 53 bits of a `u64`.
        FixedUniform(((draw * (1u64 << 53) as f64) as u64) << 11)
    }
}

#[cfg(test)]
impl RngCore for FixedUniform {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for (byte, source) in dst.iter_mut().zip(self.0.to_le_bytes().iter().cycle()) {
            *byte = *source;
        }
    }
}
