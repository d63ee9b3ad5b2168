use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

/// A deterministic generator, so that test failures and benchmark runs can be reproduced.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

/// Returns a random permutation of `0..n`.
#[inline(never)]
pub fn make_permutation(n: usize, rng: &mut XorShiftRng) -> Vec<usize> {
    let mut pool: Vec<_> = (0..n).collect();
    let mut perm = Vec::with_capacity(n);

    for i in 0..n {
        let k = rng.gen_range(0..n - i);
        perm.push(pool.swap_remove(k));
    }

    perm
}
