use rand::Rng;

// Bootstrap resampling of the historical weekly completion counts. Each
// trial draws with replacement from the trailing window until the backlog is
// cleared; the returned array is a sample of the delivery-time distribution,
// not a closed-form estimate. Callers inject the random source, so
// production runs stay unseeded while tests pin a seed.
pub struct MonteCarloSimulator;

impl MonteCarloSimulator {
    pub fn run(
        weekly_counts: &[u32],
        window: usize,
        remaining_tickets: u32,
        n_simulations: usize,
        rng: &mut impl Rng,
    ) -> crate::model::Result<Vec<u32>> {
        let pool = &weekly_counts[weekly_counts.len().saturating_sub(window)..];
        if pool.is_empty() {
            return Err("cannot forecast: no historical throughput".into());
        }
        // An all-zero pool would never clear the backlog; fail instead of
        // spinning forever.
        if pool.iter().all(|count| *count == 0) {
            return Err("cannot forecast: zero historical throughput".into());
        }

        let mut weeks_to_complete = Vec::with_capacity(n_simulations);
        for _ in 0..n_simulations {
            let mut remaining = remaining_tickets as i64;
            let mut weeks = 0u32;
            while remaining > 0 {
                let sampled = pool[rng.random_range(0..pool.len())];
                remaining -= sampled as i64;
                weeks += 1;
            }
            weeks_to_complete.push(weeks);
        }
        Ok(weeks_to_complete)
    }
}
