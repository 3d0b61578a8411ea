use anyhow::{Context, Result, bail};
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 10_000;
const ITERATION_STRIDE: u64 = 0x9E37_79B9;

/// Resolve CLI seed tokens into a deduplicated, order-preserving seed list.
///
/// Accepts literal integers (negative values use their magnitude) and
/// inclusive ranges written `start..end`. An empty list falls back to the
/// default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            pending.extend(parse_range(start, end).with_context(|| format!("bad seed range: {token}"))?);
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(value);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    pending.retain(|seed| seen.insert(*seed));

    if pending.is_empty() {
        pending.push(DEFAULT_SEED);
    }

    Ok(pending)
}

fn parse_range(start: &str, end: &str) -> Result<Vec<u64>> {
    let start: u64 = start.trim().parse().context("range start")?;
    let end: u64 = end.trim().parse().context("range end")?;
    if end < start {
        bail!("range end {end} is before start {start}");
    }
    if end - start >= MAX_RANGE_LEN {
        bail!("range spans more than {MAX_RANGE_LEN} seeds");
    }
    Ok((start..=end).collect())
}

/// Seed for the `iteration`-th replay of `seed`.
#[must_use]
pub fn iteration_seed(seed: u64, iteration: usize) -> u64 {
    let step = u64::try_from(iteration).unwrap_or(u64::MAX);
    seed.wrapping_add(step.wrapping_mul(ITERATION_STRIDE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numbers_and_ranges() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "3..5", "4"])).unwrap();
        assert_eq!(seeds, vec![42, 7, 3, 4, 5]);
    }

    #[test]
    fn empty_input_uses_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
        assert_eq!(resolve_seed_inputs(&tokens(&["", " "])).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["9..2"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0..20000"])).is_err());
    }

    #[test]
    fn iterations_get_distinct_seeds() {
        assert_eq!(iteration_seed(10, 0), 10);
        assert_eq!(iteration_seed(10, 1), 10 + ITERATION_STRIDE);
        assert_ne!(iteration_seed(10, 1), iteration_seed(10, 2));
    }

    #[test]
    fn iteration_seeds_wrap_instead_of_overflowing() {
        assert_eq!(iteration_seed(u64::MAX, 1), ITERATION_STRIDE - 1);
        assert_eq!(iteration_seed(0, 3), ITERATION_STRIDE * 3);
    }
}
