//! Cookie Bakery economy rules as pure functions over `CookieState`.

use thiserror::Error;

use super::state::{CookieState, Generator, Upgrade};

/// Each owned unit makes the next one 15% more expensive.
pub const COST_GROWTH: f64 = 1.15;

/// Offline gaps shorter than this are not worth a catch-up credit.
pub const CATCH_UP_THRESHOLD_MS: f64 = 1_000.0;

/// Why a purchase did not go through. State is untouched in every case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("no upgrade with id `{0}`")]
    UnknownUpgrade(String),
    #[error("no generator with id `{0}`")]
    UnknownGenerator(String),
    #[error("upgrade `{0}` is already purchased")]
    AlreadyPurchased(String),
    #[error("costs {cost} cookies but only {available:.1} available")]
    Unaffordable { cost: u64, available: f64 },
    #[error("generator `{0}` has reached its ownership limit")]
    LimitReached(String),
}

/// Price of the next unit: `floor(base_cost × 1.15^owned)`.
///
/// Always recomputed from the current `owned`; purchases debit exactly this.
/// Prices beyond `u64::MAX` saturate there.
pub fn generator_cost(generator: &Generator) -> u64 {
    (generator.base_cost * COST_GROWTH.powf(generator.owned as f64)).floor() as u64
}

/// Cookies per second from all owned units of one generator.
pub fn generator_output(generator: &Generator) -> f64 {
    generator.unit_yield * generator.owned as f64
}

/// Credit cookies. This is the only way the balance goes up.
///
/// Negative and non-finite amounts are ignored so that
/// `cookies_all_time` never decreases.
pub fn add_currency(state: &mut CookieState, amount: f64) {
    if !amount.is_finite() || amount <= 0.0 {
        return;
    }
    state.cookies += amount;
    state.cookies_all_time += amount;
}

/// Manual click.
pub fn click(state: &mut CookieState) {
    let power = state.cookies_per_click;
    add_currency(state, power);
}

/// Buy a one-time upgrade by id.
pub fn purchase_upgrade(state: &mut CookieState, id: &str) -> Result<(), PurchaseError> {
    let idx = state
        .upgrade_index(id)
        .ok_or_else(|| PurchaseError::UnknownUpgrade(id.to_string()))?;

    let upgrade = &state.upgrades[idx];
    if upgrade.purchased {
        return Err(PurchaseError::AlreadyPurchased(id.to_string()));
    }
    let cost = upgrade.cost;
    if state.cookies < cost as f64 {
        return Err(PurchaseError::Unaffordable {
            cost,
            available: state.cookies,
        });
    }

    let multiplier = upgrade.multiplier;
    state.cookies -= cost as f64;
    state.cookies_per_click *= multiplier;
    state.upgrades[idx].purchased = true;
    Ok(())
}

/// Buy one unit of a generator by id. Returns the price paid.
pub fn purchase_generator(state: &mut CookieState, id: &str) -> Result<u64, PurchaseError> {
    let idx = state
        .generator_index(id)
        .ok_or_else(|| PurchaseError::UnknownGenerator(id.to_string()))?;

    let cost = generator_cost(&state.generators[idx]);
    if state.cookies < cost as f64 {
        return Err(PurchaseError::Unaffordable {
            cost,
            available: state.cookies,
        });
    }
    let owned = state.generators[idx]
        .owned
        .checked_add(1)
        .ok_or_else(|| PurchaseError::LimitReached(id.to_string()))?;

    state.cookies -= cost as f64;
    state.generators[idx].owned = owned;
    recompute_cps(state);
    Ok(cost)
}

/// Full recompute of passive production from the catalog.
pub fn recompute_cps(state: &mut CookieState) {
    state.cookies_per_second = state.generators.iter().map(generator_output).sum();
}

/// Credit passive production for `seconds` of elapsed time.
pub fn produce(state: &mut CookieState, seconds: f64) {
    if state.cookies_per_second <= 0.0 || seconds <= 0.0 {
        return;
    }
    let amount = state.cookies_per_second * seconds;
    add_currency(state, amount);
}

/// Credit production that accrued while the game was closed.
///
/// Uses the gap between `now_ms` and the last save. Returns the amount
/// credited (0 when the gap is under the threshold or nothing produces).
pub fn apply_idle_catch_up(state: &mut CookieState, now_ms: f64) -> f64 {
    let elapsed_ms = now_ms - state.last_saved_ms;
    if elapsed_ms <= CATCH_UP_THRESHOLD_MS || state.cookies_per_second <= 0.0 {
        return 0.0;
    }
    let earned = state.cookies_per_second * elapsed_ms / 1000.0;
    add_currency(state, earned);
    earned
}

pub fn can_afford_generator(state: &CookieState, generator: &Generator) -> bool {
    state.cookies >= generator_cost(generator) as f64
}

pub fn can_afford_upgrade(state: &CookieState, upgrade: &Upgrade) -> bool {
    !upgrade.purchased && state.cookies >= upgrade.cost as f64
}

/// Upgrades still in the shop, in catalog order.
pub fn available_upgrades(state: &CookieState) -> Vec<&Upgrade> {
    state.upgrades.iter().filter(|u| !u.purchased).collect()
}

pub fn cookies_per_minute(state: &CookieState) -> f64 {
    state.cookies_per_second * 60.0
}

/// Seconds of passive production until `cost` is affordable.
/// `None` if nothing is being produced and the balance is short.
pub fn seconds_until_affordable(state: &CookieState, cost: f64) -> Option<f64> {
    if state.cookies >= cost {
        return Some(0.0);
    }
    if state.cookies_per_second <= 0.0 {
        return None;
    }
    Some((cost - state.cookies) / state.cookies_per_second)
}

/// The cheapest generator the player cannot afford yet, with its price.
pub fn next_goal(state: &CookieState) -> Option<(&Generator, u64)> {
    state
        .generators
        .iter()
        .map(|g| (g, generator_cost(g)))
        .filter(|(_, cost)| state.cookies < *cost as f64)
        .min_by_key(|(_, cost)| *cost)
}

/// Format a number with commas (e.g. 1234567 → "1,234,567").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let tenths_total = (n * 10.0).round() as u64;
    let int_part = tenths_total / 10;
    let tenths = tenths_total % 10;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if tenths > 0 {
        format!("{}.{}", grouped, tenths)
    } else {
        grouped
    }
}

/// Play time as `HH:MM:SS`.
pub fn format_clock(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Human-readable wait, e.g. "12.3 seconds", "4.0 minutes", "1.5 hours".
pub fn format_eta(seconds: Option<f64>) -> String {
    match seconds {
        None => "Never".to_string(),
        Some(s) if s < 60.0 => format!("{:.1} seconds", s),
        Some(s) if s < 3600.0 => format!("{:.1} minutes", s / 60.0),
        Some(s) => format!("{:.1} hours", s / 3600.0),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// A purchase or a credit, replayed against a fresh state.
    #[derive(Clone, Debug)]
    enum Op {
        Credit(f64),
        Click,
        BuyGenerator(usize),
        BuyUpgrade(usize),
        Produce(f64),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0f64..5_000.0).prop_map(Op::Credit),
            Just(Op::Click),
            (0usize..5).prop_map(Op::BuyGenerator),
            (0usize..4).prop_map(Op::BuyUpgrade),
            (0.0f64..30.0).prop_map(Op::Produce),
        ]
    }

    fn apply(state: &mut CookieState, op: &Op) {
        // Index one past the catalog exercises the unknown-id path.
        match op {
            Op::Credit(a) => add_currency(state, *a),
            Op::Click => click(state),
            Op::BuyGenerator(i) => {
                let id = state
                    .generators
                    .get(*i)
                    .map(|g| g.id.clone())
                    .unwrap_or_else(|| "missing".into());
                let _ = purchase_generator(state, &id);
            }
            Op::BuyUpgrade(i) => {
                let id = state
                    .upgrades
                    .get(*i)
                    .map(|u| u.id.clone())
                    .unwrap_or_else(|| "missing".into());
                let _ = purchase_upgrade(state, &id);
            }
            Op::Produce(s) => produce(state, *s),
        }
    }

    proptest! {
        #[test]
        fn prop_add_currency_exact(start in 0.0f64..1e9, amount in 0.0f64..1e9) {
            let mut state = CookieState::new();
            state.cookies = start;
            state.cookies_all_time = start;
            add_currency(&mut state, amount);
            prop_assert_eq!(state.cookies, start + amount);
            prop_assert_eq!(state.cookies_all_time, start + amount);
        }

        #[test]
        fn prop_generator_cost_strictly_increases(idx in 0usize..4, owned in 0u32..200) {
            let mut g = CookieState::new().generators[idx].clone();
            g.owned = owned;
            let before = generator_cost(&g);
            g.owned = owned + 1;
            prop_assert!(generator_cost(&g) > before);
        }

        #[test]
        fn prop_generator_cost_at_zero_is_base(idx in 0usize..4) {
            let g = &CookieState::new().generators[idx];
            prop_assert_eq!(generator_cost(g) as f64, g.base_cost);
        }

        #[test]
        fn prop_purchase_generator_debits_quoted_cost(idx in 0usize..4, owned in 0u32..40, extra in 0.0f64..1_000.0) {
            let mut state = CookieState::new();
            state.generators[idx].owned = owned;
            let quoted = generator_cost(&state.generators[idx]);
            state.cookies = quoted as f64 + extra;
            let id = state.generators[idx].id.clone();
            prop_assert_eq!(purchase_generator(&mut state, &id), Ok(quoted));
            prop_assert!((state.cookies - extra).abs() < 1e-6);
            prop_assert_eq!(state.generators[idx].owned, owned + 1);
        }

        #[test]
        fn prop_upgrade_idempotent_after_success(idx in 0usize..3, extra in 0.0f64..10_000.0) {
            let mut state = CookieState::new();
            let id = state.upgrades[idx].id.clone();
            state.cookies = state.upgrades[idx].cost as f64 + extra;
            prop_assert!(purchase_upgrade(&mut state, &id).is_ok());
            let after_first = state.clone();
            prop_assert!(purchase_upgrade(&mut state, &id).is_err());
            prop_assert_eq!(state, after_first);
        }

        #[test]
        fn prop_any_sequence_keeps_invariants(ops in proptest::collection::vec(arb_op(), 0..200)) {
            let mut state = CookieState::new();
            let mut owned_before: Vec<u32> = state.generators.iter().map(|g| g.owned).collect();
            let mut all_time_before = state.cookies_all_time;
            for op in &ops {
                apply(&mut state, op);
                prop_assert!(state.cookies >= 0.0, "cookies went negative after {:?}", op);
                prop_assert!(state.cookies_all_time >= all_time_before);
                all_time_before = state.cookies_all_time;

                let owned_now: Vec<u32> = state.generators.iter().map(|g| g.owned).collect();
                for (a, b) in owned_before.iter().zip(&owned_now) {
                    prop_assert!(b >= a);
                }
                owned_before = owned_now;

                let expected: f64 = state.generators.iter().map(generator_output).sum();
                prop_assert_eq!(state.cookies_per_second, expected);
            }
        }

        #[test]
        fn prop_format_number_digits_preserved(int_val in 0u64..1_000_000_000) {
            let s = format_number(int_val as f64);
            let stripped: String = s.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, int_val.to_string());
        }
    }
}
