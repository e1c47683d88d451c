//! Liquidity-mining scenario: the same reward engine with an LP token
//! staked instead of the reward token. Two providers split a weekly budget
//! proportionally to their LP share.

use anyhow::Result;
use tollgate_rewards::{PoolConfig, RewardPool};
use tollgate_token::{InMemoryTaxToken, TokenLedger};
use tollgate_types::{AccountId, TaxParams, REWARD_PRECISION};

const WEEK: u64 = 7 * 86_400;
const UNIT: u128 = REWARD_PRECISION;

fn account(seed: u8) -> AccountId {
    let mut id = [0u8; 32];
    id[0] = seed;
    id
}

#[test]
fn lp_providers_split_rewards_proportionally() -> Result<()> {
    let admin = account(1);
    let alice = account(2);
    let bob = account(3);
    let collector = account(9);
    let tax = TaxParams::new(100)?;

    let pool = RewardPool::new("liquidity-mining", PoolConfig::new(admin, tax)?)?;

    let mut reward_token = InMemoryTaxToken::new(1_000_000_000 * UNIT, admin, collector, tax)?;
    reward_token.set_tax_exempt(admin);

    // LP token: plain, untaxed.
    let mut lp_token = InMemoryTaxToken::untaxed(1_000_000 * UNIT, admin);
    lp_token.transfer(&admin, &alice, 750 * UNIT)?;
    lp_token.transfer(&admin, &bob, 250 * UNIT)?;

    let net_budget = 4_000 * UNIT;
    let gross = pool.required_gross_funding(net_budget)?;
    pool.fund_gross(&admin, gross, &mut reward_token)?;
    pool.notify_reward_amount(&admin, net_budget, WEEK, 0, &reward_token)?;

    pool.stake(&alice, 750 * UNIT, 0, &mut lp_token)?;
    pool.stake(&bob, 250 * UNIT, 0, &mut lp_token)?;
    assert_eq!(pool.total_staked(), 1_000 * UNIT);

    let alice_earned = pool.earned(&alice, WEEK)?;
    let bob_earned = pool.earned(&bob, WEEK)?;

    // Proportional split, and rounding never over-pays the budget.
    assert!(alice_earned + bob_earned <= net_budget);
    assert!(net_budget - (alice_earned + bob_earned) < 100_000);
    assert!(alice_earned >= 3 * bob_earned);
    assert!(alice_earned - 3 * bob_earned < 100_000);

    // Both exit: LP comes back untaxed, rewards arrive net of tax.
    let (alice_lp, alice_net) = pool.exit(&alice, WEEK, &mut lp_token, &mut reward_token)?;
    let (bob_lp, bob_net) = pool.exit(&bob, WEEK, &mut lp_token, &mut reward_token)?;

    assert_eq!(alice_lp, 750 * UNIT);
    assert_eq!(bob_lp, 250 * UNIT);
    assert_eq!(alice_net, alice_earned);
    assert_eq!(bob_net, bob_earned);
    assert_eq!(lp_token.balance_of(&alice), 750 * UNIT);
    assert_eq!(lp_token.balance_of(&bob), 250 * UNIT);
    assert_eq!(pool.total_staked(), 0);

    // Conservation across the whole run: everything that left custody went
    // to recipients or the collector.
    let stats = pool.statistics();
    assert_eq!(stats.total_net_paid, alice_net + bob_net);
    assert!(stats.total_gross_paid >= stats.total_net_paid);
    Ok(())
}

#[test]
fn mid_period_withdrawal_stops_accrual_for_withdrawn_share() -> Result<()> {
    let admin = account(1);
    let alice = account(2);
    let bob = account(3);
    let collector = account(9);
    let tax = TaxParams::new(100)?;

    let pool = RewardPool::new("liquidity-mining-mid", PoolConfig::new(admin, tax)?)?;

    let mut reward_token = InMemoryTaxToken::new(1_000_000_000 * UNIT, admin, collector, tax)?;
    reward_token.set_tax_exempt(admin);
    let mut lp_token = InMemoryTaxToken::untaxed(1_000_000 * UNIT, admin);
    lp_token.transfer(&admin, &alice, 500 * UNIT)?;
    lp_token.transfer(&admin, &bob, 500 * UNIT)?;

    let net_budget = 7_000 * UNIT;
    let gross = pool.required_gross_funding(net_budget)?;
    pool.fund_gross(&admin, gross, &mut reward_token)?;
    pool.notify_reward_amount(&admin, net_budget, WEEK, 0, &reward_token)?;

    pool.stake(&alice, 500 * UNIT, 0, &mut lp_token)?;
    pool.stake(&bob, 500 * UNIT, 0, &mut lp_token)?;

    // Bob leaves halfway; from then on alice earns the full rate.
    let halfway = WEEK / 2;
    pool.withdraw(&bob, 500 * UNIT, halfway, &mut lp_token)?;

    let alice_earned = pool.earned(&alice, WEEK)?;
    let bob_earned = pool.earned(&bob, WEEK)?;

    // Alice: half the first half plus all of the second half = 3/4 of the
    // budget. Bob: a quarter.
    let expected_alice = net_budget * 3 / 4;
    let expected_bob = net_budget / 4;
    assert!(alice_earned <= expected_alice);
    assert!(expected_alice - alice_earned < 100_000);
    assert!(bob_earned <= expected_bob);
    assert!(expected_bob - bob_earned < 100_000);
    Ok(())
}
