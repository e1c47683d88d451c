//! End-to-end staking scenario against a 1%-taxed reward token.
//!
//! Funds the pool with `gross = ceil(net * 10000 / 9900)`, declares a
//! one-week reward period, stakes through it, and verifies the claimed
//! amounts on the token ledger itself: the staker lands the full net
//! budget and the collector lands exactly the transfer tax.

use anyhow::Result;
use tollgate_rewards::{PoolConfig, RewardError, RewardPool};
use tollgate_token::{InMemoryTaxToken, TokenLedger};
use tollgate_types::{AccountId, TaxParams, REWARD_PRECISION};

const WEEK: u64 = 7 * 86_400;
const UNIT: u128 = REWARD_PRECISION;
const TAX_BPS: u16 = 100;

fn account(seed: u8) -> AccountId {
    let mut id = [0u8; 32];
    id[0] = seed;
    id
}

struct Harness {
    pool: RewardPool,
    reward_token: InMemoryTaxToken,
    stake_token: InMemoryTaxToken,
    admin: AccountId,
    alice: AccountId,
    collector: AccountId,
}

fn harness(net_budget: u128) -> Result<Harness> {
    let admin = account(1);
    let alice = account(2);
    let collector = account(9);
    let tax = TaxParams::new(TAX_BPS)?;

    let pool = RewardPool::new("staking", PoolConfig::new(admin, tax)?)?;

    // The reward token taxes every transfer; the deployer is exempt so the
    // pool can be seeded with its full gross balance.
    let mut reward_token = InMemoryTaxToken::new(1_000_000_000 * UNIT, admin, collector, tax)?;
    reward_token.set_tax_exempt(admin);

    let mut stake_token = InMemoryTaxToken::untaxed(1_000_000 * UNIT, admin);
    stake_token.transfer(&admin, &alice, 10_000 * UNIT)?;

    let gross = pool.required_gross_funding(net_budget)?;
    pool.fund_gross(&admin, gross, &mut reward_token)?;
    pool.notify_reward_amount(&admin, net_budget, WEEK, 0, &reward_token)?;

    Ok(Harness {
        pool,
        reward_token,
        stake_token,
        admin,
        alice,
        collector,
    })
}

#[test]
fn staker_receives_net_and_collector_receives_tax() -> Result<()> {
    let net_budget = 5_000 * UNIT;
    let mut h = harness(net_budget)?;

    h.pool
        .stake(&h.alice, 1_000 * UNIT, 0, &mut h.stake_token)?;

    // Full week passes; entitlement approaches the declared budget.
    let earned = h.pool.earned(&h.alice, WEEK)?;
    assert!(earned <= net_budget);
    assert!(net_budget - earned < 100_000); // precision dust only

    let gross = h.pool.required_gross_funding(earned)?;
    let alice_before = h.reward_token.balance_of(&h.alice);
    let collector_before = h.reward_token.balance_of(&h.collector);

    let paid = h.pool.get_reward(&h.alice, WEEK, &mut h.reward_token)?;
    assert_eq!(paid, earned);

    let alice_received = h.reward_token.balance_of(&h.alice) - alice_before;
    let collector_received = h.reward_token.balance_of(&h.collector) - collector_before;

    // Tax conservation on the ledger: recipient + collector == gross.
    assert_eq!(alice_received + collector_received, gross);
    // The collector lands exactly floor(gross * tax / 10000).
    let tax = TaxParams::new(TAX_BPS)?;
    assert_eq!(collector_received, tax.tax_on_gross(gross));
    // The staker never lands short of the entitlement.
    assert!(alice_received >= earned);
    assert!(alice_received - earned <= 1);

    Ok(())
}

#[test]
fn one_staker_full_week_claims_declared_budget() -> Result<()> {
    // fund gross = ceil(1000e18 * 10000 / 9900), notify 1000e18 over a
    // week, stake 1000e18 for the full duration.
    let net_budget = 1_000 * UNIT;
    let mut h = harness(net_budget)?;

    let expected_gross = (net_budget * 10_000).div_ceil(9_900);
    assert_eq!(
        h.reward_token.balance_of(&h.pool.account()),
        expected_gross
    );

    h.pool
        .stake(&h.alice, 1_000 * UNIT, 0, &mut h.stake_token)?;

    let earned = h.pool.earned(&h.alice, WEEK)?;
    assert!(net_budget - earned < 10_000);

    let collector_before = h.reward_token.balance_of(&h.collector);
    let paid = h.pool.get_reward(&h.alice, WEEK, &mut h.reward_token)?;
    assert_eq!(paid, earned);

    let claim_gross = h.pool.required_gross_funding(earned)?;
    let tax = TaxParams::new(TAX_BPS)?;
    assert_eq!(
        h.reward_token.balance_of(&h.collector) - collector_before,
        tax.tax_on_gross(claim_gross)
    );
    Ok(())
}

#[test]
fn late_staker_accrues_only_from_entry() -> Result<()> {
    let net_budget = 7_000 * UNIT;
    let mut h = harness(net_budget)?;

    // Nobody staked for the first day: that day's rewards accrue to no one.
    h.pool
        .stake(&h.alice, 1_000 * UNIT, 86_400, &mut h.stake_token)?;

    let earned = h.pool.earned(&h.alice, WEEK)?;
    let six_days = 6_000 * UNIT;
    assert!(earned <= six_days);
    assert!(six_days - earned < 100_000);
    Ok(())
}

#[test]
fn claim_against_drained_pool_is_rolled_back() -> Result<()> {
    let net_budget = 5_000 * UNIT;
    let mut h = harness(net_budget)?;

    h.pool
        .stake(&h.alice, 1_000 * UNIT, 0, &mut h.stake_token)?;

    // Drain custody out from under the pool to model an external shortfall.
    let custody = h.pool.account();
    let balance = h.reward_token.balance_of(&custody);
    h.reward_token.transfer(&custody, &h.admin, balance)?;

    let entitlement = h.pool.earned(&h.alice, WEEK)?;
    let err = h
        .pool
        .get_reward(&h.alice, WEEK, &mut h.reward_token)
        .unwrap_err();
    assert!(matches!(
        err,
        RewardError::InsufficientRewardPool { available: 0, .. }
    ));

    // No partial payment, no lost entitlement.
    assert_eq!(h.pool.earned(&h.alice, WEEK)?, entitlement);
    assert_eq!(h.pool.statistics().total_net_paid, 0);
    Ok(())
}

#[test]
fn pool_config_snapshots_for_operators() -> Result<()> {
    let h = harness(1_000 * UNIT)?;

    // Operators persist pool configuration as JSON; make sure the snapshot
    // carries the tax rate and survives a round trip.
    let json = serde_json::to_string(h.pool.config())?;
    let restored: PoolConfig = serde_json::from_str(&json)?;
    assert_eq!(&restored, h.pool.config());
    assert_eq!(restored.tax.tax_bps, TAX_BPS);
    Ok(())
}
