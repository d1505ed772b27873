use crate::{
    balancer::{
        pool_info::ParsedPoolInfo,
        scaling_helper::{downscale_down, downscale_up, upscale},
        snapshot::{InvariantFamily, PoolType},
        stable_math, weighted_math,
    },
    errors::{PoolScaleError, Result},
    math::fixed_point::FixedPoint,
};
use alloy_primitives::U256;
use std::fmt::Debug;

/// Subtracts swap fee from an amount.
pub fn subtract_swap_fee_amount(amount: U256, fee_percentage: U256, precision: FixedPoint) -> Result<U256> {
    let fee_amount = precision.mul_up(amount, fee_percentage)?;
    Ok(amount.saturating_sub(fee_amount))
}

/// Grosses an amount up so that it still covers `amount` once the fee is taken.
pub fn add_swap_fee_amount(amount: U256, fee_percentage: U256, precision: FixedPoint) -> Result<U256> {
    precision.div_up(amount, precision.complement(fee_percentage))
}

fn check_pair(pool: &ParsedPoolInfo, token_in: usize, token_out: usize) -> Result<()> {
    for index in [token_in, token_out] {
        if index >= pool.len() {
            return Err(PoolScaleError::InvalidTokenIndex { index, len: pool.len() });
        }
    }
    if token_in == token_out {
        return Err(PoolScaleError::CalculationError("cannot swap a token for itself".into()));
    }
    Ok(())
}

/// Invariant math of one pool family, evaluated against a parsed pool.
///
/// `on_swap_*` work on upscaled amounts. The provided `calc_*` and
/// `proportional_*` methods take and return raw token amounts and apply the
/// vault's fee and scaling steps around them, rounding against the user.
pub trait PoolMath: Debug + Send + Sync {
    fn calculate_invariant(&self, pool: &ParsedPoolInfo) -> Result<U256>;

    fn on_swap_given_in(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_in: U256,
    ) -> Result<U256>;

    fn on_swap_given_out(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_out: U256,
    ) -> Result<U256>;

    /// Amount of `token_out` received for exactly `amount_in` of `token_in`.
    fn calc_out_given_in(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_in: U256,
    ) -> Result<U256> {
        check_pair(pool, token_in, token_out)?;
        let precision = pool.fixed_point()?;
        let amount_in = subtract_swap_fee_amount(amount_in, pool.swap_fee, precision)?;
        let amount_in = upscale(amount_in, pool.scaling_factors[token_in], precision)?;
        let amount_out = self.on_swap_given_in(pool, token_in, token_out, amount_in)?;
        tracing::trace!(token_in, token_out, %amount_in, %amount_out, "Swap given in");
        downscale_down(amount_out, pool.scaling_factors[token_out], precision)
    }

    /// Amount of `token_in` required to receive exactly `amount_out` of `token_out`.
    fn calc_in_given_out(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_out: U256,
    ) -> Result<U256> {
        check_pair(pool, token_in, token_out)?;
        let precision = pool.fixed_point()?;
        let amount_out = upscale(amount_out, pool.scaling_factors[token_out], precision)?;
        let amount_in = self.on_swap_given_out(pool, token_in, token_out, amount_out)?;
        tracing::trace!(token_in, token_out, %amount_in, %amount_out, "Swap given out");
        let amount_in = downscale_up(amount_in, pool.scaling_factors[token_in], precision)?;
        add_swap_fee_amount(amount_in, pool.swap_fee, precision)
    }

    /// Raw token amounts returned for burning `bpt_in`, one per non-BPT token.
    fn proportional_amounts_out(&self, pool: &ParsedPoolInfo, bpt_in: U256) -> Result<Vec<U256>> {
        if bpt_in > pool.total_shares {
            return Err(PoolScaleError::CalculationError("BPT in exceeds total supply".into()));
        }
        let precision = pool.fixed_point()?;
        let bpt_ratio = precision.div_down(bpt_in, pool.total_shares)?;
        let columns = &pool.without_bpt;
        columns
            .upscaled_balances
            .iter()
            .zip(&columns.scaling_factors)
            .map(|(&balance, &factor)| downscale_down(precision.mul_down(balance, bpt_ratio)?, factor, precision))
            .collect()
    }

    /// Raw token amounts required to mint `bpt_out`, one per non-BPT token.
    fn proportional_amounts_in(&self, pool: &ParsedPoolInfo, bpt_out: U256) -> Result<Vec<U256>> {
        let precision = pool.fixed_point()?;
        let bpt_ratio = precision.div_up(bpt_out, pool.total_shares)?;
        let columns = &pool.without_bpt;
        columns
            .upscaled_balances
            .iter()
            .zip(&columns.scaling_factors)
            .map(|(&balance, &factor)| downscale_up(precision.mul_up(balance, bpt_ratio)?, factor, precision))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedMath;

impl PoolMath for WeightedMath {
    fn calculate_invariant(&self, pool: &ParsedPoolInfo) -> Result<U256> {
        weighted_math::calculate_invariant(&pool.weights, &pool.upscaled_balances, pool.fixed_point()?)
    }

    fn on_swap_given_in(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_in: U256,
    ) -> Result<U256> {
        weighted_math::calc_out_given_in(
            pool.upscaled_balances[token_in],
            pool.weights[token_in],
            pool.upscaled_balances[token_out],
            pool.weights[token_out],
            amount_in,
            pool.fixed_point()?,
        )
    }

    fn on_swap_given_out(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_out: U256,
    ) -> Result<U256> {
        weighted_math::calc_in_given_out(
            pool.upscaled_balances[token_in],
            pool.weights[token_in],
            pool.upscaled_balances[token_out],
            pool.weights[token_out],
            amount_out,
            pool.fixed_point()?,
        )
    }
}

/// StableSwap math. Operates on the BPT-free columns, so composable pools
/// that hold their own token are handled; the BPT itself cannot be swapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StableMath;

impl StableMath {
    fn amp(pool: &ParsedPoolInfo) -> Result<U256> {
        pool.amp.ok_or(PoolScaleError::MissingAmplification)
    }
}

impl PoolMath for StableMath {
    fn calculate_invariant(&self, pool: &ParsedPoolInfo) -> Result<U256> {
        stable_math::calculate_invariant(Self::amp(pool)?, pool.amp_fixed_point()?, &pool.without_bpt.upscaled_balances)
    }

    fn on_swap_given_in(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_in: U256,
    ) -> Result<U256> {
        let amp = Self::amp(pool)?;
        let amp_precision = pool.amp_fixed_point()?;
        let balances = &pool.without_bpt.upscaled_balances;
        let invariant = stable_math::calculate_invariant(amp, amp_precision, balances)?;
        stable_math::calc_out_given_in(
            amp,
            amp_precision,
            balances,
            pool.index_without_bpt(token_in)?,
            pool.index_without_bpt(token_out)?,
            amount_in,
            invariant,
        )
    }

    fn on_swap_given_out(
        &self,
        pool: &ParsedPoolInfo,
        token_in: usize,
        token_out: usize,
        amount_out: U256,
    ) -> Result<U256> {
        let amp = Self::amp(pool)?;
        let amp_precision = pool.amp_fixed_point()?;
        let balances = &pool.without_bpt.upscaled_balances;
        let invariant = stable_math::calculate_invariant(amp, amp_precision, balances)?;
        stable_math::calc_in_given_out(
            amp,
            amp_precision,
            balances,
            pool.index_without_bpt(token_in)?,
            pool.index_without_bpt(token_out)?,
            amount_out,
            invariant,
        )
    }
}

static WEIGHTED_MATH: WeightedMath = WeightedMath;
static STABLE_MATH: StableMath = StableMath;

/// Returns the math implementation for a pool type.
pub fn math_for(pool_type: &PoolType) -> Result<&'static dyn PoolMath> {
    match pool_type.family() {
        Some(InvariantFamily::Weighted) => Ok(&WEIGHTED_MATH),
        Some(InvariantFamily::Stable) => Ok(&STABLE_MATH),
        None => Err(PoolScaleError::UnsupportedPoolType(format!("{pool_type:?}"))),
    }
}
