use alloy_primitives::{Address, U256};
use poolscale::{
    Slippage,
    balancer::{
        asset_helpers::{AssetHelpers, TokenColumns},
        scaling_helper::compute_scaling_factor,
    },
    math::{constants::ONE, fixed_point as fp, fixed_point::FixedPoint},
};
use proptest::prelude::*;

fn amount() -> impl Strategy<Value = U256> {
    any::<u128>().prop_map(U256::from)
}

fn nonzero_amount() -> impl Strategy<Value = U256> {
    (1..=u128::MAX).prop_map(U256::from)
}

proptest! {
    #[test]
    fn mul_rounding_brackets_the_exact_product(a in amount(), b in amount()) {
        let down = fp::mul_down(a, b).unwrap();
        let up = fp::mul_up(a, b).unwrap();
        prop_assert!(down <= up);
        prop_assert!(up - down <= U256::from(1));
    }

    #[test]
    fn div_rounding_brackets_the_exact_quotient(a in amount(), b in nonzero_amount()) {
        let down = fp::div_down(a, b).unwrap();
        let up = fp::div_up(a, b).unwrap();
        prop_assert!(down <= up);
        prop_assert!(up - down <= U256::from(1));
    }

    #[test]
    fn div_then_mul_never_exceeds_input(a in amount(), b in nonzero_amount()) {
        let quotient = fp::div_down(a, b).unwrap();
        prop_assert!(fp::mul_down(quotient, b).unwrap() <= a);
    }

    #[test]
    fn div_up_then_mul_up_never_falls_below_input(a in amount(), b in nonzero_amount()) {
        // a * 10^18 / b + 1 times b stays below 2^256 for 128-bit operands
        let quotient = fp::div_up(a, b).unwrap();
        prop_assert!(fp::mul_up(quotient, b).unwrap() >= a);
    }

    #[test]
    fn unit_rate_is_identity(decimals in 0u8..=18) {
        prop_assert_eq!(
            compute_scaling_factor(decimals, Some(ONE), FixedPoint::WAD).unwrap(),
            compute_scaling_factor(decimals, None, FixedPoint::WAD).unwrap()
        );
    }

    #[test]
    fn slippage_bounds_bracket_the_amount(value in amount(), bps in 0u32..=10_000) {
        let slippage = Slippage::BasisPoints(bps);
        let min = slippage.min_amount_out(value).unwrap();
        let max = slippage.max_amount_in(value).unwrap();
        prop_assert!(min <= value);
        prop_assert!(value <= max);
    }

    #[test]
    fn sorting_keeps_columns_aligned(
        seeds in proptest::collection::hash_set(any::<[u8; 20]>(), 1..8)
    ) {
        let tokens: Vec<Address> = seeds.into_iter().map(Address::from).collect();
        // tag every column entry with the token it belongs to
        let tag = |token: &Address| U256::from_be_slice(token.as_slice());
        let columns = TokenColumns {
            decimals: vec![18; tokens.len()],
            scaling_factors: tokens.iter().map(tag).collect(),
            balances: tokens.iter().map(tag).collect(),
            upscaled_balances: tokens.iter().map(tag).collect(),
            weights: tokens.iter().map(tag).collect(),
            price_rates: tokens.iter().map(tag).collect(),
            tokens,
        };

        let helpers = AssetHelpers::new(Address::repeat_byte(0xee));
        let sorted = helpers.sort_tokens(&columns).unwrap();

        prop_assert!(sorted.tokens.windows(2).all(|pair| pair[0] < pair[1]));
        for (i, token) in sorted.tokens.iter().enumerate() {
            let expected = tag(token);
            prop_assert_eq!(sorted.scaling_factors[i], expected);
            prop_assert_eq!(sorted.balances[i], expected);
            prop_assert_eq!(sorted.upscaled_balances[i], expected);
            prop_assert_eq!(sorted.weights[i], expected);
            prop_assert_eq!(sorted.price_rates[i], expected);
        }
    }
}
