//! The single commission split computation shared by payment capture and
//! earnings derivation.
//!
//! The platform historically re-implemented this arithmetic in every view and
//! maintenance script that touched money; all callers now go through
//! [`compute_split`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommissionRate, Money, TypeConstraintError};

/// Result of splitting a gross amount between platform and provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionSplit {
    pub gross_amount: Money,
    pub commission_amount: Money,
    pub net_amount: Money,
}

/// Splits `gross` into the platform commission and the provider's net share.
///
/// The commission is rounded half-up to the smallest currency unit (2 dp) and
/// clamped to the gross amount so the net share can never go negative.
pub fn compute_split(
    gross: Money,
    rate: CommissionRate,
) -> Result<CommissionSplit, TypeConstraintError> {
    let commission = (gross.get() * rate.get() / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .min(gross.get());

    let commission_amount = Money::new(commission)?;
    let net_amount = Money::new(gross.get() - commission)?;

    Ok(CommissionSplit {
        gross_amount: gross,
        commission_amount,
        net_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: Decimal) -> Money {
        Money::new(value).unwrap()
    }

    fn rate(value: Decimal) -> CommissionRate {
        CommissionRate::new(value).unwrap()
    }

    #[test]
    fn splits_the_documented_scenario() {
        // 800 at the 15% payment commission leaves 680 for the provider.
        let split = compute_split(money(dec!(800.00)), rate(dec!(15.00))).unwrap();
        assert_eq!(split.commission_amount, dec!(120.00));
        assert_eq!(split.net_amount, dec!(680.00));

        // The same gross at the independent 10% earnings rate nets 720.
        let split = compute_split(money(dec!(800.00)), rate(dec!(10.00))).unwrap();
        assert_eq!(split.commission_amount, dec!(80.00));
        assert_eq!(split.net_amount, dec!(720.00));
    }

    #[test]
    fn commission_plus_net_equals_gross() {
        for (gross, pct) in [
            (dec!(99.99), dec!(12.50)),
            (dec!(0.01), dec!(15.00)),
            (dec!(1234.56), dec!(7.25)),
        ] {
            let split = compute_split(money(gross), rate(pct)).unwrap();
            assert_eq!(
                split.commission_amount.get() + split.net_amount.get(),
                gross
            );
        }
    }

    #[test]
    fn rounds_half_up_to_currency_precision() {
        // 33.33 * 7.5% = 2.49975 -> 2.50
        let split = compute_split(money(dec!(33.33)), rate(dec!(7.5))).unwrap();
        assert_eq!(split.commission_amount, dec!(2.50));
        assert_eq!(split.net_amount, dec!(30.83));
    }

    #[test]
    fn zero_rate_keeps_the_full_gross() {
        let split = compute_split(money(dec!(500.00)), rate(Decimal::ZERO)).unwrap();
        assert_eq!(split.commission_amount, Decimal::ZERO);
        assert_eq!(split.net_amount, dec!(500.00));
    }

    #[test]
    fn full_rate_never_drives_net_negative() {
        let split = compute_split(money(dec!(0.005)), rate(Decimal::ONE_HUNDRED)).unwrap();
        assert_eq!(split.net_amount, Decimal::ZERO);
    }
}
