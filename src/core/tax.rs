//! Tax-line aggregation and monetary totals.
//!
//! Bases are accumulated per canonical rate ([`RateKey`]) in [`TaxBuckets`],
//! which the invoice builder owns. [`TaxAggregator::compute`] is a pure
//! projection of those buckets into [`MonetaryTotals`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amount::{RATE_KEY_SCALE, fixed, round_half_up};
use super::error::InvoiceError;
use super::gating::{Capabilities, Field};
use super::profile::ConformanceLevel;
use super::types::VatCategory;

/// A tax rate canonicalized to four decimal places.
///
/// `9.999` and `9.9990` produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RateKey(Decimal);

impl RateKey {
    /// Canonicalize a rate. Negative rates are rejected.
    pub fn new(rate: Decimal) -> Result<Self, InvoiceError> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(InvoiceError::config(format!(
                "tax rate must not be negative (got {rate})"
            )));
        }
        let mut canonical = round_half_up(rate, RATE_KEY_SCALE);
        if canonical.is_zero() {
            canonical = Decimal::ZERO;
        }
        canonical.rescale(RATE_KEY_SCALE);
        Ok(Self(canonical))
    }

    pub fn rate(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&fixed(self.0, RATE_KEY_SCALE))
    }
}

/// Directly declared totals for profiles that do not model lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualTotals {
    pub basis: Decimal,
    pub tax: Decimal,
}

/// Per-rate accumulation of line bases, plus optional manual totals.
#[derive(Debug, Clone, Default)]
pub struct TaxBuckets {
    buckets: BTreeMap<RateKey, Vec<Decimal>>,
    manual: Option<ManualTotals>,
}

impl TaxBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `basis` to the bucket for `rate`. Negative bases are allowed
    /// (credit adjustments).
    pub fn add_line(&mut self, rate: Decimal, basis: Decimal) -> Result<RateKey, InvoiceError> {
        let key = RateKey::new(rate)?;
        self.buckets.entry(key).or_default().push(basis);
        Ok(key)
    }

    pub fn set_manual_totals(&mut self, basis: Decimal, tax: Decimal) {
        self.manual = Some(ManualTotals { basis, tax });
    }

    pub fn manual_totals(&self) -> Option<ManualTotals> {
        self.manual
    }

    /// Number of tax lines contributed across all buckets.
    pub fn line_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Buckets in ascending rate order.
    pub fn iter(&self) -> impl Iterator<Item = (&RateKey, &[Decimal])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// One rate of the tax breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub category: VatCategory,
    /// Rate percentage (canonical, four decimals).
    pub rate: Decimal,
    /// Taxable amount, two decimals.
    pub basis: Decimal,
    /// Tax amount, two decimals.
    pub tax: Decimal,
    /// Exemption reason for zero-rated entries.
    pub exemption_reason: Option<String>,
}

/// Where the totals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalsSource {
    Lines,
    Manual,
}

/// Document totals. All amounts are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryTotals {
    /// Sum of line net amounts.
    pub line_total: Decimal,
    /// Sum of all bucket bases.
    pub tax_basis_total: Decimal,
    /// Sum of per-bucket tax.
    pub tax_total: Decimal,
    /// `tax_basis_total + tax_total`.
    pub grand_total: Decimal,
    /// Equal to `grand_total` (no prepayments modeled).
    pub due_payable: Decimal,
    /// Per-rate breakdown, ascending by rate. Zero rates are kept.
    pub breakdown: Vec<TaxBreakdown>,
    pub source: TotalsSource,
}

/// Stateless computation of [`MonetaryTotals`] from [`TaxBuckets`].
pub struct TaxAggregator;

impl TaxAggregator {
    /// Compute totals for a document at `level`.
    ///
    /// Fails when the level requires lines and none were added, or when it
    /// permits declared totals but neither lines nor totals were supplied.
    pub fn compute(
        buckets: &TaxBuckets,
        level: ConformanceLevel,
    ) -> Result<MonetaryTotals, InvoiceError> {
        if buckets.line_count() == 0 {
            if !Capabilities::for_level(level).allows(Field::ManualTotals) {
                return Err(InvoiceError::config(
                    "this profile requires at least one invoice line",
                ));
            }
            let manual = buckets.manual_totals().ok_or_else(|| {
                InvoiceError::config(
                    "no invoice lines and no declared totals: call set_manual_totals or add lines",
                )
            })?;
            return Self::from_manual(manual);
        }

        if buckets.manual_totals().is_some() {
            tracing::debug!("declared totals ignored, line-derived totals take precedence");
        }

        let mut breakdown = Vec::with_capacity(buckets.bucket_count());
        let mut tax_basis_total = Decimal::ZERO;
        let mut tax_total = Decimal::ZERO;

        for (key, bases) in buckets.iter() {
            let sum = bases
                .iter()
                .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(*b))
                .ok_or_else(|| overflow(key))?;
            let basis = round_half_up(sum, 2);
            let tax = sum
                .checked_mul(key.rate())
                .and_then(|v| v.checked_div(dec!(100)))
                .map(|v| round_half_up(v, 2))
                .ok_or_else(|| overflow(key))?;
            tax_basis_total = tax_basis_total.checked_add(basis).ok_or_else(|| overflow(key))?;
            tax_total = tax_total.checked_add(tax).ok_or_else(|| overflow(key))?;
            breakdown.push(TaxBreakdown {
                category: default_category(key.rate()),
                rate: key.rate(),
                basis,
                tax,
                exemption_reason: None,
            });
        }

        let grand_total = tax_basis_total
            .checked_add(tax_total)
            .ok_or_else(|| InvoiceError::config("grand total exceeds the representable range"))?;
        Ok(MonetaryTotals {
            line_total: tax_basis_total,
            tax_basis_total,
            tax_total,
            grand_total,
            due_payable: grand_total,
            breakdown,
            source: TotalsSource::Lines,
        })
    }

    fn from_manual(manual: ManualTotals) -> Result<MonetaryTotals, InvoiceError> {
        let basis = round_half_up(manual.basis, 2);
        let tax = round_half_up(manual.tax, 2);
        let rate = if basis.is_zero() {
            Decimal::ZERO
        } else {
            tax.checked_mul(dec!(100))
                .and_then(|v| v.checked_div(basis))
                .map(|v| round_half_up(v, 2))
                .ok_or_else(|| {
                    InvoiceError::config("declared totals imply an unrepresentable rate")
                })?
        };
        let grand_total = basis
            .checked_add(tax)
            .ok_or_else(|| InvoiceError::config("declared totals exceed the representable range"))?;
        Ok(MonetaryTotals {
            line_total: basis,
            tax_basis_total: basis,
            tax_total: tax,
            grand_total,
            due_payable: grand_total,
            breakdown: vec![TaxBreakdown {
                category: default_category(rate),
                rate,
                basis,
                tax,
                exemption_reason: None,
            }],
            source: TotalsSource::Manual,
        })
    }
}

fn overflow(key: &RateKey) -> InvoiceError {
    InvoiceError::config(format!("amounts at tax rate {key} exceed the representable range"))
}

fn default_category(rate: Decimal) -> VatCategory {
    if rate.is_zero() {
        VatCategory::ZeroRated
    } else {
        VatCategory::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConformanceLevel::*;

    fn buckets(lines: &[(Decimal, Decimal)]) -> TaxBuckets {
        let mut b = TaxBuckets::new();
        for (rate, basis) in lines {
            b.add_line(*rate, *basis).unwrap();
        }
        b
    }

    #[test]
    fn scenario_a_two_rates() {
        let b = buckets(&[(dec!(20), dec!(200)), (dec!(9.5), dec!(200))]);
        let t = TaxAggregator::compute(&b, BasicWl).unwrap();
        assert_eq!(t.tax_basis_total, dec!(400.00));
        assert_eq!(t.tax_total, dec!(59.00));
        assert_eq!(t.grand_total, dec!(459.00));
        assert_eq!(t.due_payable, dec!(459.00));
        assert_eq!(t.source, TotalsSource::Lines);
    }

    #[test]
    fn scenario_b_rounds_bucket_tax() {
        let b = buckets(&[(dec!(20), dec!(200)), (dec!(9.999), dec!(200))]);
        let t = TaxAggregator::compute(&b, Basic).unwrap();
        let second = t.breakdown.iter().find(|e| e.rate == dec!(9.999)).unwrap();
        assert_eq!(second.tax, dec!(20.00));
        assert_eq!(t.tax_total, dec!(60.00));
        assert_eq!(t.grand_total, dec!(460.00));
    }

    #[test]
    fn scenario_c_manual_totals() {
        for level in [Minimum, BasicWl] {
            let mut b = TaxBuckets::new();
            b.set_manual_totals(dec!(1100), dec!(220));
            let t = TaxAggregator::compute(&b, level).unwrap();
            assert_eq!(t.grand_total, dec!(1320.00));
            assert_eq!(t.due_payable, dec!(1320.00));
            assert_eq!(t.source, TotalsSource::Manual);
            assert_eq!(t.breakdown.len(), 1);
            assert_eq!(t.breakdown[0].rate, dec!(20));
        }
    }

    #[test]
    fn scenario_d_missing_lines_is_fatal() {
        let b = TaxBuckets::new();
        for level in [Basic, En16931] {
            assert!(TaxAggregator::compute(&b, level).unwrap_err().is_configuration());
        }
    }

    #[test]
    fn low_tier_without_anything_is_fatal() {
        let b = TaxBuckets::new();
        assert!(TaxAggregator::compute(&b, Minimum).unwrap_err().is_configuration());
        assert!(TaxAggregator::compute(&b, BasicWl).unwrap_err().is_configuration());
    }

    #[test]
    fn manual_totals_do_not_satisfy_line_profiles() {
        let mut b = TaxBuckets::new();
        b.set_manual_totals(dec!(100), dec!(20));
        assert!(TaxAggregator::compute(&b, Basic).is_err());
    }

    #[test]
    fn lines_win_over_manual_totals() {
        let mut b = buckets(&[(dec!(10), dec!(100))]);
        b.set_manual_totals(dec!(9999), dec!(1));
        let t = TaxAggregator::compute(&b, Minimum).unwrap();
        assert_eq!(t.grand_total, dec!(110.00));
        assert_eq!(t.source, TotalsSource::Lines);
    }

    #[test]
    fn equal_rates_share_one_bucket() {
        let b = buckets(&[
            (dec!(9.999), dec!(100)),
            (dec!(9.9990), dec!(100)),
            (dec!(9.99900), dec!(50)),
        ]);
        assert_eq!(b.bucket_count(), 1);
        assert_eq!(b.line_count(), 3);
        let (key, bases) = b.iter().next().unwrap();
        assert_eq!(key.to_string(), "9.9990");
        assert_eq!(bases.len(), 3);
    }

    #[test]
    fn compute_is_idempotent() {
        let b = buckets(&[(dec!(19), dec!(33.33)), (dec!(7), dec!(12.01))]);
        let first = TaxAggregator::compute(&b, En16931).unwrap();
        let second = TaxAggregator::compute(&b, En16931).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_rate_is_kept_but_adds_no_tax() {
        let b = buckets(&[(dec!(0), dec!(500)), (dec!(20), dec!(100))]);
        let t = TaxAggregator::compute(&b, En16931).unwrap();
        assert_eq!(t.breakdown.len(), 2);
        let zero = &t.breakdown[0];
        assert_eq!(zero.rate, dec!(0));
        assert_eq!(zero.tax, dec!(0));
        assert_eq!(zero.category, VatCategory::ZeroRated);
        assert_eq!(t.tax_basis_total, dec!(600));
        assert_eq!(t.tax_total, dec!(20));
    }

    #[test]
    fn negative_rate_rejected_negative_basis_accepted() {
        let mut b = TaxBuckets::new();
        assert!(b.add_line(dec!(-5), dec!(100)).is_err());
        b.add_line(dec!(20), dec!(100)).unwrap();
        b.add_line(dec!(20), dec!(-40)).unwrap();
        let t = TaxAggregator::compute(&b, En16931).unwrap();
        assert_eq!(t.tax_basis_total, dec!(60));
        assert_eq!(t.tax_total, dec!(12));
    }

    #[test]
    fn large_rates_flow_through() {
        let b = buckets(&[(dec!(150), dec!(10))]);
        let t = TaxAggregator::compute(&b, En16931).unwrap();
        assert_eq!(t.tax_total, dec!(15));
    }

    #[test]
    fn oversized_amounts_are_a_configuration_error() {
        let b = buckets(&[(dec!(20), Decimal::MAX), (dec!(20), Decimal::MAX)]);
        assert!(TaxAggregator::compute(&b, En16931).unwrap_err().is_configuration());

        let b = buckets(&[(dec!(100000), Decimal::MAX)]);
        assert!(TaxAggregator::compute(&b, En16931).unwrap_err().is_configuration());

        let mut b = TaxBuckets::new();
        b.set_manual_totals(Decimal::MAX, Decimal::MAX);
        assert!(TaxAggregator::compute(&b, Minimum).unwrap_err().is_configuration());
    }

    #[test]
    fn breakdown_is_sorted_by_rate() {
        let b = buckets(&[(dec!(20), dec!(1)), (dec!(5.5), dec!(1)), (dec!(10), dec!(1))]);
        let t = TaxAggregator::compute(&b, En16931).unwrap();
        let rates: Vec<_> = t.breakdown.iter().map(|e| e.rate).collect();
        assert_eq!(rates, vec![dec!(5.5), dec!(10), dec!(20)]);
    }
}
