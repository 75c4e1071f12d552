//! # Change Command
//!
//! `trokito change --purchase 23,50 --paid 50` or `trokito change --amount 9,96`.

use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use trokito_core::record::create_change_record;
use trokito_core::{
    suggest_customer_coins, ChangeCalculator, ChangeRecord, ChangeResult, Money, RecordStamper,
};

use super::{breakdown_lines, Report};
use crate::error::ApiError;
use crate::state::Settings;

/// Arguments for `trokito change`.
#[derive(Args, Debug, Clone, Default)]
pub struct ChangeArgs {
    /// Purchase total, e.g. "23,50" or "R$ 23,50".
    #[arg(long, requires = "paid", conflicts_with = "amount")]
    pub purchase: Option<String>,

    /// Amount handed over by the customer.
    #[arg(long, requires = "purchase")]
    pub paid: Option<String>,

    /// Change already computed by the point-of-sale system.
    #[arg(long, required_unless_present = "purchase")]
    pub amount: Option<String>,

    /// Suggest coins to ask the customer for.
    #[arg(long)]
    pub suggest: bool,

    /// Emit a change-history record.
    #[arg(long)]
    pub record: bool,
}

/// Result of `trokito change`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
    pub result: ChangeResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ChangeRecord>,
}

/// Calculates change with the configured policy.
///
/// ## Errors
/// - `InvalidAmount` for unparsable or out-of-range input
/// - `InsufficientPayment` when paid < purchase
/// - `ValidationError` when neither form of input is given
pub fn run_change(
    args: &ChangeArgs,
    settings: &Settings,
    stamper: &impl RecordStamper,
) -> Result<ChangeReport, ApiError> {
    let calculator = ChangeCalculator::new(settings.to_calculation_config())?;

    let (purchase, paid, result) = match (&args.purchase, &args.paid, &args.amount) {
        (Some(purchase), Some(paid), None) => {
            let purchase = Money::parse(purchase)?;
            let paid = Money::parse(paid)?;
            debug!(purchase = purchase.cents(), paid = paid.cents(), "change requested");
            let result = calculator.calculate(purchase, paid)?;
            (Some(purchase), Some(paid), result)
        }
        (None, None, Some(amount)) => {
            let amount = Money::parse(amount)?;
            debug!(amount = amount.cents(), "PDV change requested");
            (None, None, calculator.calculate_from_pdv(amount)?)
        }
        _ => {
            return Err(ApiError::validation(
                "Informe --purchase e --paid, ou apenas --amount",
            ))
        }
    };

    info!(
        change = result.rounded_amount.cents(),
        delta = result.rounding_delta.cents(),
        "change calculated"
    );

    let suggestions = if args.suggest {
        suggest_customer_coins(result.exact_amount)
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let record = args
        .record
        .then(|| create_change_record(purchase, paid, &result, stamper));

    Ok(ChangeReport {
        result,
        suggestions,
        record,
    })
}

impl Report for ChangeReport {
    fn to_text(&self) -> String {
        let result = &self.result;
        let mut lines = vec![format!("Troco: {}", result.rounded_amount)];

        if !result.is_exactly_representable {
            lines.push(format!("Troco exato: {}", result.exact_amount));
        }

        if !result.breakdown.is_empty() {
            lines.extend(breakdown_lines(&result.breakdown));
            lines.push(format!("Peças: {}", result.piece_count()));
        }

        if let Some(ref explanation) = result.explanation {
            lines.push(explanation.clone());
        }

        for suggestion in &self.suggestions {
            lines.push(format!("Dica: {suggestion}"));
        }

        if let Some(ref record) = self.record {
            lines.push(format!("Registro: {}", record.id));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use trokito_core::CoreError;

    struct TestStamper;

    impl RecordStamper for TestStamper {
        fn next_id(&self) -> String {
            "chg-1".to_string()
        }

        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
        }
    }

    fn purchase_paid(purchase: &str, paid: &str) -> ChangeArgs {
        ChangeArgs {
            purchase: Some(purchase.into()),
            paid: Some(paid.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_change_text() {
        let report =
            run_change(&purchase_paid("23,50", "R$ 50,00"), &Settings::default(), &TestStamper)
                .unwrap();
        assert_eq!(
            report.to_text(),
            "Troco: R$ 26,50\n  1 x R$ 20 (nota)\n  1 x R$ 5 (nota)\n  1 x R$ 1 (moeda)\n  1 x R$ 0,50 (moeda)\nPeças: 4"
        );
        assert!(report.record.is_none());
    }

    #[test]
    fn test_change_with_tolerance_and_suggestion() {
        let args = ChangeArgs {
            suggest: true,
            record: true,
            ..purchase_paid("10,04", "20")
        };
        let report = run_change(&args, &Settings::default(), &TestStamper).unwrap();
        let text = report.to_text();
        assert!(text.starts_with("Troco: R$ 9,95\nTroco exato: R$ 9,96\n"));
        assert!(text.contains("Cliente deve 1 centavo (dentro da tolerância)"));
        assert!(text.contains("Dica: Peça 4 centavo(s) ao cliente para arredondar para cima"));
        assert!(text.ends_with("Registro: chg-1"));

        let record = report.record.unwrap();
        assert_eq!(record.purchase, Some(Money::from_cents(1004)));
        assert_eq!(record.change_given.cents(), 995);
    }

    #[test]
    fn test_pdv_amount() {
        let args = ChangeArgs {
            amount: Some("9,96".into()),
            record: true,
            ..Default::default()
        };
        let report = run_change(&args, &Settings::default(), &TestStamper).unwrap();
        assert_eq!(report.result.rounded_amount.cents(), 995);
        assert_eq!(report.record.unwrap().purchase, None);
    }

    #[test]
    fn test_errors() {
        let err = run_change(&purchase_paid("50", "25"), &Settings::default(), &TestStamper)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InsufficientPayment);

        let err = run_change(&purchase_paid("abc", "25"), &Settings::default(), &TestStamper)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidAmount);

        let err = run_change(&ChangeArgs::default(), &Settings::default(), &TestStamper)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);

        let mut settings = Settings::default();
        settings.denominations.active = vec![];
        let err = run_change(&purchase_paid("1", "2"), &settings, &TestStamper).unwrap_err();
        let expected: ApiError = CoreError::InvalidConfiguration("no active denominations".into()).into();
        assert_eq!(err.code, expected.code);
    }

    #[test]
    fn test_no_change_text() {
        let report =
            run_change(&purchase_paid("25", "25"), &Settings::default(), &TestStamper).unwrap();
        assert_eq!(report.to_text(), "Troco: R$ 0,00\nNão há troco a ser dado");
    }

    #[test]
    fn test_json_report() {
        let report =
            run_change(&purchase_paid("23,50", "50"), &Settings::default(), &TestStamper).unwrap();
        let json = super::super::render(&report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["rounded_amount"], 2650);
        assert!(value.get("record").is_none());
    }
}
