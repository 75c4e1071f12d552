//! # Coin Advisory
//!
//! Hints for the cashier: which small coins to ask the customer for so the
//! change comes out round. Purely a UX nicety; the calculation never
//! depends on it.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// A suggestion to show next to the change result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoinSuggestion {
    /// Ask for this many centavos so the change drops to the real below.
    AskCentsToRoundDown { cents: i64 },
    /// Ask for this many centavos so the change reaches the next real.
    AskCentsToRoundUp { cents: i64 },
    /// Ask for a single coin that cancels most of the centavos.
    AskCoin { coin: Money },
}

impl fmt::Display for CoinSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSuggestion::AskCentsToRoundDown { cents } => write!(
                f,
                "Peça {cents} centavo(s) ao cliente para arredondar para baixo"
            ),
            CoinSuggestion::AskCentsToRoundUp { cents } => write!(
                f,
                "Peça {cents} centavo(s) ao cliente para arredondar para cima"
            ),
            CoinSuggestion::AskCoin { coin } => {
                write!(f, "Peça uma moeda de {coin} ao cliente para facilitar o troco")
            }
        }
    }
}

/// Suggests coins to ask for, based on the centavos of the change.
///
/// Returns at most one suggestion. Whole reais and negative amounts get none.
///
/// ```rust
/// use trokito_core::advisory::{suggest_customer_coins, CoinSuggestion};
/// use trokito_core::money::Money;
///
/// assert_eq!(
///     suggest_customer_coins(Money::from_cents(1003)),
///     vec![CoinSuggestion::AskCentsToRoundDown { cents: 3 }]
/// );
/// assert!(suggest_customer_coins(Money::from_cents(1000)).is_empty());
/// ```
pub fn suggest_customer_coins(change: Money) -> Vec<CoinSuggestion> {
    if !change.is_positive() {
        return Vec::new();
    }

    let suggestion = match change.centavos_part() {
        c @ 1..=4 => Some(CoinSuggestion::AskCentsToRoundDown { cents: c }),
        c @ 96..=99 => Some(CoinSuggestion::AskCentsToRoundUp { cents: 100 - c }),
        46..=54 => Some(CoinSuggestion::AskCoin {
            coin: Money::from_cents(50),
        }),
        21..=29 => Some(CoinSuggestion::AskCoin {
            coin: Money::from_cents(25),
        }),
        _ => None,
    };

    suggestion.into_iter().collect()
}
