//! Payment methods accepted at checkout.

use serde::{Deserialize, Serialize};

/// How the customer intends to pay on delivery.
///
/// A closed set: the readiness check only asks whether one is selected, and
/// adding a variant forces every `match` below to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    /// Every method, in the order the checkout offers them.
    pub const ALL: [Self; 4] = [Self::Pix, Self::CreditCard, Self::DebitCard, Self::Cash];

    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pix => "Pix",
            Self::CreditCard => "Crédito",
            Self::DebitCard => "Débito",
            Self::Cash => "Dinheiro",
        }
    }

    /// Whether choosing this method reveals the card-data form.
    ///
    /// The card form's own validity is not part of checkout readiness.
    #[must_use]
    pub const fn requires_card_details(self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }

    /// Stable identifier used in requests and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Cash => "cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("invalid payment method: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let labels: Vec<_> = PaymentMethod::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["Pix", "Crédito", "Débito", "Dinheiro"]);
    }

    #[test]
    fn test_card_methods_reveal_card_form() {
        assert!(PaymentMethod::CreditCard.requires_card_details());
        assert!(PaymentMethod::DebitCard.requires_card_details());
        assert!(!PaymentMethod::Pix.requires_card_details());
        assert!(!PaymentMethod::Cash.requires_card_details());
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!("boleto".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&PaymentMethod::CreditCard).unwrap();
        assert_eq!(json, "\"credit_card\"");
    }
}
