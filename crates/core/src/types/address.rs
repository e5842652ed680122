//! Delivery address types.

use serde::{Deserialize, Serialize};

use super::postal_code::PostalCode;

/// Errors that can occur when parsing a [`HouseNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HouseNumberError {
    /// The input contains something other than ASCII digits.
    #[error("house number must contain only digits")]
    NonDigit,
}

/// Street number of the delivery address. Digits only, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct HouseNumber(String);

impl HouseNumber {
    /// Parse a `HouseNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains a non-digit character.
    pub fn parse(s: &str) -> Result<Self, HouseNumberError> {
        if s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(HouseNumberError::NonDigit)
        }
    }

    /// Returns true if nothing has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HouseNumber {
    type Error = HouseNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HouseNumber> for String {
    fn from(number: HouseNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for HouseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The delivery address as currently entered in the checkout form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressForm {
    pub postal_code: PostalCode,
    pub district: String,
    pub street: String,
    pub number: HouseNumber,
    pub complement: String,
}

impl AddressForm {
    /// Address lines for the "confirm your address" panel.
    ///
    /// Returns `None` until street, district, number and postal code all
    /// have content.
    #[must_use]
    pub fn confirmation(&self, locality: &Locality) -> Option<AddressConfirmation> {
        if self.street.is_empty()
            || self.district.is_empty()
            || self.number.is_empty()
            || self.postal_code.is_empty()
        {
            return None;
        }

        let mut street_line = format!("{}, nº {}", self.street, self.number);
        if !self.complement.is_empty() {
            street_line.push_str(" - ");
            street_line.push_str(&self.complement);
        }

        Some(AddressConfirmation {
            street_line,
            district_line: format!("Bairro {}", self.district),
            city_line: format!("{} - {}", locality.city, locality.state_name),
            postal_code_line: format!("CEP: {}", self.postal_code),
        })
    }
}

/// Rendered address lines shown back to the customer before ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressConfirmation {
    pub street_line: String,
    pub district_line: String,
    pub city_line: String,
    pub postal_code_line: String,
}

/// The single city the restaurant delivers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locality {
    /// City name exactly as the postal-code service spells it.
    pub city: String,
    /// Two-letter state code (UF).
    pub state: String,
    /// Full state name, used for display only.
    pub state_name: String,
}

impl Locality {
    /// Create a new locality.
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        state_name: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            state_name: state_name.into(),
        }
    }

    /// São Luís, Maranhão.
    #[must_use]
    pub fn sao_luis() -> Self {
        Self::new("São Luís", "MA", "Maranhão")
    }

    /// Whether a resolved city/state pair falls inside the delivery area.
    #[must_use]
    pub fn contains(&self, city: &str, state: &str) -> bool {
        self.state == state.trim() && self.city == city.trim()
    }

    /// Message shown when a postal code resolves outside the delivery area.
    #[must_use]
    pub fn restriction_message(&self) -> String {
        format!("O CEP não pertence a cidade de {}({})", self.city, self.state)
    }
}

impl Default for Locality {
    fn default() -> Self {
        Self::sao_luis()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_form() -> AddressForm {
        AddressForm {
            postal_code: PostalCode::parse("65000000").unwrap(),
            district: "Centro".to_string(),
            street: "Rua Grande".to_string(),
            number: HouseNumber::parse("100").unwrap(),
            complement: String::new(),
        }
    }

    #[test]
    fn test_house_number_digits_only() {
        assert!(HouseNumber::parse("").unwrap().is_empty());
        assert_eq!(HouseNumber::parse("100").unwrap().as_str(), "100");
        assert_eq!(HouseNumber::parse("10a"), Err(HouseNumberError::NonDigit));
        assert_eq!(HouseNumber::parse("s/n"), Err(HouseNumberError::NonDigit));
    }

    #[test]
    fn test_locality_match_is_exact_on_city_and_state() {
        let locality = Locality::sao_luis();
        assert!(locality.contains("São Luís", "MA"));
        assert!(locality.contains(" São Luís ", "MA"));
        assert!(!locality.contains("São Paulo", "SP"));
        assert!(!locality.contains("São Luís", "SP"));
        assert!(!locality.contains("Sao Luis", "MA"));
    }

    #[test]
    fn test_restriction_message_names_the_city() {
        let message = Locality::sao_luis().restriction_message();
        assert_eq!(message, "O CEP não pertence a cidade de São Luís(MA)");
    }

    #[test]
    fn test_confirmation_requires_all_fields() {
        let locality = Locality::sao_luis();
        assert!(filled_form().confirmation(&locality).is_some());

        let mut form = filled_form();
        form.street.clear();
        assert!(form.confirmation(&locality).is_none());

        let mut form = filled_form();
        form.number = HouseNumber::default();
        assert!(form.confirmation(&locality).is_none());
    }

    #[test]
    fn test_confirmation_lines() {
        let mut form = filled_form();
        form.complement = "apt. 01".to_string();

        let lines = form.confirmation(&Locality::sao_luis()).unwrap();
        assert_eq!(lines.street_line, "Rua Grande, nº 100 - apt. 01");
        assert_eq!(lines.district_line, "Bairro Centro");
        assert_eq!(lines.city_line, "São Luís - Maranhão");
        assert_eq!(lines.postal_code_line, "CEP: 65000000");
    }
}
