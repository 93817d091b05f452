//! Calculation input validation
//!
//! Operands land in `NUMERIC(10,2)` columns, so every value must be present
//! and round (half away from zero, as PostgreSQL does) to less than 10^8.
//! Zero is an ordinary value.

use rust_decimal::{Decimal, RoundingStrategy};

use super::ValidationError;

/// Exclusive magnitude bound for a `NUMERIC(10,2)` value.
const OPERAND_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

const OPERAND_LIMIT_DISPLAY: &str = "99999999.99";

/// Validated calculation ready to be recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculation {
    numero1: Decimal,
    numero2: Decimal,
    resultado: Decimal,
}

impl Calculation {
    /// Build a calculation from optional request fields.
    ///
    /// # Example
    /// ```
    /// use calcapi_server::models::Calculation;
    /// use rust_decimal::Decimal;
    ///
    /// let five = Some(Decimal::from(5));
    /// assert!(Calculation::new(Some(Decimal::ZERO), five, five).is_ok());
    /// assert!(Calculation::new(None, five, five).is_err());
    /// ```
    pub fn new(
        numero1: Option<Decimal>,
        numero2: Option<Decimal>,
        resultado: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            numero1: operand("numero1", numero1)?,
            numero2: operand("numero2", numero2)?,
            resultado: operand("resultado", resultado)?,
        })
    }

    pub fn numero1(&self) -> Decimal {
        self.numero1
    }

    pub fn numero2(&self) -> Decimal {
        self.numero2
    }

    pub fn resultado(&self) -> Decimal {
        self.resultado
    }
}

fn operand(field: &'static str, value: Option<Decimal>) -> Result<Decimal, ValidationError> {
    let value = value.ok_or(ValidationError::Missing { field })?;

    let stored = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if stored.abs() >= OPERAND_LIMIT {
        return Err(ValidationError::OutOfRange {
            field,
            limit: OPERAND_LIMIT_DISPLAY,
        });
    }

    Ok(value)
}
