//!
//! # Engineering Quantities
//!
//! Scalar values as they appear in argument arrays: a number followed by an optional unit suffix,
//! e.g. `"10mil"`, `"3.5mm"`, `"90deg"`.
//! Arithmetic and comparison operate on canonical base units: meters, radians, or plain numbers.
//!

// Std-Lib
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// Crates.io
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::error::{AedtError, AedtResult};
use crate::utils::{enumstr, EnumStr};

enumstr!(
    /// # Unit Suffixes
    /// The fixed set recognized when parsing quantities.
    Unit {
        Nm: "nm",
        Um: "um",
        Mil: "mil",
        Mm: "mm",
        Cm: "cm",
        M: "m",
        In: "in",
        Deg: "deg",
        Rad: "rad",
        Unitless: "",
    }
);

/// # Unit Categories
/// Quantities only convert, compare and add within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Length,
    Angle,
    Dimensionless,
}

impl Unit {
    /// Our [Category]
    pub fn category(&self) -> Category {
        match self {
            Self::Nm | Self::Um | Self::Mil | Self::Mm | Self::Cm | Self::M | Self::In => {
                Category::Length
            }
            Self::Deg | Self::Rad => Category::Angle,
            Self::Unitless => Category::Dimensionless,
        }
    }
    /// Size of one of us, in our category's base unit
    pub fn scale(&self) -> f64 {
        match self {
            Self::Nm => 1e-9,
            Self::Um => 1e-6,
            Self::Mil => 2.54e-5,
            Self::Mm => 1e-3,
            Self::Cm => 1e-2,
            Self::M => 1.0,
            Self::In => 2.54e-2,
            Self::Deg => std::f64::consts::PI / 180.0,
            Self::Rad => 1.0,
            Self::Unitless => 1.0,
        }
    }
    /// Parse a unit suffix, ignoring case.
    /// The empty string is [Unit::Unitless].
    pub fn parse(txt: &str) -> AedtResult<Self> {
        Self::from_str_nocase(txt.trim())
            .ok_or_else(|| AedtError::InvalidQuantity(format!("unknown unit {:?}", txt)))
    }
}
impl Default for Unit {
    fn default() -> Self {
        Self::Unitless
    }
}

/// Number, then an optional alphabetic suffix
static QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*([A-Za-z]*)\s*$")
        .expect("static quantity regex")
});

///
/// # Quantity
///
/// A magnitude and its [Unit].
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: Unit,
}
impl Quantity {
    /// Create a new [Quantity]
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }
    /// Parse `text`, using `default` when no suffix is given
    pub fn parse(text: &str, default: Unit) -> AedtResult<Self> {
        let caps = QUANTITY
            .captures(text)
            .ok_or_else(|| AedtError::InvalidQuantity(text.to_string()))?;
        let magnitude: f64 = caps[1]
            .parse()
            .map_err(|_| AedtError::InvalidQuantity(text.to_string()))?;
        let suffix = &caps[2];
        let unit = if suffix.is_empty() {
            default
        } else {
            Unit::from_str_nocase(suffix)
                .ok_or_else(|| AedtError::InvalidQuantity(text.to_string()))?
        };
        Ok(Self { magnitude, unit })
    }
    /// Parse `text` only if it carries an explicit, recognized unit suffix.
    /// Bare numbers and free text return `None`.
    pub fn parse_suffixed(text: &str) -> Option<Self> {
        let caps = QUANTITY.captures(text)?;
        if caps[2].is_empty() {
            return None;
        }
        let unit = Unit::from_str_nocase(&caps[2])?;
        let magnitude = caps[1].parse().ok()?;
        Some(Self { magnitude, unit })
    }
    /// Our magnitude in our category's base unit
    pub fn value(&self) -> f64 {
        self.magnitude * self.unit.scale()
    }
    /// Our [Category]
    pub fn category(&self) -> Category {
        self.unit.category()
    }
    /// Convert to `unit`
    pub fn convert(&self, unit: Unit) -> AedtResult<Self> {
        self.check(unit)?;
        if unit == self.unit {
            return Ok(*self);
        }
        let magnitude = tidy(self.magnitude * self.unit.scale() / unit.scale());
        Ok(Self { magnitude, unit })
    }
    /// Format in our own unit
    pub fn format(&self) -> String {
        self.to_string()
    }
    /// Format after conversion to `unit`
    pub fn format_in(&self, unit: Unit) -> AedtResult<String> {
        Ok(self.convert(unit)?.to_string())
    }
    /// Scale by `factor`, keeping our unit
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            magnitude: tidy(self.magnitude * factor),
            unit: self.unit,
        }
    }
    /// Sum, in our unit
    pub fn add(&self, other: &Quantity) -> AedtResult<Self> {
        let other = other.convert(self.unit)?;
        Ok(Self::new(tidy(self.magnitude + other.magnitude), self.unit))
    }
    /// Difference, in our unit
    pub fn sub(&self, other: &Quantity) -> AedtResult<Self> {
        let other = other.convert(self.unit)?;
        Ok(Self::new(tidy(self.magnitude - other.magnitude), self.unit))
    }
    /// Compare base-unit values
    pub fn compare(&self, other: &Quantity) -> AedtResult<Ordering> {
        self.check(other.unit)?;
        self.value()
            .partial_cmp(&other.value())
            .ok_or_else(|| AedtError::InvalidQuantity(format!("{} vs {}", self, other)))
    }
    /// Fail unless `unit` shares our category
    fn check(&self, unit: Unit) -> AedtResult<()> {
        if self.category() != unit.category() {
            return Err(AedtError::UnitMismatch {
                from: format!("{:?}", self.unit),
                to: format!("{:?}", unit),
            });
        }
        Ok(())
    }
}
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}
impl FromStr for Quantity {
    type Err = AedtError;
    /// Parse with a dimensionless default
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Unit::Unitless)
    }
}
impl std::ops::Mul<f64> for Quantity {
    type Output = Quantity;
    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

/// Round to twelve significant digits, shedding conversion noise like `0.25399999999999995`
fn tidy(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    format!("{:.11e}", x).parse().unwrap_or(x)
}
