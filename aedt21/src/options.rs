//!
//! # Options
//!
//! Library-wide settings: the design unit, net and part classification patterns,
//! and a handful of physical defaults.
//! Loadable from JSON, YAML or TOML files, and overridable through `AEDT21_<FIELD>` environment variables.
//!

// Crates.io
use log::warn;
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Local Imports
use crate::error::{AedtError, AedtResult};
use crate::kinds::{NetClass, PartClass};
use crate::units::{Quantity, Unit};
use crate::utils::SerdeFile;

/// Prefix of environment variables overriding [Options] fields
pub const ENV_PREFIX: &str = "AEDT21_";

///
/// # Options
///
/// Pattern fields hold comma-separated lists of regular expressions,
/// each matched against whole names, case-insensitively.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Unit applied to bare numbers, e.g. "mm"
    pub design_unit: String,
    /// Expansion applied around cut-out regions
    pub cut_expansion: String,
    /// Stub length left by backdrilling
    pub backdrill_stub: String,
    /// Power net patterns
    pub power_net_regex: String,
    /// Ground net patterns
    pub ground_net_regex: String,
    /// Ignored (no-connect) net patterns
    pub ignore_net_regex: String,
    /// Resistor reference-designator patterns
    pub resistor_regex: String,
    pub inductor_regex: String,
    pub capacitor_regex: String,
    /// Solder-ball height, as a ratio of pad diameter
    pub solder_ball_height_ratio: f64,
    /// Solder-ball width, as a ratio of pad diameter
    pub solder_ball_width_ratio: f64,
    /// Compare entity names case-sensitively
    pub case_sensitive_names: bool,
}
impl Default for Options {
    fn default() -> Self {
        Self {
            design_unit: "mm".into(),
            cut_expansion: "10mm".into(),
            backdrill_stub: "8mil".into(),
            power_net_regex: ".*VDD.*,.*VCC.*".into(),
            ground_net_regex: ".*GND.*,.*VSS.*".into(),
            ignore_net_regex: ".*NC.*".into(),
            resistor_regex: r"R\d+".into(),
            inductor_regex: r"L\d+".into(),
            capacitor_regex: r"C\d+".into(),
            solder_ball_height_ratio: 0.7,
            solder_ball_width_ratio: 0.7,
            case_sensitive_names: false,
        }
    }
}
impl SerdeFile for Options {}

impl Options {
    /// Load from `fname`, then apply any environment overrides
    pub fn load(fname: impl AsRef<std::path::Path>) -> AedtResult<Self> {
        let mut opts = Self::open_any(fname)?;
        opts.apply_env()?;
        Ok(opts)
    }
    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> AedtResult<()> {
        self.apply_vars(std::env::vars())
    }
    /// Apply overrides from `(name, value)` pairs.
    ///
    /// Names are `AEDT21_` followed by a field name, in any case, e.g. `AEDT21_DESIGN_UNIT`.
    /// Values are parsed according to the field's type. Other names are ignored.
    pub fn apply_vars<K, V>(&mut self, vars: impl IntoIterator<Item = (K, V)>) -> AedtResult<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut value = serde_json::to_value(&*self)?;
        let fields = match value.as_object_mut() {
            Some(fields) => fields,
            None => return AedtError::fail("Options must serialize as a map"),
        };
        for (key, val) in vars {
            let field = match key.as_ref().strip_prefix(ENV_PREFIX) {
                Some(field) => field.to_lowercase(),
                None => continue,
            };
            match fields.get_mut(&field) {
                Some(slot) => *slot = coerce(slot, &field, val.as_ref())?,
                None => warn!("Ignoring unknown option {}{}", ENV_PREFIX, field.to_uppercase()),
            }
        }
        *self = serde_json::from_value(value)?;
        Ok(())
    }
    /// The design unit
    pub fn design_unit(&self) -> AedtResult<Unit> {
        Unit::parse(&self.design_unit)
    }
    /// Parse `text` as a quantity, in the design unit if it has no suffix
    pub fn quantity(&self, text: &str) -> AedtResult<Quantity> {
        Quantity::parse(text, self.design_unit()?)
    }
    pub fn backdrill_stub(&self) -> AedtResult<Quantity> {
        self.quantity(&self.backdrill_stub)
    }
    pub fn cut_expansion(&self) -> AedtResult<Quantity> {
        self.quantity(&self.cut_expansion)
    }
    /// Solder-ball `(height, width)` for a pad of `diameter`, in the design unit
    pub fn solder_ball_size(&self, diameter: &Quantity) -> AedtResult<(Quantity, Quantity)> {
        let d = diameter.convert(self.design_unit()?)?;
        Ok((
            d.scale(self.solder_ball_height_ratio),
            d.scale(self.solder_ball_width_ratio),
        ))
    }
    /// Classify net `name`. Power patterns are checked first, then ground, then ignore.
    pub fn net_class(&self, name: &str) -> AedtResult<NetClass> {
        if matches_any(&self.power_net_regex, name)? {
            return Ok(NetClass::Power);
        }
        if matches_any(&self.ground_net_regex, name)? {
            return Ok(NetClass::Ground);
        }
        if matches_any(&self.ignore_net_regex, name)? {
            return Ok(NetClass::Ignore);
        }
        Ok(NetClass::Signal)
    }
    /// Classify a part by its reference designator
    pub fn part_class(&self, refdes: &str) -> AedtResult<PartClass> {
        if matches_any(&self.resistor_regex, refdes)? {
            return Ok(PartClass::Resistor);
        }
        if matches_any(&self.inductor_regex, refdes)? {
            return Ok(PartClass::Inductor);
        }
        if matches_any(&self.capacitor_regex, refdes)? {
            return Ok(PartClass::Capacitor);
        }
        Ok(PartClass::Other)
    }
}

/// Parse `val` into the JSON type already held by `slot`
fn coerce(slot: &Value, field: &str, val: &str) -> AedtResult<Value> {
    let bad = || AedtError::msg(format!("Invalid value {:?} for option {}", val, field));
    Ok(match slot {
        Value::Bool(_) => Value::Bool(val.trim().to_lowercase().parse().map_err(|_| bad())?),
        Value::Number(_) => {
            let x: f64 = val.trim().parse().map_err(|_| bad())?;
            Value::Number(serde_json::Number::from_f64(x).ok_or_else(bad)?)
        }
        _ => Value::String(val.to_string()),
    })
}

/// Compile pattern `pat` anchored to whole names, honoring case sensitivity
pub(crate) fn anchored(pat: &str, case_sensitive: bool) -> AedtResult<Regex> {
    RegexBuilder::new(&format!("^(?:{})$", pat))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| AedtError::InvalidPattern {
            pattern: pat.to_string(),
            err: Box::new(err),
        })
}

/// Boolean indication of whether any of comma-separated `pats` matches `name`
fn matches_any(pats: &str, name: &str) -> AedtResult<bool> {
    for pat in pats.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if anchored(pat, false)?.is_match(name) {
            return Ok(true);
        }
    }
    Ok(false)
}
