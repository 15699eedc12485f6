//!
//! # Error-Helper Utilities
//!
//! ```rust
//! use aedt21utils::error::{ErrorHelper, Unwrapper};
//!
//! /// A walker which remembers where it is, and reports it upon failure.
//! struct Walker {
//!     path: Vec<String>,
//! }
//! impl ErrorHelper for Walker {
//!     type Error = String;
//!
//!     fn err(&self, msg: impl Into<String>) -> Self::Error {
//!         format!("{} (at {})", msg.into(), self.path.join("/"))
//!     }
//! }
//! impl Walker {
//!     fn walk(&self, args: &[&str]) -> Result<String, String> {
//!         let first = args.first().unwrapper(self, "Empty argument list")?;
//!         self.assert(first.starts_with("NAME:"), "Missing name tag")?;
//!         Ok(first.to_string())
//!     }
//! }
//! ```
//!

///
/// # ErrorHelper
///
/// Shared failure-reporting for the codec and other tree-walkers.
/// Implementers carry some state worth reporting, typically the path walked so far,
/// and fold it into their error in the required `err` method.
/// Everything else is provided.
///
pub trait ErrorHelper {
    type Error;

    /// Create and return a [Self::Error] value.
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Return failure
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Unwrap the [Option] `opt` if it is [Some], and return our error if not.
    fn unwrap<T>(&self, opt: Option<T>, msg: impl Into<String>) -> Result<T, Self::Error> {
        match opt {
            Some(val) => Ok(val),
            None => self.fail(msg),
        }
    }
    /// Assert a boolean condition. Returns through `self.fail` if it is not satisfied.
    fn assert(&self, b: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        match b {
            true => Ok(()),
            false => self.fail(msg),
        }
    }
}

///
/// # Unwrapper
///
/// Post-fix form of [`ErrorHelper`] handling for [`Option`]s:
///
/// ```rust
/// use aedt21utils::error::{ErrorHelper, Unwrapper};
///
/// fn first_key(h: &impl ErrorHelper<Error = String>, keys: &[&str]) -> Result<String, String> {
///     let k = keys.first().unwrapper(h, "No keys")?;
///     Ok(k.to_string())
/// }
/// ```
///
/// Not generally implemented by new types;
/// import it and use it on the standard-library [`Option`].
///
pub trait Unwrapper {
    type Ok;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper;
}

impl<T> Unwrapper for Option<T> {
    type Ok = T;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        helper.unwrap(self, msg)
    }
}
