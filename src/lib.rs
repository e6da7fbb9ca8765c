//! # Strong Params
//!
//! Allow-list filtering for untrusted, arbitrarily nested request parameters.
//!
//! ## Security Guarantees
//!
//! - **Allow-list only**: a key reaches the result only if a declaration names it
//! - **Shape checked**: scalar declarations never accept arrays, mappings or
//!   arbitrary objects; array declarations accept only arrays of scalars
//! - **Taint marker**: every tree starts unpermitted; the marker survives every
//!   derived view and is only set by `permit` / `permit_all`
//! - **Mass-assignment gate**: [`MassAssignment`] sinks refuse unpermitted trees
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strong_params::{FilterSpec, Parameters, PermitConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let params = Parameters::from_json(serde_json::json!({
//!         "book": {
//!             "title": "Romeo and Juliet",
//!             "admin": true,
//!             "authors": [{ "name": "William Shakespeare", "born": "1564" }]
//!         }
//!     }))?;
//!
//!     let spec: FilterSpec = r#"{"book": ["title", {"authors": ["name"]}]}"#.parse()?;
//!     params.require("book")?;
//!     let permitted = params.permit(&spec, &PermitConfig::from_env()?)?;
//!
//!     assert!(permitted.is_permitted());
//!     println!("{}", serde_json::to_string(&permitted)?);
//!     Ok(())
//! }
//! ```

mod assignment;
mod config;
mod error;
mod filter;
mod input;
mod key;
mod params;
mod permit;
mod require;
mod scalar;
mod unpermitted;
mod value;

pub use assignment::{sanitize_for_mass_assignment, MassAssignment};
pub use config::{PermitConfig, UnpermittedAction, ACTION_ENV_VAR, ENVIRONMENT_ENV_VAR};
pub use error::{ParamsError, ParamsResult};
pub use filter::{Declaration, FilterSpec};
pub use key::{is_fields_for_index, normalize_key, IndexedKeyMatcher};
pub use params::Parameters;
pub use scalar::{is_array_of_permitted_scalars, is_permitted_scalar, Scalar, Symbol, UploadedFile};
pub use unpermitted::{report_unpermitted, unpermitted_keys, LOG_TARGET};
pub use value::Value;
