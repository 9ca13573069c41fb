//! faf-core — the transform engine behind the FAF service.
//!
//! - [`array`]: shape-checked n-dimensional `f64` array with JSON mapping
//! - [`transform`]: the D-FAF and P-FAF recurrences
//! - [`request`]: validation of request bodies shared by the API and CLI
//! - [`config`]: `fafd.toml` parsing

pub mod array;
pub mod config;
pub mod error;
pub mod request;
pub mod transform;

pub use array::NdArray;
pub use config::{FafConfig, LimitsConfig, ServerConfig};
pub use error::{FafError, FafResult};
pub use request::{NoiseParams, TransformKind, TransformRequest};
pub use transform::{d_faf, p_faf};
