//! Decoding of transform request bodies.
//!
//! The HTTP handlers and the `fafd eval` command accept the same JSON
//! object:
//!
//! ```json
//! {"x": [[1.0, 2.0]], "a": 1.0, "n_iterations": 10, "noise_level": 0.1, "seed": 7}
//! ```
//!
//! Only `x` is required. `noise_level` and `seed` are read for P-FAF and
//! ignored for D-FAF. Unknown keys are ignored. A `null` optional field
//! counts as absent.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::array::{NdArray, json_type_name};
use crate::config::LimitsConfig;
use crate::error::{FafError, FafResult};
use crate::transform::{self, DEFAULT_A, DEFAULT_N_ITERATIONS, DEFAULT_NOISE_LEVEL};

/// Which transform a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Dfaf,
    Pfaf,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Dfaf => "dfaf",
            TransformKind::Pfaf => "pfaf",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "dfaf" => Ok(TransformKind::Dfaf),
            "pfaf" => Ok(TransformKind::Pfaf),
            other => Err(format!("unknown transform '{other}' (expected dfaf or pfaf)")),
        }
    }
}

/// Noise settings for P-FAF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    pub noise_level: f64,
    /// Fixed generator seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

/// A fully validated transform invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub x: NdArray,
    pub a: f64,
    pub n_iterations: u32,
    /// `Some` for P-FAF, `None` for D-FAF.
    pub noise: Option<NoiseParams>,
}

impl TransformRequest {
    /// Validate a JSON request body for the given transform.
    ///
    /// # Errors
    ///
    /// - [`FafError::InvalidInput`] when the body is not an object, `x` is
    ///   missing or malformed, or `x` exceeds `limits.max_elements`.
    /// - [`FafError::InvalidParameter`] for a bad `a`, `n_iterations`,
    ///   `noise_level` or `seed`, when `n_iterations` exceeds
    ///   `limits.max_iterations`, or when elements times iterations
    ///   exceeds `limits.max_work`.
    pub fn decode(kind: TransformKind, body: &Value, limits: &LimitsConfig) -> FafResult<Self> {
        let obj = body.as_object().ok_or_else(|| {
            FafError::InvalidInput(format!(
                "request body must be a JSON object, found {}",
                json_type_name(body)
            ))
        })?;

        let x = match obj.get("x") {
            Some(v) => NdArray::from_json(v)?,
            None => {
                return Err(FafError::InvalidInput(
                    "missing required field `x`".to_string(),
                ));
            }
        };
        if x.len() > limits.max_elements {
            return Err(FafError::InvalidInput(format!(
                "`x` has {} elements, limit is {}",
                x.len(),
                limits.max_elements
            )));
        }

        let a = optional_f64(obj, "a")?.unwrap_or(DEFAULT_A);

        let n_iterations = match optional_u64(obj, "n_iterations")? {
            None => DEFAULT_N_ITERATIONS,
            Some(n) if n > u64::from(limits.max_iterations) => {
                return Err(FafError::InvalidParameter(format!(
                    "`n_iterations` is {n}, limit is {}",
                    limits.max_iterations
                )));
            }
            // Bounded by max_iterations above.
            Some(n) => n as u32,
        };

        let work = (x.len() as u64).checked_mul(u64::from(n_iterations));
        if work.is_none_or(|w| w > limits.max_work) {
            return Err(FafError::InvalidParameter(format!(
                "{} elements x {n_iterations} iterations exceeds the work limit of {}",
                x.len(),
                limits.max_work
            )));
        }

        let noise = match kind {
            TransformKind::Dfaf => None,
            TransformKind::Pfaf => {
                let noise_level = optional_f64(obj, "noise_level")?.unwrap_or(DEFAULT_NOISE_LEVEL);
                transform::validate_noise_level(noise_level)?;
                Some(NoiseParams {
                    noise_level,
                    seed: optional_u64(obj, "seed")?,
                })
            }
        };

        Ok(Self {
            x,
            a,
            n_iterations,
            noise,
        })
    }

    pub fn kind(&self) -> TransformKind {
        if self.noise.is_some() {
            TransformKind::Pfaf
        } else {
            TransformKind::Dfaf
        }
    }

    /// Run the transform. P-FAF uses a `ChaCha8Rng` seeded from the
    /// request's `seed`, or from OS entropy when none was given.
    pub fn run(&self) -> FafResult<NdArray> {
        let mut rng = match self.noise.and_then(|n| n.seed) {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.run_with(&mut rng)
    }

    /// Run the transform drawing any noise from `rng`.
    pub fn run_with<R: Rng + ?Sized>(&self, rng: &mut R) -> FafResult<NdArray> {
        match self.noise {
            None => transform::d_faf(&self.x, self.a, self.n_iterations),
            Some(noise) => transform::p_faf(
                &self.x,
                self.a,
                self.n_iterations,
                noise.noise_level,
                rng,
            ),
        }
    }
}

fn optional_f64(obj: &Map<String, Value>, key: &str) -> FafResult<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
            FafError::InvalidParameter(format!("`{key}` is not representable as f64"))
        }),
        Some(other) => Err(FafError::InvalidParameter(format!(
            "`{key}` must be a number, found {}",
            json_type_name(other)
        ))),
    }
}

fn optional_u64(obj: &Map<String, Value>, key: &str) -> FafResult<Option<u64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            FafError::InvalidParameter(format!(
                "`{key}` must be a non-negative integer, got {n}"
            ))
        }),
        Some(other) => Err(FafError::InvalidParameter(format!(
            "`{key}` must be a non-negative integer, found {}",
            json_type_name(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(kind: TransformKind, body: Value) -> FafResult<TransformRequest> {
        TransformRequest::decode(kind, &body, &LimitsConfig::default())
    }

    #[test]
    fn defaults_applied() {
        let req = decode(TransformKind::Pfaf, json!({"x": [1.0]})).unwrap();
        assert_eq!(req.a, 1.0);
        assert_eq!(req.n_iterations, 10);
        let noise = req.noise.unwrap();
        assert_eq!(noise.noise_level, 0.1);
        assert_eq!(noise.seed, None);
    }

    #[test]
    fn null_optionals_use_defaults() {
        let req = decode(
            TransformKind::Pfaf,
            json!({"x": [1.0], "a": null, "n_iterations": null, "noise_level": null}),
        )
        .unwrap();
        assert_eq!(req.a, 1.0);
        assert_eq!(req.n_iterations, 10);
    }

    #[test]
    fn dfaf_ignores_noise_fields() {
        let req = decode(
            TransformKind::Dfaf,
            json!({"x": [1.0], "noise_level": "loud", "seed": -1}),
        )
        .unwrap();
        assert!(req.noise.is_none());
        assert_eq!(req.kind(), TransformKind::Dfaf);
    }

    #[test]
    fn missing_x_is_invalid_input() {
        for kind in [TransformKind::Dfaf, TransformKind::Pfaf] {
            let err = decode(kind, json!({"a": 2.0})).unwrap_err();
            assert!(matches!(err, FafError::InvalidInput(_)));
        }
    }

    #[test]
    fn non_object_body_is_invalid_input() {
        let err = decode(TransformKind::Dfaf, json!([1.0, 2.0])).unwrap_err();
        assert!(matches!(err, FafError::InvalidInput(_)));
    }

    #[test]
    fn ragged_x_is_invalid_input() {
        let err = decode(TransformKind::Dfaf, json!({"x": [[1.0], [2.0, 3.0]]})).unwrap_err();
        assert!(matches!(err, FafError::InvalidInput(_)));
    }

    #[test]
    fn bad_parameters_rejected() {
        let cases = [
            (TransformKind::Dfaf, json!({"x": [1.0], "a": "1.0"})),
            (TransformKind::Dfaf, json!({"x": [1.0], "n_iterations": -1})),
            (TransformKind::Dfaf, json!({"x": [1.0], "n_iterations": 2.5})),
            (TransformKind::Dfaf, json!({"x": [1.0], "n_iterations": "10"})),
            (TransformKind::Pfaf, json!({"x": [1.0], "noise_level": -0.5})),
            (TransformKind::Pfaf, json!({"x": [1.0], "noise_level": true})),
            (TransformKind::Pfaf, json!({"x": [1.0], "seed": 1.5})),
        ];
        for (kind, body) in cases {
            let err = decode(kind, body.clone()).unwrap_err();
            assert!(matches!(err, FafError::InvalidParameter(_)), "{body}");
        }
    }

    #[test]
    fn limits_enforced() {
        let limits = LimitsConfig {
            max_iterations: 5,
            max_elements: 2,
            max_work: 8,
        };
        let err = TransformRequest::decode(
            TransformKind::Dfaf,
            &json!({"x": [1.0], "n_iterations": 6}),
            &limits,
        )
        .unwrap_err();
        assert!(matches!(err, FafError::InvalidParameter(_)));

        let err = TransformRequest::decode(
            TransformKind::Dfaf,
            &json!({"x": [1.0, 2.0, 3.0]}),
            &limits,
        )
        .unwrap_err();
        assert!(matches!(err, FafError::InvalidInput(_)));

        // Each limit alone allows 2 elements x 5 iterations; the work cap does not.
        let err = TransformRequest::decode(
            TransformKind::Dfaf,
            &json!({"x": [1.0, 2.0], "n_iterations": 5}),
            &limits,
        )
        .unwrap_err();
        assert!(matches!(err, FafError::InvalidParameter(_)));

        assert!(
            TransformRequest::decode(
                TransformKind::Dfaf,
                &json!({"x": [1.0, 2.0], "n_iterations": 4}),
                &limits,
            )
            .is_ok()
        );
    }

    #[test]
    fn default_limits_cap_total_work() {
        let body = json!({"x": vec![0.5; 1_000_000], "n_iterations": 100_000});
        let err = decode(TransformKind::Dfaf, body).unwrap_err();
        assert!(matches!(err, FafError::InvalidParameter(_)));

        let body = json!({"x": vec![0.5; 1_000_000], "n_iterations": 100});
        assert!(decode(TransformKind::Dfaf, body).is_ok());
    }

    #[test]
    fn noise_level_message_shared_with_engine() {
        let body = json!({"x": [1.0], "noise_level": -0.5});
        let err = decode(TransformKind::Pfaf, body).unwrap_err();
        assert_eq!(err, transform::validate_noise_level(-0.5).unwrap_err());
    }

    #[test]
    fn seeded_run_is_reproducible() {
        let body = json!({"x": [0.5, 1.5], "seed": 99});
        let req = decode(TransformKind::Pfaf, body).unwrap();
        assert_eq!(req.run().unwrap(), req.run().unwrap());
    }

    #[test]
    fn run_dispatches_by_kind() {
        let req = decode(
            TransformKind::Dfaf,
            json!({"x": [0.0, 1.0], "a": 1.0, "n_iterations": 1}),
        )
        .unwrap();
        let out = req.run().unwrap();
        assert!((out.as_slice()[1] - 1.0f64.sin()).abs() < 1e-15);
    }

    #[test]
    fn kind_parses_from_str() {
        assert_eq!("dfaf".parse::<TransformKind>().unwrap(), TransformKind::Dfaf);
        assert_eq!("P-FAF".parse::<TransformKind>().unwrap(), TransformKind::Pfaf);
        assert!("faf".parse::<TransformKind>().is_err());
    }
}
