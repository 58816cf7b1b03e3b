//! Shape inference for parameterized topologies.
//!
//! Mesh2D/Torus2D accept a free-form parameter string naming the grid shape
//! and Butterfly one naming its radix/stage structure. This module parses
//! those strings and fills in whatever was omitted from the device count,
//! so a configuration can say as little as `Mesh2D` and still get a
//! well-defined near-square layout.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::TopologyError;
use crate::types::TopologyKind;

/// Grid shape of a 2-D mesh or torus. Invariant: `rows * cols == npus_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

/// Branching structure of a butterfly network.
/// Invariant: `radix >= 2`, `stages >= 1`, `radix^stages == npus_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButterflySpec {
    pub radix: usize,
    pub stages: usize,
}

/// Compiled regex patterns for the parameter grammar
struct ParamPatterns {
    /// Match: "key = value" inside one comma-separated token
    key_value: Regex,
}

impl ParamPatterns {
    fn new() -> Self {
        Self {
            key_value: Regex::new(r"^([A-Za-z]+)\s*=\s*(.*)$").expect("Invalid key_value regex"),
        }
    }
}

static PATTERNS: LazyLock<ParamPatterns> = LazyLock::new(ParamPatterns::new);

/// Parse the shape parameter of a Mesh2D topology.
///
/// Accepts `"RxC"`, comma-separated `rows=`/`cols=` pairs, or an empty
/// string meaning "infer a near-square layout".
pub fn parse_mesh2d_shape(param: &str, npus_count: usize) -> Result<GridShape, TopologyError> {
    assert!(npus_count > 1);
    parse_grid_like_shape(param, npus_count, TopologyKind::Mesh2D)
}

/// Parse the shape parameter of a Torus2D topology. Same grammar as
/// [`parse_mesh2d_shape`].
pub fn parse_torus2d_shape(param: &str, npus_count: usize) -> Result<GridShape, TopologyError> {
    assert!(npus_count > 1);
    parse_grid_like_shape(param, npus_count, TopologyKind::Torus2D)
}

/// Parse the radix/stages parameter of a Butterfly topology.
///
/// Accepts comma-separated `radix=`/`stages=` pairs (with `fanout`/`r` and
/// `stage`/`levels`/`s` as aliases). Omitted values are derived from the
/// device count.
pub fn parse_butterfly_spec(param: &str, npus_count: usize) -> Result<ButterflySpec, TopologyError> {
    assert!(npus_count > 1);

    let kind = TopologyKind::Butterfly;
    let mut radix_hint = None;
    let mut stages_hint = None;

    for token in param.trim().split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let Some(caps) = PATTERNS.key_value.captures(token) else {
            continue;
        };
        let key = caps[1].to_ascii_lowercase();
        let value = caps[2].trim().to_string();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "radix" | "fanout" | "r" => radix_hint = Some(parse_positive(&value, kind, "radix")?),
            "stages" | "stage" | "levels" | "s" => {
                stages_hint = Some(parse_positive(&value, kind, "stages")?)
            }
            _ => {}
        }
    }

    finalize_butterfly_spec(npus_count, radix_hint, stages_hint)
}

/// Parse one token as a strictly positive integer.
fn parse_positive(
    token: &str,
    kind: TopologyKind,
    field: &'static str,
) -> Result<usize, TopologyError> {
    let value: i64 = token.parse().map_err(|_| TopologyError::InvalidParameter {
        kind,
        field,
        value: token.to_string(),
    })?;
    if value <= 0 {
        return Err(TopologyError::NonPositiveParameter { kind, field, value });
    }
    Ok(value as usize)
}

/// Shared grid grammar for Mesh2D and Torus2D.
fn parse_grid_like_shape(
    param: &str,
    npus_count: usize,
    kind: TopologyKind,
) -> Result<GridShape, TopologyError> {
    let cleaned = param.trim().to_ascii_lowercase();
    let mut rows = None;
    let mut cols = None;

    if !cleaned.is_empty() {
        // "RxC" form, only when no key=value pair is present. A side left
        // empty ("4x", "x8") counts as no hint at all.
        if let Some(x_pos) = cleaned.find('x').filter(|_| !cleaned.contains('=')) {
            let lhs = cleaned[..x_pos].trim();
            let rhs = cleaned[x_pos + 1..].trim();
            if !lhs.is_empty() && !rhs.is_empty() {
                rows = Some(parse_positive(lhs, kind, "rows")?);
                cols = Some(parse_positive(rhs, kind, "cols")?);
            }
        } else {
            for token in cleaned.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let Some(caps) = PATTERNS.key_value.captures(token) else {
                    continue;
                };
                let key = caps[1].to_string();
                let value = caps[2].trim().to_string();
                match key.as_str() {
                    "rows" | "row" | "r" => rows = Some(parse_positive(&value, kind, "rows")?),
                    "cols" | "columns" | "col" | "c" => {
                        cols = Some(parse_positive(&value, kind, "cols")?)
                    }
                    _ => {}
                }
            }
        }
    }

    finalize_grid_shape(npus_count, rows, cols, kind)
}

/// Resolve grid hints into a concrete shape.
fn finalize_grid_shape(
    npus_count: usize,
    rows_hint: Option<usize>,
    cols_hint: Option<usize>,
    kind: TopologyKind,
) -> Result<GridShape, TopologyError> {
    if let (Some(rows), Some(cols)) = (rows_hint, cols_hint) {
        if rows * cols != npus_count {
            return Err(TopologyError::GridShapeMismatch {
                kind,
                rows,
                cols,
                npus_count,
            });
        }
        return Ok(GridShape { rows, cols });
    }

    if let Some(rows) = rows_hint {
        if npus_count % rows != 0 {
            return Err(TopologyError::NonDividingParameter {
                kind,
                field: "rows",
                value: rows,
                npus_count,
            });
        }
        return Ok(GridShape {
            rows,
            cols: npus_count / rows,
        });
    }

    if let Some(cols) = cols_hint {
        if npus_count % cols != 0 {
            return Err(TopologyError::NonDividingParameter {
                kind,
                field: "cols",
                value: cols,
                npus_count,
            });
        }
        return Ok(GridShape {
            rows: npus_count / cols,
            cols,
        });
    }

    // No hints: start from the square root and walk down to the nearest
    // divisor, which biases toward rows <= cols. A degenerate 1xN strip is
    // acceptable for prime device counts.
    let mut rows = (npus_count as f64).sqrt() as usize;
    while rows > 1 && npus_count % rows != 0 {
        rows -= 1;
    }
    let cols = npus_count / rows;
    debug!("{} shape inferred as {}x{} for {} NPUs", kind, rows, cols, npus_count);
    Ok(GridShape { rows, cols })
}

/// Resolve butterfly hints into a concrete spec.
fn finalize_butterfly_spec(
    npus_count: usize,
    radix_hint: Option<usize>,
    stages_hint: Option<usize>,
) -> Result<ButterflySpec, TopologyError> {
    if let Some(radix) = radix_hint {
        if radix <= 1 {
            return Err(TopologyError::RadixTooSmall { value: radix });
        }
    }

    match (radix_hint, stages_hint) {
        (Some(radix), Some(stages)) => {
            if pow_int(radix, stages) != Some(npus_count) {
                return Err(TopologyError::ButterflySpecMismatch {
                    radix,
                    stages,
                    npus_count,
                });
            }
            Ok(ButterflySpec { radix, stages })
        }
        (Some(radix), None) => {
            let mut remaining = npus_count;
            let mut stages = 0;
            while remaining % radix == 0 {
                remaining /= radix;
                stages += 1;
                if remaining == 1 {
                    break;
                }
            }
            if remaining != 1 {
                return Err(TopologyError::NotPowerOfRadix { npus_count, radix });
            }
            Ok(ButterflySpec { radix, stages })
        }
        (None, Some(stages)) => {
            // Rounded real-valued estimate with no corrective search: an
            // inexact guess is reported rather than broadened.
            let radix = (npus_count as f64).powf(1.0 / stages as f64).round() as usize;
            if pow_int(radix, stages) != Some(npus_count) {
                return Err(TopologyError::InexactStagesGuess {
                    npus_count,
                    radix,
                    stages,
                });
            }
            Ok(ButterflySpec { radix, stages })
        }
        (None, None) => {
            let spec = factorize_butterfly(npus_count).unwrap_or(ButterflySpec {
                radix: npus_count,
                stages: 1,
            });
            debug!(
                "Butterfly spec inferred as radix {} with {} stages for {} NPUs",
                spec.radix, spec.stages, npus_count
            );
            Ok(spec)
        }
    }
}

/// Search radices from 2 upward for the first exact factorization of the
/// device count. The smallest valid radix wins.
fn factorize_butterfly(npus_count: usize) -> Option<ButterflySpec> {
    if npus_count <= 1 {
        return None;
    }

    for radix in 2..=npus_count {
        let mut remaining = npus_count;
        let mut stages = 0;
        while remaining % radix == 0 {
            remaining /= radix;
            stages += 1;
        }
        if remaining == 1 && stages >= 1 {
            return Some(ButterflySpec { radix, stages });
        }
    }

    None
}

/// Overflow-checked integer exponentiation.
fn pow_int(base: usize, exp: usize) -> Option<usize> {
    (base as u128)
        .checked_pow(exp as u32)
        .and_then(|value| usize::try_from(value).ok())
}
