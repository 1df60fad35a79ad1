//! Probability weight functions the quadrature generators integrate against.
//!
//! A [`Marginal`] is a primitive one-dimensional family. A [`Joint`] stacks
//! marginals into a multivariate distribution whose components are either
//! independent or shifted by the value of an earlier component.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uq_common::{Error, Result};
use uq_math::{
    beta_pdf, beta_raw_moment, binomial_coefficient, gamma_pdf, gamma_raw_moment,
    gamma_upper_quantile, normal_pdf, normal_raw_moment,
};

/// Half-width of the Normal support, in standard deviations.
pub const NORMAL_SUPPORT_SIGMAS: f64 = 7.5;

/// Survival probability at which the Gamma support is truncated.
pub const GAMMA_SUPPORT_TAIL: f64 = 1e-10;

/// Interface the generators require from a distribution.
pub trait Distribution {
    /// Number of dimensions.
    fn dim(&self) -> usize;

    /// Per-dimension lower and upper support bounds.
    fn range(&self) -> (Vec<f64>, Vec<f64>);

    /// Joint density at `x` (length `dim()`).
    fn pdf(&self, x: &[f64]) -> f64;

    /// Raw moment `E[X_1^k_1 ... X_D^k_D]`.
    fn mom(&self, k: &[u32]) -> Result<f64>;

    /// Whether any component depends on another.
    fn has_dependencies(&self) -> bool;

    /// Per-dimension marginals. Fails when the components are dependent.
    fn marginals(&self) -> Result<Vec<&Marginal>>;
}

/// Primitive one-dimensional distribution families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Marginal {
    Uniform { lower: f64, upper: f64 },
    Normal { mu: f64, sigma: f64 },
    Beta { alpha: f64, beta: f64, lower: f64, upper: f64 },
    Gamma { shape: f64, scale: f64 },
    Exponential { scale: f64 },
    Triangular { lower: f64, mode: f64, upper: f64 },
}

fn check(ok: bool, what: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidDistribution(what()))
    }
}

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl Marginal {
    pub fn uniform(lower: f64, upper: f64) -> Result<Self> {
        check(finite(&[lower, upper]) && lower < upper, || {
            format!("uniform bounds must satisfy lower < upper, got [{lower}, {upper}]")
        })?;
        Ok(Marginal::Uniform { lower, upper })
    }

    pub fn normal(mu: f64, sigma: f64) -> Result<Self> {
        check(finite(&[mu, sigma]) && sigma > 0.0, || {
            format!("normal sigma must be > 0, got {sigma}")
        })?;
        Ok(Marginal::Normal { mu, sigma })
    }

    /// Beta(alpha, beta) affinely mapped onto `[lower, upper]`.
    pub fn beta(alpha: f64, beta: f64, lower: f64, upper: f64) -> Result<Self> {
        check(finite(&[alpha, beta]) && alpha > 0.0 && beta > 0.0, || {
            format!("beta shapes must be > 0, got ({alpha}, {beta})")
        })?;
        check(finite(&[lower, upper]) && lower < upper, || {
            format!("beta bounds must satisfy lower < upper, got [{lower}, {upper}]")
        })?;
        Ok(Marginal::Beta {
            alpha,
            beta,
            lower,
            upper,
        })
    }

    pub fn gamma(shape: f64, scale: f64) -> Result<Self> {
        check(finite(&[shape, scale]) && shape > 0.0 && scale > 0.0, || {
            format!("gamma shape and scale must be > 0, got ({shape}, {scale})")
        })?;
        Ok(Marginal::Gamma { shape, scale })
    }

    pub fn exponential(scale: f64) -> Result<Self> {
        check(scale.is_finite() && scale > 0.0, || {
            format!("exponential scale must be > 0, got {scale}")
        })?;
        Ok(Marginal::Exponential { scale })
    }

    pub fn triangular(lower: f64, mode: f64, upper: f64) -> Result<Self> {
        check(
            finite(&[lower, mode, upper]) && lower < upper && lower <= mode && mode <= upper,
            || format!("triangular requires lower <= mode <= upper, got ({lower}, {mode}, {upper})"),
        )?;
        Ok(Marginal::Triangular { lower, mode, upper })
    }

    /// Family name, as used in `--dist` strings.
    pub fn family(&self) -> &'static str {
        match self {
            Marginal::Uniform { .. } => "uniform",
            Marginal::Normal { .. } => "normal",
            Marginal::Beta { .. } => "beta",
            Marginal::Gamma { .. } => "gamma",
            Marginal::Exponential { .. } => "exponential",
            Marginal::Triangular { .. } => "triangular",
        }
    }

    pub fn lower(&self) -> f64 {
        match *self {
            Marginal::Uniform { lower, .. }
            | Marginal::Beta { lower, .. }
            | Marginal::Triangular { lower, .. } => lower,
            Marginal::Normal { mu, sigma } => mu - NORMAL_SUPPORT_SIGMAS * sigma,
            Marginal::Gamma { .. } | Marginal::Exponential { .. } => 0.0,
        }
    }

    pub fn upper(&self) -> f64 {
        match *self {
            Marginal::Uniform { upper, .. }
            | Marginal::Beta { upper, .. }
            | Marginal::Triangular { upper, .. } => upper,
            Marginal::Normal { mu, sigma } => mu + NORMAL_SUPPORT_SIGMAS * sigma,
            Marginal::Gamma { shape, scale } => {
                gamma_upper_quantile(GAMMA_SUPPORT_TAIL, shape, 1.0 / scale)
            }
            Marginal::Exponential { scale } => {
                gamma_upper_quantile(GAMMA_SUPPORT_TAIL, 1.0, 1.0 / scale)
            }
        }
    }

    /// Density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        match *self {
            Marginal::Uniform { lower, upper } => {
                if (lower..=upper).contains(&x) {
                    1.0 / (upper - lower)
                } else {
                    0.0
                }
            }
            Marginal::Normal { mu, sigma } => normal_pdf(x, mu, sigma),
            Marginal::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => {
                let width = upper - lower;
                beta_pdf((x - lower) / width, alpha, beta) / width
            }
            Marginal::Gamma { shape, scale } => gamma_pdf(x, shape, 1.0 / scale),
            Marginal::Exponential { scale } => gamma_pdf(x, 1.0, 1.0 / scale),
            Marginal::Triangular { lower, mode, upper } => {
                if x < lower || x > upper {
                    0.0
                } else if x < mode {
                    2.0 * (x - lower) / ((upper - lower) * (mode - lower))
                } else if x > mode {
                    2.0 * (upper - x) / ((upper - lower) * (upper - mode))
                } else {
                    2.0 / (upper - lower)
                }
            }
        }
    }

    /// Raw moment `E[X^k]`.
    pub fn raw_moment(&self, k: u32) -> f64 {
        if k == 0 {
            return 1.0;
        }
        match *self {
            Marginal::Uniform { lower, upper } => {
                let p = k as i32 + 1;
                (upper.powi(p) - lower.powi(p)) / (f64::from(k + 1) * (upper - lower))
            }
            Marginal::Normal { mu, sigma } => normal_raw_moment(k, mu, sigma),
            Marginal::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => {
                // E[(lower + width * Y)^k] expanded binomially
                let width = upper - lower;
                (0..=k)
                    .map(|j| {
                        binomial_coefficient(k, j)
                            * lower.powi((k - j) as i32)
                            * width.powi(j as i32)
                            * beta_raw_moment(j, alpha, beta)
                    })
                    .sum()
            }
            Marginal::Gamma { shape, scale } => gamma_raw_moment(k, shape, 1.0 / scale),
            Marginal::Exponential { scale } => gamma_raw_moment(k, 1.0, 1.0 / scale),
            Marginal::Triangular { lower, mode, upper } => {
                triangular_raw_moment(k, lower, mode, upper)
            }
        }
    }
}

/// Integrates x^k against each linear piece of the triangular density.
fn triangular_raw_moment(k: u32, lower: f64, mode: f64, upper: f64) -> f64 {
    let k1 = f64::from(k + 1);
    let k2 = f64::from(k + 2);
    let pw = |x: f64, p: u32| x.powi(p as i32);
    let width = upper - lower;
    let mut total = 0.0;
    if mode > lower {
        let rising = (pw(mode, k + 2) - pw(lower, k + 2)) / k2
            - lower * (pw(mode, k + 1) - pw(lower, k + 1)) / k1;
        total += 2.0 * rising / (width * (mode - lower));
    }
    if upper > mode {
        let falling = upper * (pw(upper, k + 1) - pw(mode, k + 1)) / k1
            - (pw(upper, k + 2) - pw(mode, k + 2)) / k2;
        total += 2.0 * falling / (width * (upper - mode));
    }
    total
}

impl Distribution for Marginal {
    fn dim(&self) -> usize {
        1
    }

    fn range(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![self.lower()], vec![self.upper()])
    }

    fn pdf(&self, x: &[f64]) -> f64 {
        x.first().map_or(0.0, |&v| self.density(v))
    }

    fn mom(&self, k: &[u32]) -> Result<f64> {
        match k {
            [k] => Ok(self.raw_moment(*k)),
            _ => Err(Error::DimensionMismatch {
                expected: 1,
                actual: k.len(),
            }),
        }
    }

    fn has_dependencies(&self) -> bool {
        false
    }

    fn marginals(&self) -> Result<Vec<&Marginal>> {
        Ok(vec![self])
    }
}

impl std::fmt::Display for Marginal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marginal::Uniform { lower, upper } => write!(f, "uniform:{lower},{upper}"),
            Marginal::Normal { mu, sigma } => write!(f, "normal:{mu},{sigma}"),
            Marginal::Beta {
                alpha,
                beta,
                lower,
                upper,
            } => write!(f, "beta:{alpha},{beta},{lower},{upper}"),
            Marginal::Gamma { shape, scale } => write!(f, "gamma:{shape},{scale}"),
            Marginal::Exponential { scale } => write!(f, "exponential:{scale}"),
            Marginal::Triangular { lower, mode, upper } => {
                write!(f, "triangular:{lower},{mode},{upper}")
            }
        }
    }
}

/// Parses `family:p1,p2,...`, e.g. `uniform:0,1` or `beta:2,2,-1,1`.
impl FromStr for Marginal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (family, params) = s.split_once(':').unwrap_or((s, ""));
        let params: Vec<f64> = params
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|_| Error::InvalidArgument(format!("bad parameter {p:?} in {s:?}")))
            })
            .collect::<Result<_>>()?;

        let arity = |allowed: &str| {
            Error::InvalidArgument(format!(
                "{family} takes {allowed} parameters, got {} in {s:?}",
                params.len()
            ))
        };

        match family.trim().to_ascii_lowercase().as_str() {
            "uniform" | "u" => match params[..] {
                [lower, upper] => Marginal::uniform(lower, upper),
                [] => Marginal::uniform(0.0, 1.0),
                _ => Err(arity("0 or 2")),
            },
            "normal" | "n" => match params[..] {
                [mu, sigma] => Marginal::normal(mu, sigma),
                [] => Marginal::normal(0.0, 1.0),
                _ => Err(arity("0 or 2")),
            },
            "beta" => match params[..] {
                [a, b, lower, upper] => Marginal::beta(a, b, lower, upper),
                [a, b] => Marginal::beta(a, b, 0.0, 1.0),
                _ => Err(arity("2 or 4")),
            },
            "gamma" => match params[..] {
                [shape, scale] => Marginal::gamma(shape, scale),
                [shape] => Marginal::gamma(shape, 1.0),
                _ => Err(arity("1 or 2")),
            },
            "exponential" | "exp" => match params[..] {
                [scale] => Marginal::exponential(scale),
                [] => Marginal::exponential(1.0),
                _ => Err(arity("0 or 1")),
            },
            "triangular" => match params[..] {
                [lower, mode, upper] => Marginal::triangular(lower, mode, upper),
                _ => Err(arity("3")),
            },
            other => Err(Error::InvalidArgument(format!(
                "unknown distribution family {other:?}"
            ))),
        }
    }
}

/// How a joint component relates to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependence {
    Independent,
    /// `X_d = X_parent + Y` with `Y` drawn from the component's marginal.
    LocationShifted { parent: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointComponent {
    pub marginal: Marginal,
    pub dependence: Dependence,
}

impl JointComponent {
    pub fn independent(marginal: Marginal) -> Self {
        JointComponent {
            marginal,
            dependence: Dependence::Independent,
        }
    }

    pub fn shifted(marginal: Marginal, parent: usize) -> Self {
        JointComponent {
            marginal,
            dependence: Dependence::LocationShifted { parent },
        }
    }
}

/// Multivariate distribution over stacked components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    components: Vec<JointComponent>,
}

impl Joint {
    /// Parents must refer to earlier components.
    pub fn new(components: Vec<JointComponent>) -> Result<Self> {
        if components.is_empty() {
            return Err(Error::InvalidDistribution(
                "joint distribution needs at least one component".to_string(),
            ));
        }
        for (idx, component) in components.iter().enumerate() {
            if let Dependence::LocationShifted { parent } = component.dependence {
                if parent >= idx {
                    return Err(Error::InvalidDistribution(format!(
                        "component {idx} is shifted by component {parent}, which does not precede it"
                    )));
                }
            }
        }
        Ok(Joint { components })
    }

    pub fn independent(marginals: Vec<Marginal>) -> Result<Self> {
        Self::new(marginals.into_iter().map(JointComponent::independent).collect())
    }

    pub fn components(&self) -> &[JointComponent] {
        &self.components
    }
}

impl Distribution for Joint {
    fn dim(&self) -> usize {
        self.components.len()
    }

    fn range(&self) -> (Vec<f64>, Vec<f64>) {
        let mut lower: Vec<f64> = Vec::with_capacity(self.dim());
        let mut upper: Vec<f64> = Vec::with_capacity(self.dim());
        for component in &self.components {
            let (mut lo, mut hi) = (component.marginal.lower(), component.marginal.upper());
            if let Dependence::LocationShifted { parent } = component.dependence {
                lo += lower[parent];
                hi += upper[parent];
            }
            lower.push(lo);
            upper.push(hi);
        }
        (lower, upper)
    }

    fn pdf(&self, x: &[f64]) -> f64 {
        if x.len() != self.dim() {
            return 0.0;
        }
        self.components
            .iter()
            .zip(x)
            .map(|(component, &value)| match component.dependence {
                Dependence::Independent => component.marginal.density(value),
                Dependence::LocationShifted { parent } => {
                    component.marginal.density(value - x[parent])
                }
            })
            .product()
    }

    fn mom(&self, k: &[u32]) -> Result<f64> {
        if k.len() != self.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                actual: k.len(),
            });
        }
        if self.has_dependencies() {
            return Err(Error::UnsupportedMoment(
                "raw moments of dependent joint distributions are not available".to_string(),
            ));
        }
        Ok(self
            .components
            .iter()
            .zip(k)
            .map(|(component, &order)| component.marginal.raw_moment(order))
            .product())
    }

    fn has_dependencies(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.dependence != Dependence::Independent)
    }

    fn marginals(&self) -> Result<Vec<&Marginal>> {
        if self.has_dependencies() {
            return Err(Error::Dependency(
                "joint distribution has location-shifted components".to_string(),
            ));
        }
        Ok(self.components.iter().map(|c| &c.marginal).collect())
    }
}
