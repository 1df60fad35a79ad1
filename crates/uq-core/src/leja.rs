//! Leja quadrature: nested nodes chosen greedily, weights by moment matching.
//!
//! Node selection starts from the support bounds and the mean. Each step
//! adds the point maximizing `sqrt(pdf(x)) * Π|x - x_i|`, searching every
//! gap between existing points with a bounded scalar minimizer. Because each
//! step only appends, the rule of order `k` is contained in the rule of
//! order `k + 1`.

use std::str::FromStr;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uq_common::{Error, RecurrenceAlgorithm, Result, SubRule};
use uq_config::LejaSettings;
use uq_math::{fminbound, invert, BoundedMinimum, DEFAULT_MAX_EVALUATIONS, DEFAULT_XTOL};

use crate::combine::combine_rules;
use crate::distribution::Distribution;
use crate::quadrature::QuadratureRule;
use crate::recurrence::{construct_recurrence_coefficients, RecurrenceOptions};

/// Rule order, shared by every dimension or given per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Order {
    Uniform(usize),
    /// Non-positive entries behave as order 0.
    PerDimension(Vec<i64>),
}

impl Order {
    /// One order per dimension.
    pub fn per_dimension(&self, dim: usize) -> Result<Vec<usize>> {
        match self {
            Order::Uniform(order) => Ok(vec![*order; dim]),
            Order::PerDimension(orders) => {
                if orders.len() != dim {
                    return Err(Error::DimensionMismatch {
                        expected: dim,
                        actual: orders.len(),
                    });
                }
                Ok(orders
                    .iter()
                    .map(|&k| usize::try_from(k).unwrap_or(0))
                    .collect())
            }
        }
    }
}

impl From<usize> for Order {
    fn from(order: usize) -> Self {
        Order::Uniform(order)
    }
}

/// `"3"` is a uniform order, `"2,1"` a per-dimension list.
impl FromStr for Order {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |p: &str| {
            p.trim()
                .parse::<i64>()
                .map_err(|_| Error::InvalidArgument(format!("bad order {p:?}")))
        };
        if s.contains(',') {
            return Ok(Order::PerDimension(
                s.split(',').map(parse).collect::<Result<_>>()?,
            ));
        }
        let order = parse(s)?;
        Ok(Order::Uniform(usize::try_from(order).unwrap_or(0)))
    }
}

/// Tuning of the node search and the weight solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LejaOptions {
    /// Absolute tolerance of the bounded minimizer.
    pub xtol: f64,
    /// Objective evaluation cap per gap search.
    pub max_evaluations: usize,
    /// Auxiliary samples per node when the basis must be discretized.
    pub auxiliary_factor: usize,
    pub auxiliary_rule: SubRule,
}

impl Default for LejaOptions {
    fn default() -> Self {
        LejaOptions {
            xtol: DEFAULT_XTOL,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            auxiliary_factor: 100,
            auxiliary_rule: SubRule::ClenshawCurtis,
        }
    }
}

impl From<&LejaSettings> for LejaOptions {
    fn from(settings: &LejaSettings) -> Self {
        LejaOptions {
            xtol: settings.xtol,
            max_evaluations: settings.max_evaluations,
            auxiliary_factor: settings.auxiliary_factor,
            auxiliary_rule: settings.auxiliary_rule,
        }
    }
}

fn require_univariate(dist: &dyn Distribution) -> Result<()> {
    if dist.dim() != 1 {
        return Err(Error::DimensionMismatch {
            expected: 1,
            actual: dist.dim(),
        });
    }
    Ok(())
}

/// Leja nodes of `order` for a univariate distribution, ascending.
///
/// The mean is always included, so `order + 1` nodes are returned.
pub fn build_leja_nodes(
    dist: &dyn Distribution,
    order: usize,
    options: &LejaOptions,
) -> Result<Vec<f64>> {
    require_univariate(dist)?;
    let (lower, upper) = dist.range();
    let mean = dist.mom(&[1])?;
    if !(lower[0] < mean && mean < upper[0]) {
        return Err(Error::InvalidArgument(format!(
            "mean {mean} is not inside the support [{}, {}]",
            lower[0], upper[0]
        )));
    }

    let mut anchors = vec![lower[0], mean, upper[0]];
    for step in 0..order {
        let interior = anchors[1..anchors.len() - 1].to_vec();
        let objective = |x: f64| {
            let spread: f64 = interior.iter().map(|y| (x - y).abs()).product();
            -dist.pdf(&[x]).sqrt() * spread
        };

        let mut best: Option<(usize, BoundedMinimum)> = None;
        for (gap, pair) in anchors.windows(2).enumerate() {
            let found = fminbound(
                &objective,
                pair[0],
                pair[1],
                options.xtol,
                options.max_evaluations,
            )
            .map_err(|e| Error::Numerical(e.to_string()))?;
            if !found.converged {
                warn!(
                    step,
                    gap,
                    evaluations = found.evaluations,
                    "leja gap search hit the evaluation cap"
                );
            }
            best = lower_gap(best, (gap, found));
        }

        let Some((gap, found)) = best else {
            break;
        };
        debug!(step, node = found.x, objective = found.fx, "inserted leja node");
        anchors.insert(gap + 1, found.x);
    }

    anchors.pop();
    anchors.remove(0);
    Ok(anchors)
}

/// Weights making the rule exact for the first `nodes.len()` orthogonal
/// polynomials of `dist`.
pub fn solve_leja_weights(
    nodes: &[f64],
    dist: &dyn Distribution,
    options: &LejaOptions,
) -> Result<Vec<f64>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    require_univariate(dist)?;
    let n = nodes.len();

    let recurrence = RecurrenceOptions {
        rule: options.auxiliary_rule,
        accuracy: options.auxiliary_factor.saturating_mul(n),
        algorithm: RecurrenceAlgorithm::Analytical,
    };
    let coefficients = construct_recurrence_coefficients(n - 1, dist, &recurrence)?;
    let coefficients = coefficients
        .first()
        .ok_or_else(|| Error::UnsupportedRecurrence("no recurrence for distribution".to_string()))?;

    let basis: Vec<Vec<f64>> = nodes.iter().map(|&x| coefficients.orthonormal(x)).collect();
    let vandermonde = DMatrix::from_fn(n, n, |i, j| basis[j][i]);
    let inverse = invert(&vandermonde).map_err(|e| Error::SingularBasis(e.to_string()))?;

    // ∫ q_0 dμ = sqrt(β_0)
    let scale = coefficients.beta()[0].sqrt();
    Ok(inverse.column(0).iter().map(|w| w * scale).collect())
}

/// Leja rule for `dist`, tensor-combined across dimensions.
pub fn generate_leja(
    order: &Order,
    dist: &dyn Distribution,
    options: &LejaOptions,
) -> Result<QuadratureRule> {
    let dim = dist.dim();
    if dim > 1 && dist.has_dependencies() {
        return Err(Error::Dependency(
            "Leja rules require independent marginals".to_string(),
        ));
    }
    let orders = order.per_dimension(dim)?;
    let marginals = dist.marginals()?;

    let mut abscissas = Vec::with_capacity(dim);
    let mut weights = Vec::with_capacity(dim);
    for (marginal, &k) in marginals.into_iter().zip(&orders) {
        let nodes = build_leja_nodes(marginal, k, options)?;
        weights.push(solve_leja_weights(&nodes, marginal, options)?);
        abscissas.push(nodes);
    }

    let rule = combine_rules(&abscissas, &weights)?;
    info!(?orders, dim, nodes = rule.len(), "generated Leja rule");
    Ok(rule)
}

/// Keeps the earlier gap unless the candidate is strictly lower.
fn lower_gap(
    best: Option<(usize, BoundedMinimum)>,
    candidate: (usize, BoundedMinimum),
) -> Option<(usize, BoundedMinimum)> {
    match best {
        Some(kept) if candidate.1.fx >= kept.1.fx || candidate.1.fx.is_nan() => Some(kept),
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Joint, JointComponent, Marginal};

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= tol, "{actual:?} != {expected:?}");
        }
    }

    fn unit() -> Marginal {
        Marginal::uniform(0.0, 1.0).unwrap()
    }

    fn rule_1d(order: usize, dist: &Marginal) -> (Vec<f64>, Vec<f64>) {
        let options = LejaOptions::default();
        let nodes = build_leja_nodes(dist, order, &options).unwrap();
        let weights = solve_leja_weights(&nodes, dist, &options).unwrap();
        (nodes, weights)
    }

    #[test]
    fn uniform_reference_orders() {
        let (x, w) = rule_1d(0, &unit());
        assert_eq!(x, vec![0.5]);
        assert_close(&w, &[1.0], 1e-14);

        let (x, w) = rule_1d(1, &unit());
        assert_close(&x, &[0.5, 1.0], 1e-4);
        assert_close(&w, &[1.0, 0.0], 1e-12);

        let (x, w) = rule_1d(2, &unit());
        assert_close(&x, &[0.0, 0.5, 1.0], 1e-4);
        assert_close(&w, &[0.167, 0.667, 0.167], 1e-3);

        let (x, w) = rule_1d(3, &unit());
        assert_close(&x, &[0.0, 0.5, 0.789, 1.0], 1e-3);
        assert_close(&w, &[0.167, 0.667, 0.0, 0.167], 1e-3);

        let (x, w) = rule_1d(4, &unit());
        assert_close(&x, &[0.0, 0.171, 0.5, 0.789, 1.0], 1e-3);
        assert_close(&w, &[0.043, 0.289, 0.316, 0.28, 0.072], 1e-3);
    }

    #[test]
    fn normal_order_three_reference() {
        let (x, w) = rule_1d(3, &Marginal::normal(0.0, 1.0).unwrap());
        assert_close(&x, &[-2.7173, -1.4142, 0.0, 1.7635], 1e-3);
        assert_close(&w, &[0.022, 0.1629, 0.6506, 0.1645], 1e-3);
    }

    #[test]
    fn nodes_are_nested() {
        let dist = Marginal::beta(2.0, 5.0, 0.0, 1.0).unwrap();
        let options = LejaOptions::default();
        let mut previous = build_leja_nodes(&dist, 0, &options).unwrap();
        for order in 1..6 {
            let nodes = build_leja_nodes(&dist, order, &options).unwrap();
            assert_eq!(nodes.len(), order + 1);
            assert!(nodes.windows(2).all(|p| p[0] < p[1]));
            assert!(previous.iter().all(|x| nodes.contains(x)), "{previous:?} ⊄ {nodes:?}");
            previous = nodes;
        }
    }

    #[test]
    fn weights_integrate_low_degree_polynomials() {
        let dist = Marginal::gamma(2.0, 1.0).unwrap();
        let (x, w) = rule_1d(4, &dist);
        for k in 0..5u32 {
            let approx: f64 = x.iter().zip(&w).map(|(x, w)| w * x.powi(k as i32)).sum();
            let exact = dist.raw_moment(k);
            assert!((approx - exact).abs() <= 1e-8 * exact.max(1.0), "k={k}");
        }
    }

    #[test]
    fn triangular_uses_discretized_basis() {
        let dist = Marginal::triangular(-1.0, 0.0, 1.0).unwrap();
        let (_, w) = rule_1d(3, &dist);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn empty_nodes_give_empty_weights() {
        let weights = solve_leja_weights(&[], &unit(), &LejaOptions::default()).unwrap();
        assert!(weights.is_empty());
    }

    #[test]
    fn repeated_nodes_are_singular() {
        let err = solve_leja_weights(&[0.5, 0.5], &unit(), &LejaOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SingularBasis(_)));
    }

    #[test]
    fn dependent_joint_is_rejected() {
        let dist = Joint::new(vec![
            JointComponent::independent(unit()),
            JointComponent::shifted(unit(), 0),
        ])
        .unwrap();
        let err = generate_leja(&Order::Uniform(1), &dist, &LejaOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Dependency(_)));
    }

    #[test]
    fn per_dimension_orders() {
        let dist = Joint::independent(vec![unit(), Marginal::normal(0.0, 1.0).unwrap()]).unwrap();
        let rule =
            generate_leja(&Order::PerDimension(vec![2, -3]), &dist, &LejaOptions::default())
                .unwrap();
        assert_eq!(rule.len(), 3);
        assert_eq!(rule.abscissas()[1], vec![0.0, 0.0, 0.0]);
        assert!((rule.weight_sum() - 1.0).abs() < 1e-12);

        let err = generate_leja(&Order::PerDimension(vec![1]), &dist, &LejaOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn order_parsing() {
        assert_eq!("3".parse::<Order>().unwrap(), Order::Uniform(3));
        assert_eq!(
            "2, -1".parse::<Order>().unwrap(),
            Order::PerDimension(vec![2, -1])
        );
        assert_eq!("-2".parse::<Order>().unwrap(), Order::Uniform(0));
        assert!("x".parse::<Order>().is_err());
        assert_eq!(Order::PerDimension(vec![0, -5, 2]).per_dimension(3).unwrap(), vec![0, 0, 2]);
    }

    fn minimum(x: f64, fx: f64) -> BoundedMinimum {
        BoundedMinimum {
            x,
            fx,
            evaluations: 1,
            converged: true,
        }
    }

    #[test]
    fn tied_gaps_keep_the_first() {
        let best = lower_gap(None, (0, minimum(0.25, -1.0)));
        let best = lower_gap(best, (1, minimum(0.75, -1.0)));
        let (gap, found) = best.unwrap();
        assert_eq!(gap, 0);
        assert_eq!(found.x, 0.25);
    }

    #[test]
    fn strictly_lower_gap_replaces() {
        let best = lower_gap(None, (0, minimum(0.25, -1.0)));
        let best = lower_gap(best, (1, minimum(0.75, -2.0)));
        assert_eq!(best.unwrap().0, 1);
    }
}
