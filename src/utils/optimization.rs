//! Derivative-free minimization used for model parameter estimation.

use std::cmp::Ordering;

/// Outcome of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Nelder-Mead tuning knobs.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop once the spread of objective values (or the simplex size) drops below this.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Relative size of the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Box constraints, one `(min, max)` per coordinate.
struct Bounds<'a>(Option<&'a [(f64, f64)]>);

impl Bounds<'_> {
    fn clamp(&self, mut point: Vec<f64>) -> Vec<f64> {
        if let Some(bounds) = self.0 {
            for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
                *x = x.clamp(lo, hi);
            }
        }
        point
    }
}

/// Minimize `objective` starting from `initial`, optionally within `bounds`.
///
/// # Example
/// ```
/// use kpi_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
/// assert!((result.optimal_point[0] - 2.0).abs() < 1e-3);
/// assert!((result.optimal_point[1] + 1.0).abs() < 1e-3);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let bounds = Bounds(bounds);
    let eval = |p: &[f64]| {
        let value = objective(p);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let mut vertices: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    vertices.push(bounds.clamp(initial.to_vec()));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        vertex[i] += if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        vertices.push(bounds.clamp(vertex));
    }
    let mut values: Vec<f64> = vertices.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        sort_simplex(&mut vertices, &mut values);

        let best = values[0];
        let worst = values[n];
        let second_worst = values[n - 1];

        let centroid = centroid(&vertices[..n]);
        let size = vertices
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max);
        if (worst - best).abs() < config.tolerance || size < config.tolerance {
            converged = true;
            break;
        }

        let reflected = bounds.clamp(towards(&centroid, &vertices[n], -config.alpha));
        let reflected_value = eval(&reflected);

        if reflected_value < best {
            let expanded = bounds.clamp(towards(&centroid, &reflected, config.gamma));
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                vertices[n] = expanded;
                values[n] = expanded_value;
            } else {
                vertices[n] = reflected;
                values[n] = reflected_value;
            }
            continue;
        }

        if reflected_value < second_worst {
            vertices[n] = reflected;
            values[n] = reflected_value;
            continue;
        }

        // Contract towards the better of the reflected and worst points.
        let (anchor, anchor_value) = if reflected_value < worst {
            (reflected, reflected_value)
        } else {
            (vertices[n].clone(), worst)
        };
        let contracted = bounds.clamp(towards(&centroid, &anchor, config.rho));
        let contracted_value = eval(&contracted);
        if contracted_value < anchor_value {
            vertices[n] = contracted;
            values[n] = contracted_value;
            continue;
        }

        // Shrink everything towards the best vertex.
        let best_vertex = vertices[0].clone();
        for i in 1..=n {
            let shrunk = towards(&best_vertex, &vertices[i], config.sigma);
            vertices[i] = bounds.clamp(shrunk);
            values[i] = eval(&vertices[i]);
        }
    }

    sort_simplex(&mut vertices, &mut values);
    NelderMeadResult {
        optimal_point: vertices.swap_remove(0),
        optimal_value: values[0],
        iterations,
        converged,
    }
}

fn sort_simplex(vertices: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    let sorted_vertices: Vec<Vec<f64>> = order.iter().map(|&i| vertices[i].clone()).collect();
    let sorted_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    *vertices = sorted_vertices;
    *values = sorted_values;
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let dims = vertices[0].len();
    let count = vertices.len() as f64;
    (0..dims)
        .map(|j| vertices.iter().map(|v| v[j]).sum::<f64>() / count)
        .collect()
}

/// `origin + t * (point - origin)`; negative `t` reflects through `origin`.
fn towards(origin: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
