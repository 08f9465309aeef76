use serde::{Deserialize, Serialize};
use statrs::function::erf::{erf, erf_inv};
use statrs::function::gamma::gamma_ur;
use statrs::statistics::Statistics;

/// Outcome of a hypothesis test. `statistic` is test-specific (T for
/// Wilcoxon, H for Kruskal-Wallis, W for Shapiro-Wilk).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(Statistics::mean(values.iter()))
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        None
    } else {
        Some(Statistics::std_dev(values.iter()))
    }
}

pub fn max(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(Statistics::max(values.iter()))
    }
}

/// 1-based ranks with ties assigned the mean of the positions they span.
pub fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Average of the 1-based positions i+1 ..= j+1.
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Sum of t^3 - t over tie groups; feeds the variance corrections below.
fn tie_term(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut term = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        term += t * t * t - t;
        i = j + 1;
    }
    term
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / 2.0_f64.sqrt()))
}

fn normal_quantile(p: f64) -> f64 {
    2.0_f64.sqrt() * erf_inv(2.0 * p - 1.0)
}

/// Two-sided Wilcoxon signed-rank test on paired samples, normal
/// approximation with tie correction. Zero differences are dropped first.
/// Returns `None` when the samples cannot be paired or every pair is tied.
pub fn wilcoxon_signed_rank(left: &[f64], right: &[f64]) -> Option<TestResult> {
    if left.is_empty() || left.len() != right.len() {
        return None;
    }
    let diffs: Vec<f64> = left
        .iter()
        .zip(right.iter())
        .map(|(l, r)| l - r)
        .filter(|d| *d != 0.0)
        .collect();
    if diffs.is_empty() {
        return None;
    }
    let n = diffs.len() as f64;
    let abs_diffs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = midranks(&abs_diffs);
    let w_plus: f64 = diffs
        .iter()
        .zip(ranks.iter())
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let w_minus: f64 = diffs
        .iter()
        .zip(ranks.iter())
        .filter(|(d, _)| **d < 0.0)
        .map(|(_, r)| r)
        .sum();
    let statistic = w_plus.min(w_minus);
    let mean = n * (n + 1.0) / 4.0;
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_term(&abs_diffs) / 48.0;
    if variance <= 0.0 {
        return None;
    }
    let z = (statistic - mean) / variance.sqrt();
    let p_value = (2.0 * normal_cdf(z)).min(1.0);
    Some(TestResult { statistic, p_value })
}

/// Kruskal-Wallis H test across independent groups, with the usual tie
/// correction and a chi-squared upper tail on k - 1 degrees of freedom.
/// Returns `None` for fewer than two non-empty groups or all-equal data.
pub fn kruskal_wallis(groups: &[Vec<f64>]) -> Option<TestResult> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    if groups.len() < 2 {
        return None;
    }
    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    let ranks = midranks(&pooled);
    let mut h = 0.0;
    let mut offset = 0;
    for group in &groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        h += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }
    h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);
    let correction = 1.0 - tie_term(&pooled) / (n * n * n - n);
    if correction <= 0.0 {
        return None;
    }
    let statistic = h / correction;
    let df = (groups.len() - 1) as f64;
    let p_value = if statistic <= 0.0 {
        1.0
    } else {
        gamma_ur(df / 2.0, statistic / 2.0)
    };
    Some(TestResult { statistic, p_value })
}

/// Shapiro-Wilk normality test after Royston's AS R94 algorithm. Supports
/// n >= 3; returns `None` below that or when the sample has no spread.
pub fn shapiro_wilk(values: &[f64]) -> Option<TestResult> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let sample_mean = Statistics::mean(x.iter());
    let ssq: f64 = x.iter().map(|v| (v - sample_mean).powi(2)).sum();
    if ssq <= 0.0 {
        return None;
    }

    // Expected normal order statistics via the Blom approximation.
    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| normal_quantile((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let m2: f64 = m.iter().map(|v| v * v).sum();

    let mut a = vec![0.0; n];
    if n == 3 {
        a[2] = 0.5_f64.sqrt();
        a[0] = -a[2];
    } else {
        let u = 1.0 / nf.sqrt();
        let a_n = m[n - 1] / m2.sqrt() + 0.221157 * u - 0.147981 * u.powi(2)
            - 2.071190 * u.powi(3)
            + 4.434685 * u.powi(4)
            - 2.706056 * u.powi(5);
        let (phi, inner) = if n > 5 {
            let a_n1 = m[n - 2] / m2.sqrt() + 0.042981 * u - 0.293762 * u.powi(2)
                - 1.752461 * u.powi(3)
                + 5.682633 * u.powi(4)
                - 3.582633 * u.powi(5);
            a[n - 2] = a_n1;
            a[1] = -a_n1;
            let phi = (m2 - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
                / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
            (phi, 2..n - 2)
        } else {
            let phi = (m2 - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
            (phi, 1..n - 1)
        };
        a[n - 1] = a_n;
        a[0] = -a_n;
        for i in inner {
            a[i] = m[i] / phi.sqrt();
        }
    }

    let numerator: f64 = a.iter().zip(x.iter()).map(|(ai, xi)| ai * xi).sum();
    let w = (numerator * numerator / ssq).min(1.0);

    let p_value = if n == 3 {
        let stqr = 0.75_f64.sqrt().asin();
        ((6.0 / std::f64::consts::PI) * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0)
    } else if w >= 1.0 {
        1.0
    } else if n <= 11 {
        let gamma = -2.273 + 0.459 * nf;
        let y = (1.0 - w).ln();
        if y >= gamma {
            0.0
        } else {
            let y = -(gamma - y).ln();
            let mu = 0.5440 - 0.39978 * nf + 0.025054 * nf.powi(2) - 0.0006714 * nf.powi(3);
            let sigma =
                (1.3822 - 0.77857 * nf + 0.062767 * nf.powi(2) - 0.0020322 * nf.powi(3)).exp();
            1.0 - normal_cdf((y - mu) / sigma)
        }
    } else {
        let ln_n = nf.ln();
        let y = (1.0 - w).ln();
        let mu = -1.5861 - 0.31082 * ln_n - 0.083751 * ln_n.powi(2) + 0.0038915 * ln_n.powi(3);
        let sigma = (-0.4803 - 0.082676 * ln_n + 0.0030302 * ln_n.powi(2)).exp();
        1.0 - normal_cdf((y - mu) / sigma)
    };

    Some(TestResult {
        statistic: w,
        p_value,
    })
}
