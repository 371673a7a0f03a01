use crate::types::{
    ContractorRankingRow, ProjectRecord, RegionSummaryRow, SummaryStats, TypeTrendRow,
};
use crate::util::{average, median, round2};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Delay beyond which a project counts toward a region's high-delay share.
pub const HIGH_DELAY_THRESHOLD_DAYS: i64 = 30;
/// Assumed maximum tolerable delay; normalizes the contractor delay term.
pub const DELAY_TOLERANCE_DAYS: f64 = 90.0;
/// Reliability below this marks a contractor as high risk.
pub const RISK_THRESHOLD: f64 = 50.0;
/// Contractors with fewer projects than this are left out of the ranking.
pub const MIN_PROJECTS_FOR_RANKING: usize = 5;
/// Size of the contractor leaderboard.
pub const TOP_CONTRACTORS: usize = 15;
/// Reference year for year-over-year savings comparisons.
pub const BASELINE_YEAR: i32 = 2021;

/// Regional efficiency summary: one row per (region, main island) pair,
/// sorted by efficiency score descending. Ties keep input order.
pub fn generate_report1(data: &[ProjectRecord]) -> Vec<RegionSummaryRow> {
    #[derive(Default)]
    struct Acc {
        region: String,
        main_island: String,
        total_budget: f64,
        savings: Vec<f64>,
        delays: Vec<f64>,
    }

    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in data {
        let key = (r.region.clone(), r.main_island.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Acc {
                region: r.region.clone(),
                main_island: r.main_island.clone(),
                ..Acc::default()
            });
            groups.len() - 1
        });
        let g = &mut groups[slot];
        g.total_budget += r.approved_budget;
        g.savings.push(r.cost_savings);
        g.delays.push(r.completion_delay_days as f64);
    }

    let mut rows: Vec<RegionSummaryRow> = groups
        .into_iter()
        .map(|g| {
            let avg_delay = average(&g.delays);
            let high_delay_pct = (g
                .delays
                .iter()
                .filter(|d| **d > HIGH_DELAY_THRESHOLD_DAYS as f64)
                .count() as f64
                / g.delays.len() as f64)
                * 100.0;
            let median_savings = median(g.savings);
            let efficiency_score = if avg_delay > 0.0 {
                ((median_savings / avg_delay) * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };
            RegionSummaryRow {
                region: g.region,
                main_island: g.main_island,
                total_budget: g.total_budget,
                median_savings,
                avg_delay,
                high_delay_pct,
                efficiency_score,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.efficiency_score
            .partial_cmp(&a.efficiency_score)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Contractor leaderboard: top spenders among contractors with at least
/// `MIN_PROJECTS_FOR_RANKING` projects, ranked by total contract cost.
pub fn generate_report2(data: &[ProjectRecord]) -> Vec<ContractorRankingRow> {
    #[derive(Default)]
    struct Acc {
        contractor: String,
        delays: Vec<f64>,
        total_savings: f64,
        total_cost: f64,
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in data {
        let slot = *index.entry(r.contractor.clone()).or_insert_with(|| {
            groups.push(Acc {
                contractor: r.contractor.clone(),
                ..Acc::default()
            });
            groups.len() - 1
        });
        let g = &mut groups[slot];
        g.delays.push(r.completion_delay_days as f64);
        g.total_savings += r.cost_savings;
        g.total_cost += r.contract_cost;
    }

    groups.retain(|g| g.delays.len() >= MIN_PROJECTS_FOR_RANKING);
    groups.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(Ordering::Equal)
    });

    groups
        .into_iter()
        .take(TOP_CONTRACTORS)
        .enumerate()
        .map(|(idx, g)| {
            let num_projects = g.delays.len();
            let avg_delay = average(&g.delays);
            let reliability_index = if g.total_cost > 0.0 {
                ((1.0 - avg_delay / DELAY_TOLERANCE_DAYS)
                    * (g.total_savings / g.total_cost)
                    * 100.0)
                    .clamp(0.0, 100.0)
            } else {
                0.0
            };
            let risk_flag = if reliability_index < RISK_THRESHOLD {
                "High Risk".to_string()
            } else {
                "Low Risk".to_string()
            };
            ContractorRankingRow {
                rank: idx + 1,
                contractor: g.contractor,
                total_cost: g.total_cost,
                num_projects,
                avg_delay,
                total_savings: g.total_savings,
                reliability_index,
                risk_flag,
            }
        })
        .collect()
}

/// Cost-overrun trend per (funding year, type of work), with savings
/// compared year-over-year against the same work type's baseline year.
pub fn generate_report3(data: &[ProjectRecord]) -> Vec<TypeTrendRow> {
    #[derive(Default)]
    struct Acc {
        funding_year: i32,
        type_of_work: String,
        savings: Vec<f64>,
    }

    let mut index: HashMap<(i32, String), usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in data {
        let key = (r.funding_year, r.type_of_work.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Acc {
                funding_year: r.funding_year,
                type_of_work: r.type_of_work.clone(),
                ..Acc::default()
            });
            groups.len() - 1
        });
        groups[slot].savings.push(r.cost_savings);
    }

    let mut baselines: HashMap<String, f64> = HashMap::new();
    for g in &groups {
        if g.funding_year == BASELINE_YEAR {
            baselines.insert(g.type_of_work.clone(), average(&g.savings));
        }
    }

    let mut rows: Vec<TypeTrendRow> = groups
        .into_iter()
        .map(|g| {
            let total_projects = g.savings.len();
            let avg_savings = average(&g.savings);
            let overrun_rate = (g.savings.iter().filter(|s| **s < 0.0).count() as f64
                / total_projects as f64)
                * 100.0;
            // A missing baseline and a zero baseline both read as no
            // change.
            let yoy_change = if g.funding_year == BASELINE_YEAR {
                0.0
            } else {
                match baselines.get(&g.type_of_work) {
                    Some(&baseline) if baseline != 0.0 => {
                        ((avg_savings - baseline) / baseline) * 100.0
                    }
                    _ => 0.0,
                }
            };
            TypeTrendRow {
                funding_year: g.funding_year,
                type_of_work: g.type_of_work,
                total_projects,
                avg_savings,
                overrun_rate,
                yoy_change,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.funding_year.cmp(&b.funding_year).then_with(|| {
            b.avg_savings
                .partial_cmp(&a.avg_savings)
                .unwrap_or(Ordering::Equal)
        })
    });
    rows
}

/// Scalar rollup over the whole collection, independent of the report
/// tables.
pub fn generate_summary(data: &[ProjectRecord]) -> SummaryStats {
    let contractors: HashSet<&str> = data.iter().map(|r| r.contractor.as_str()).collect();
    let provinces: HashSet<&str> = data.iter().map(|r| r.province.as_str()).collect();
    let delays: Vec<f64> = data
        .iter()
        .map(|r| r.completion_delay_days as f64)
        .collect();
    let total_savings: f64 = data.iter().map(|r| r.cost_savings).sum();
    SummaryStats {
        total_projects: data.len(),
        total_contractors: contractors.len(),
        total_provinces: provinces.len(),
        global_avg_delay: round2(average(&delays)),
        total_savings: total_savings as i64,
    }
}
