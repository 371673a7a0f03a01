use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV record as read, before any filtering or coercion. Every field
/// is optional; the loader decides what each absence means.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "MainIsland")]
    pub main_island: Option<String>,
    #[serde(rename = "Province")]
    pub province: Option<String>,
    #[serde(rename = "FundingYear")]
    pub funding_year: Option<String>,
    #[serde(rename = "ApprovedBudgetForContract")]
    pub approved_budget_for_contract: Option<String>,
    #[serde(rename = "ContractCost")]
    pub contract_cost: Option<String>,
    #[serde(rename = "StartDate")]
    pub start_date: Option<String>,
    #[serde(rename = "ActualCompletionDate")]
    pub actual_completion_date: Option<String>,
    #[serde(rename = "TypeOfWork")]
    pub type_of_work: Option<String>,
    #[serde(rename = "Contractor")]
    pub contractor: Option<String>,
}

/// A validated project, immutable once built. Text fields default to the
/// empty string and amounts to 0.0, so the report computations never see
/// missing values; only the two dates stay optional.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub funding_year: i32,
    pub region: String,
    pub main_island: String,
    pub province: String,
    pub type_of_work: String,
    pub contractor: String,
    pub approved_budget: f64,
    pub contract_cost: f64,
    pub start_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    /// `approved_budget - contract_cost`; negative on an overrun.
    pub cost_savings: f64,
    /// Days between start and actual completion; 0 whenever either date
    /// is absent (a computed zero, not a missing-value marker).
    pub completion_delay_days: i64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionSummaryRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "MainIsland")]
    #[tabled(rename = "MainIsland")]
    pub main_island: String,
    #[serde(rename = "TotalBudget", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "TotalBudget", display_with = "crate::util::fmt_2dp")]
    pub total_budget: f64,
    #[serde(rename = "MedianSavings", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "MedianSavings", display_with = "crate::util::fmt_2dp")]
    pub median_savings: f64,
    #[serde(rename = "AvgDelay", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "AvgDelay", display_with = "crate::util::fmt_2dp")]
    pub avg_delay: f64,
    #[serde(rename = "HighDelayPct", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "HighDelayPct", display_with = "crate::util::fmt_2dp")]
    pub high_delay_pct: f64,
    #[serde(rename = "EfficiencyScore", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "EfficiencyScore", display_with = "crate::util::fmt_2dp")]
    pub efficiency_score: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ContractorRankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    // The console preview shortens long names; the file keeps them whole.
    #[serde(rename = "Contractor")]
    #[tabled(rename = "Contractor", display_with = "crate::output::truncate_for_display")]
    pub contractor: String,
    #[serde(rename = "TotalCost", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "TotalCost", display_with = "crate::util::fmt_2dp")]
    pub total_cost: f64,
    #[serde(rename = "NumProjects")]
    #[tabled(rename = "NumProjects")]
    pub num_projects: usize,
    #[serde(rename = "AvgDelay", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "AvgDelay", display_with = "crate::util::fmt_2dp")]
    pub avg_delay: f64,
    #[serde(rename = "TotalSavings", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "TotalSavings", display_with = "crate::util::fmt_2dp")]
    pub total_savings: f64,
    #[serde(rename = "ReliabilityIndex", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "ReliabilityIndex", display_with = "crate::util::fmt_2dp")]
    pub reliability_index: f64,
    #[serde(rename = "RiskFlag")]
    #[tabled(rename = "RiskFlag")]
    pub risk_flag: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TypeTrendRow {
    #[serde(rename = "FundingYear")]
    #[tabled(rename = "FundingYear")]
    pub funding_year: i32,
    #[serde(rename = "TypeOfWork")]
    #[tabled(rename = "TypeOfWork")]
    pub type_of_work: String,
    #[serde(rename = "TotalProjects")]
    #[tabled(rename = "TotalProjects")]
    pub total_projects: usize,
    #[serde(rename = "AvgSavings", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "AvgSavings", display_with = "crate::util::fmt_2dp")]
    pub avg_savings: f64,
    #[serde(rename = "OverrunRate", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "OverrunRate", display_with = "crate::util::fmt_2dp")]
    pub overrun_rate: f64,
    #[serde(rename = "YoYChange", serialize_with = "crate::util::ser_2dp")]
    #[tabled(rename = "YoYChange", display_with = "crate::util::fmt_2dp")]
    pub yoy_change: f64,
}

/// Whole-dataset rollup written to `summary.json`. `global_avg_delay` is
/// stored already rounded to two decimals; `total_savings` is truncated
/// to whole units.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_projects: usize,
    pub total_contractors: usize,
    pub total_provinces: usize,
    pub global_avg_delay: f64,
    pub total_savings: i64,
}
