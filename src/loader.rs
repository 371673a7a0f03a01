use crate::types::{ProjectRecord, RawRow};
use crate::util::{days_diff, parse_date_safe, parse_f64_safe, parse_i32_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Funding years in scope; rows outside this window are skipped silently.
pub const FUNDING_YEAR_WINDOW: RangeInclusive<i32> = 2021..=2023;

/// Row failures beyond this many are counted but not individually
/// surfaced.
pub const MAX_ROW_WARNINGS: usize = 5;

/// The dataset column names the loader binds to, in file order.
const EXPECTED_HEADERS: [&str; 10] = [
    "Region",
    "MainIsland",
    "Province",
    "FundingYear",
    "ApprovedBudgetForContract",
    "ContractCost",
    "StartDate",
    "ActualCompletionDate",
    "TypeOfWork",
    "Contractor",
];

/// The one fatal ingestion failure: the source cannot be opened or its
/// header read. Everything past that point is recovered per row.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open dataset {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub rows_read: usize,
    pub error_count: usize,
    pub kept_count: usize,
    /// Human-readable messages for the first `MAX_ROW_WARNINGS` failed
    /// rows, each carrying the 1-based row index.
    pub warnings: Vec<String>,
}

/// Read the dataset at `path`, keep rows funded in the target window,
/// substitute defaults for whatever else is missing, and derive the
/// per-project metrics.
pub fn load_and_clean(path: &str) -> Result<(Vec<ProjectRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::SourceUnavailable {
            path: path.to_string(),
            source,
        })?;

    // Rewrite the header record so serde's exact column names match the
    // file regardless of header casing.
    let headers = rdr
        .headers()
        .map_err(|source| LoadError::SourceUnavailable {
            path: path.to_string(),
            source,
        })?
        .clone();
    rdr.set_headers(canonical_headers(&headers));

    let mut report = LoadReport::default();
    let mut records: Vec<ProjectRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.rows_read += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                report.error_count += 1;
                if report.warnings.len() < MAX_ROW_WARNINGS {
                    report
                        .warnings
                        .push(format!("Error parsing row {}: {}", report.rows_read, e));
                }
                continue;
            }
        };

        // An absent or out-of-window year is not an error, just out of
        // scope.
        let funding_year = match parse_i32_safe(row.funding_year.as_deref()) {
            Some(y) if FUNDING_YEAR_WINDOW.contains(&y) => y,
            _ => continue,
        };

        let approved_budget =
            parse_f64_safe(row.approved_budget_for_contract.as_deref()).unwrap_or(0.0);
        let contract_cost = parse_f64_safe(row.contract_cost.as_deref()).unwrap_or(0.0);
        let start_date = parse_date_safe(row.start_date.as_deref());
        let actual_completion_date = parse_date_safe(row.actual_completion_date.as_deref());

        // The delay is a real zero, not a marker, when either date is
        // missing.
        let completion_delay_days = match (start_date, actual_completion_date) {
            (Some(start), Some(end)) => days_diff(start, end),
            _ => 0,
        };

        records.push(ProjectRecord {
            funding_year,
            region: row.region.unwrap_or_default(),
            main_island: row.main_island.unwrap_or_default(),
            province: row.province.unwrap_or_default(),
            type_of_work: row.type_of_work.unwrap_or_default(),
            contractor: row.contractor.unwrap_or_default(),
            approved_budget,
            contract_cost,
            start_date,
            actual_completion_date,
            cost_savings: approved_budget - contract_cost,
            completion_delay_days,
        });
    }

    report.kept_count = records.len();
    Ok((records, report))
}

fn canonical_headers(raw: &StringRecord) -> StringRecord {
    raw.iter()
        .map(|h| {
            EXPECTED_HEADERS
                .iter()
                .find(|name| name.eq_ignore_ascii_case(h))
                .copied()
                .unwrap_or(h)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Region,MainIsland,Province,FundingYear,ApprovedBudgetForContract,\
                          ContractCost,StartDate,ActualCompletionDate,TypeOfWork,Contractor";

    fn write_fixture(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn load(lines: &[&str]) -> (Vec<ProjectRecord>, LoadReport) {
        let file = write_fixture(lines);
        load_and_clean(file.path().to_str().unwrap()).unwrap()
    }

    #[test]
    fn keeps_exactly_the_rows_with_in_window_years() {
        let (records, report) = load(&[
            "Region I,Luzon,Ilocos Norte,2020,100,90,2020-01-01,2020-02-01,Dike,Alpha Builders",
            "Region I,Luzon,Ilocos Norte,2021,100,90,2021-01-01,2021-02-01,Dike,Alpha Builders",
            "Region I,Luzon,Ilocos Norte,2023,100,90,2023-01-01,2023-02-01,Dike,Alpha Builders",
            "Region I,Luzon,Ilocos Norte,2024,100,90,2024-01-01,2024-02-01,Dike,Alpha Builders",
            "Region I,Luzon,Ilocos Norte,,100,90,2021-01-01,2021-02-01,Dike,Alpha Builders",
            "Region I,Luzon,Ilocos Norte,soon,100,90,2021-01-01,2021-02-01,Dike,Alpha Builders",
        ]);
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.kept_count, 2);
        // Out-of-window and unparsable years are skips, not errors.
        assert_eq!(report.error_count, 0);
        assert!(report.warnings.is_empty());
        assert!(report.kept_count <= report.rows_read);
        assert!(records
            .iter()
            .all(|r| FUNDING_YEAR_WINDOW.contains(&r.funding_year)));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let (records, report) = load(&[",,,2022,,,,,,"]);
        assert_eq!(report.kept_count, 1);
        let r = &records[0];
        assert_eq!(r.region, "");
        assert_eq!(r.main_island, "");
        assert_eq!(r.province, "");
        assert_eq!(r.type_of_work, "");
        assert_eq!(r.contractor, "");
        assert_eq!(r.approved_budget, 0.0);
        assert_eq!(r.contract_cost, 0.0);
        assert_eq!(r.cost_savings, 0.0);
        assert_eq!(r.start_date, None);
        assert_eq!(r.actual_completion_date, None);
        assert_eq!(r.completion_delay_days, 0);
    }

    #[test]
    fn derives_savings_and_delay_from_clean_fields() {
        let (records, _) = load(&[
            "Region V,Luzon,Albay,2022,\"1,500.00\",\"1,200.00\",2022-01-01,2022-03-02,Revetment,Beta Corp",
        ]);
        let r = &records[0];
        assert_eq!(r.approved_budget, 1500.0);
        assert_eq!(r.contract_cost, 1200.0);
        assert_eq!(r.cost_savings, 300.0);
        assert_eq!(r.completion_delay_days, 60);
        assert!(r.completion_delay_days >= 0);
    }

    #[test]
    fn delay_is_zero_when_either_date_is_missing() {
        let (records, _) = load(&[
            "Region V,Luzon,Albay,2022,100,90,2022-01-01,,Revetment,Beta Corp",
            "Region V,Luzon,Albay,2022,100,90,,2022-03-02,Revetment,Beta Corp",
        ]);
        assert!(records[0].start_date.is_some());
        assert!(records[0].actual_completion_date.is_none());
        assert_eq!(records[0].completion_delay_days, 0);
        assert!(records[1].start_date.is_none());
        assert_eq!(records[1].completion_delay_days, 0);
    }

    #[test]
    fn bad_rows_are_counted_and_only_first_five_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        // Invalid UTF-8 in a field makes the row fail deserialization.
        for _ in 0..7 {
            file.write_all(
                b"Region I,Luzon,Ilocos Norte,2021,100,90,2021-01-01,2021-02-01,Dike,Alpha \xff Builders\n",
            )
            .unwrap();
        }
        writeln!(
            file,
            "Region I,Luzon,Ilocos Norte,2021,100,90,2021-01-01,2021-02-01,Dike,Alpha Builders"
        )
        .unwrap();
        file.flush().unwrap();

        let (records, report) = load_and_clean(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.rows_read, 8);
        assert_eq!(report.error_count, 7);
        assert_eq!(report.warnings.len(), MAX_ROW_WARNINGS);
        assert!(report.warnings[0].contains("row 1"));
        assert_eq!(report.kept_count, 1);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let err = load_and_clean("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("not/here.csv"));
    }

    #[test]
    fn header_casing_and_padding_are_tolerated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            " region , MAINISLAND ,Province,fundingyear,ApprovedBudgetForContract,contractcost,StartDate,ActualCompletionDate,TypeOfWork,CONTRACTOR"
        )
        .unwrap();
        writeln!(file, "Region X,Luzon,Aurora,2022,100,80,,,Dike,Gamma Ltd").unwrap();
        file.flush().unwrap();

        let (records, report) = load_and_clean(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.kept_count, 1);
        assert_eq!(records[0].region, "Region X");
        assert_eq!(records[0].contract_cost, 80.0);
        assert_eq!(records[0].contractor, "Gamma Ltd");
    }
}
