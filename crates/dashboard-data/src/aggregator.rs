//! Per-group summary statistics and best-group selection.

use std::cmp::Ordering;

use dashboard_core::experiment::{ExperimentConfig, Group};
use dashboard_core::models::{
    DataKind, EnvironmentRecord, EnvironmentTable, GrowthRecord, GrowthTable,
};
use dashboard_core::statistic::Statistic;
use serde::Serialize;
use tracing::warn;

use crate::environment::EnvironmentData;
use crate::growth::GrowthData;

// ── Output types ──────────────────────────────────────────────────────────────

/// Environment and growth means of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub target_ec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub temperature: Statistic,
    pub humidity: Statistic,
    pub ph: Statistic,
    /// Mean measured EC, to compare against `target_ec`.
    pub ec: Statistic,
    /// Number of environment log rows.
    pub environment_rows: usize,
    pub fresh_weight: Statistic,
    pub leaf_count: Statistic,
    pub shoot_length: Statistic,
    /// Number of plant individuals (growth rows).
    pub individuals: usize,
}

impl GroupSummary {
    fn build(group: &Group, env: &EnvironmentTable, growth: &GrowthTable) -> Self {
        let env_mean = |f: fn(&EnvironmentRecord) -> Option<f64>| {
            Statistic::mean(env.records.iter().map(f))
        };
        let growth_mean = |f: fn(&GrowthRecord) -> Option<f64>| {
            Statistic::mean(growth.records.iter().map(f))
        };

        Self {
            group: group.name.clone(),
            target_ec: group.target_ec,
            color: group.color.clone(),
            temperature: env_mean(|r| r.temperature),
            humidity: env_mean(|r| r.humidity),
            ph: env_mean(|r| r.ph),
            ec: env_mean(|r| r.ec),
            environment_rows: env.len(),
            fresh_weight: growth_mean(|r| r.fresh_weight),
            leaf_count: growth_mean(|r| r.leaf_count),
            shoot_length: growth_mean(|r| r.shoot_length),
            individuals: growth.len(),
        }
    }
}

/// The group with the highest mean fresh weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestGroup {
    pub group: String,
    pub target_ec: f64,
    pub mean_fresh_weight: f64,
}

/// Experiment-wide figures across every loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Individuals across all growth sheets.
    pub total_individuals: usize,
    /// Pooled mean over every environment row of every group.
    pub mean_temperature: Statistic,
    pub mean_humidity: Statistic,
    /// Groups with complete data.
    pub groups_summarized: usize,
}

/// A non-fatal data-completeness problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationWarning {
    /// The group has environment data but no growth sheet.
    MissingGrowth { group: String },
    /// The group has a growth sheet but no environment data.
    MissingEnvironment { group: String },
    /// A table is keyed by a name that matches no configured group.
    UnknownGroup { name: String, source: DataKind },
}

impl std::fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingGrowth { group } => {
                write!(f, "group '{group}' has no growth data and was excluded")
            }
            Self::MissingEnvironment { group } => {
                write!(f, "group '{group}' has no environment data and was excluded")
            }
            Self::UnknownGroup { name, source } => {
                write!(f, "{source} table '{name}' matches no configured group and was ignored")
            }
        }
    }
}

/// Everything the aggregator derives from the loaded tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    /// One row per complete group, in configuration order.
    pub summaries: Vec<GroupSummary>,
    pub best: Option<BestGroup>,
    pub overview: Overview,
    pub warnings: Vec<AggregationWarning>,
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Computes [`Aggregation`]s for one experiment configuration.
pub struct Aggregator<'a> {
    config: &'a ExperimentConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a ExperimentConfig) -> Self {
        Self { config }
    }

    /// Summarise every configured group present in both mappings.
    ///
    /// Groups present in only one mapping are excluded and reported as
    /// warnings; so are tables keyed by unknown names. Neither input is
    /// modified.
    pub fn aggregate(&self, environment: &EnvironmentData, growth: &GrowthData) -> Aggregation {
        let mut summaries = Vec::with_capacity(self.config.len());
        let mut warnings = Vec::new();

        for group in self.config.groups() {
            match (environment.get(&group.name), growth.get(&group.name)) {
                (Some(env), Some(grw)) => summaries.push(GroupSummary::build(group, env, grw)),
                (Some(_), None) => warnings.push(AggregationWarning::MissingGrowth {
                    group: group.name.clone(),
                }),
                (None, Some(_)) => warnings.push(AggregationWarning::MissingEnvironment {
                    group: group.name.clone(),
                }),
                (None, None) => {
                    warnings.push(AggregationWarning::MissingEnvironment {
                        group: group.name.clone(),
                    });
                    warnings.push(AggregationWarning::MissingGrowth {
                        group: group.name.clone(),
                    });
                }
            }
        }

        let unknown = |name: &String, source: DataKind| {
            self.config.group(name).is_none().then(|| AggregationWarning::UnknownGroup {
                name: name.clone(),
                source,
            })
        };
        warnings.extend(environment.keys().filter_map(|k| unknown(k, DataKind::Environment)));
        warnings.extend(growth.keys().filter_map(|k| unknown(k, DataKind::Growth)));

        for warning in &warnings {
            warn!("{}", warning);
        }

        let overview = Overview {
            total_individuals: growth.values().map(GrowthTable::len).sum(),
            mean_temperature: Statistic::mean(
                environment.values().flat_map(|t| t.records.iter().map(|r| r.temperature)),
            ),
            mean_humidity: Statistic::mean(
                environment.values().flat_map(|t| t.records.iter().map(|r| r.humidity)),
            ),
            groups_summarized: summaries.len(),
        };

        Aggregation {
            best: select_best(&summaries),
            summaries,
            overview,
            warnings,
        }
    }
}

/// Pick the summary with the largest mean fresh weight.
///
/// Summaries without fresh-weight data are not candidates. Exact ties go to
/// the lower target EC, then to the earlier summary.
pub fn select_best(summaries: &[GroupSummary]) -> Option<BestGroup> {
    let mut best: Option<(&GroupSummary, f64)> = None;

    for summary in summaries {
        let Some(weight) = summary.fresh_weight.value() else {
            continue;
        };
        let replace = match best {
            None => true,
            Some((current, current_weight)) => match weight.partial_cmp(&current_weight) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => summary.target_ec < current.target_ec,
                _ => false,
            },
        };
        if replace {
            best = Some((summary, weight));
        }
    }

    best.map(|(summary, weight)| BestGroup {
        group: summary.group.clone(),
        target_ec: summary.target_ec,
        mean_fresh_weight: weight,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn env_table(temps: &[f64]) -> EnvironmentTable {
        let base = NaiveDate::from_ymd_opt(2025, 5, 26)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        EnvironmentTable {
            source: PathBuf::from("env.csv"),
            records: temps
                .iter()
                .enumerate()
                .map(|(i, t)| EnvironmentRecord {
                    timestamp: base + chrono::Duration::hours(i as i64),
                    temperature: Some(*t),
                    humidity: Some(60.0),
                    ph: Some(6.0),
                    ec: Some(1.0),
                })
                .collect(),
        }
    }

    fn growth_table(name: &str, weights: &[f64]) -> GrowthTable {
        GrowthTable {
            sheet: name.to_string(),
            records: weights
                .iter()
                .map(|w| GrowthRecord {
                    fresh_weight: Some(*w),
                    leaf_count: Some(5.0),
                    shoot_length: Some(40.0),
                })
                .collect(),
        }
    }

    fn config(groups: &[(&str, f64)]) -> ExperimentConfig {
        ExperimentConfig::new(groups.iter().map(|(n, ec)| Group::new(*n, *ec)).collect()).unwrap()
    }

    fn summary(group: &str, ec: f64, weight: Statistic) -> GroupSummary {
        GroupSummary {
            group: group.to_string(),
            target_ec: ec,
            color: None,
            temperature: Statistic::Value(20.0),
            humidity: Statistic::Value(60.0),
            ph: Statistic::Value(6.0),
            ec: Statistic::Value(ec),
            environment_rows: 1,
            fresh_weight: weight,
            leaf_count: Statistic::Value(5.0),
            shoot_length: Statistic::Value(40.0),
            individuals: 1,
        }
    }

    // ── aggregate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_best_group_scenario() {
        let config = config(&[("A", 1.0), ("B", 2.0)]);
        let mut env = EnvironmentData::new();
        env.insert("A".to_string(), env_table(&[19.0, 21.0]));
        env.insert("B".to_string(), env_table(&[20.0, 20.0]));
        let mut growth = GrowthData::new();
        growth.insert("A".to_string(), growth_table("A", &[2.0, 4.0]));
        growth.insert("B".to_string(), growth_table("B", &[4.0, 6.0]));

        let agg = Aggregator::new(&config).aggregate(&env, &growth);

        assert_eq!(agg.summaries.len(), 2);
        assert_eq!(agg.summaries[0].temperature, Statistic::Value(20.0));
        assert_eq!(agg.summaries[1].temperature, Statistic::Value(20.0));
        assert_eq!(agg.summaries[0].fresh_weight, Statistic::Value(3.0));
        assert_eq!(agg.summaries[1].fresh_weight, Statistic::Value(5.0));
        let best = agg.best.unwrap();
        assert_eq!(best.group, "B");
        assert_eq!(best.target_ec, 2.0);
        assert!(agg.warnings.is_empty());
    }

    #[test]
    fn test_summary_fields_complete() {
        let config = ExperimentConfig::default();
        let mut env = EnvironmentData::new();
        let mut growth = GrowthData::new();
        for group in config.groups() {
            env.insert(group.name.clone(), env_table(&[18.0, 22.0]));
            growth.insert(group.name.clone(), growth_table(&group.name, &[1.0, 2.0, 3.0]));
        }

        let agg = Aggregator::new(&config).aggregate(&env, &growth);

        assert_eq!(agg.summaries.len(), 4);
        for s in &agg.summaries {
            assert!(!s.temperature.is_no_data());
            assert!(!s.humidity.is_no_data());
            assert!(!s.ph.is_no_data());
            assert!(!s.ec.is_no_data());
            assert!(!s.fresh_weight.is_no_data());
            assert!(!s.leaf_count.is_no_data());
            assert!(!s.shoot_length.is_no_data());
            assert_eq!(s.individuals, 3);
            assert_eq!(s.environment_rows, 2);
            assert_eq!(Some(s.target_ec), config.target_ec(&s.group));
            assert!(s.color.is_some());
        }
        assert_eq!(agg.overview.total_individuals, 12);
        assert_eq!(agg.overview.mean_temperature, Statistic::Value(20.0));
        assert_eq!(agg.overview.groups_summarized, 4);
    }

    #[test]
    fn test_missing_growth_is_excluded_with_warning() {
        let config = config(&[("A", 1.0), ("B", 2.0)]);
        let mut env = EnvironmentData::new();
        env.insert("A".to_string(), env_table(&[20.0]));
        env.insert("B".to_string(), env_table(&[20.0]));
        let mut growth = GrowthData::new();
        growth.insert("A".to_string(), growth_table("A", &[1.0]));

        let agg = Aggregator::new(&config).aggregate(&env, &growth);

        assert_eq!(agg.summaries.len(), 1);
        assert_eq!(agg.summaries[0].group, "A");
        assert_eq!(
            agg.warnings,
            vec![AggregationWarning::MissingGrowth {
                group: "B".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_sheet_is_reported() {
        let config = config(&[("A", 1.0)]);
        let mut env = EnvironmentData::new();
        env.insert("A".to_string(), env_table(&[20.0]));
        let mut growth = GrowthData::new();
        growth.insert("A".to_string(), growth_table("A", &[1.0]));
        growth.insert("Sheet1".to_string(), growth_table("Sheet1", &[9.0]));

        let agg = Aggregator::new(&config).aggregate(&env, &growth);

        assert_eq!(agg.summaries.len(), 1);
        assert_eq!(agg.best.unwrap().group, "A");
        assert_eq!(
            agg.warnings,
            vec![AggregationWarning::UnknownGroup {
                name: "Sheet1".to_string(),
                source: DataKind::Growth,
            }]
        );
    }

    #[test]
    fn test_empty_growth_sheet_is_no_data_and_not_best() {
        let config = config(&[("A", 1.0), ("B", 2.0)]);
        let mut env = EnvironmentData::new();
        env.insert("A".to_string(), env_table(&[20.0]));
        env.insert("B".to_string(), env_table(&[20.0]));
        let mut growth = GrowthData::new();
        growth.insert("A".to_string(), growth_table("A", &[1.0]));
        growth.insert("B".to_string(), growth_table("B", &[]));

        let agg = Aggregator::new(&config).aggregate(&env, &growth);

        let b = &agg.summaries[1];
        assert_eq!(b.fresh_weight, Statistic::NoData);
        assert_eq!(b.leaf_count, Statistic::NoData);
        assert_eq!(b.shoot_length, Statistic::NoData);
        assert_eq!(b.individuals, 0);
        assert_eq!(agg.best.unwrap().group, "A");
    }

    #[test]
    fn test_means_are_order_independent() {
        let config = config(&[("A", 1.0)]);
        let weights = [3.7, 1.2, 9.9, 4.4, 0.3];
        let mut reversed = weights;
        reversed.reverse();

        let run = |w: &[f64]| {
            let mut env = EnvironmentData::new();
            env.insert("A".to_string(), env_table(&[20.0]));
            let mut growth = GrowthData::new();
            growth.insert("A".to_string(), growth_table("A", w));
            Aggregator::new(&config).aggregate(&env, &growth).summaries[0]
                .fresh_weight
                .value()
                .unwrap()
        };

        assert!((run(&weights) - run(&reversed)).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let config = ExperimentConfig::default();
        let mut env = EnvironmentData::new();
        let mut growth = GrowthData::new();
        for (i, group) in config.groups().iter().enumerate() {
            env.insert(group.name.clone(), env_table(&[20.0]));
            growth.insert(group.name.clone(), growth_table(&group.name, &[i as f64 + 1.0]));
        }

        let aggregator = Aggregator::new(&config);
        let first = aggregator.aggregate(&env, &growth);
        let second = aggregator.aggregate(&env, &growth);
        assert_eq!(first, second);
        assert_eq!(first.best.unwrap().group, "동산고");
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let config = config(&[("A", 1.0)]);
        let mut env = EnvironmentData::new();
        env.insert("A".to_string(), env_table(&[20.0]));
        let mut growth = GrowthData::new();
        growth.insert("A".to_string(), growth_table("A", &[1.0]));
        let env_before = env.clone();
        let growth_before = growth.clone();

        Aggregator::new(&config).aggregate(&env, &growth);

        assert_eq!(env, env_before);
        assert_eq!(growth, growth_before);
    }

    // ── select_best ───────────────────────────────────────────────────────────

    #[test]
    fn test_select_best_tie_goes_to_lowest_ec() {
        let summaries = vec![
            summary("C", 4.0, Statistic::Value(5.0)),
            summary("A", 1.0, Statistic::Value(5.0)),
            summary("B", 2.0, Statistic::Value(5.0)),
        ];
        assert_eq!(select_best(&summaries).unwrap().group, "A");
    }

    #[test]
    fn test_select_best_skips_no_data() {
        let summaries = vec![
            summary("A", 1.0, Statistic::NoData),
            summary("B", 2.0, Statistic::Value(0.5)),
        ];
        assert_eq!(select_best(&summaries).unwrap().group, "B");
    }

    #[test]
    fn test_select_best_none_without_candidates() {
        assert!(select_best(&[]).is_none());
        assert!(select_best(&[summary("A", 1.0, Statistic::NoData)]).is_none());
    }

    #[test]
    fn test_warning_display() {
        let w = AggregationWarning::MissingGrowth {
            group: "하늘고".to_string(),
        };
        assert_eq!(w.to_string(), "group '하늘고' has no growth data and was excluded");
    }
}
