use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use powerbroker_game::{Difficulty, Grade};

use super::simulation::CampaignRecord;

/// Per-strategy roll-up of many campaign runs.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub difficulty: Difficulty,
    pub runs: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub mean_margin: f64,
    pub mean_score: f64,
    pub recounts: usize,
    pub grades: BTreeMap<Grade, usize>,
    pub failures: Vec<String>,
    #[serde(skip)]
    pub average_duration: Duration,
}

impl StrategySummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        values.sum::<f64>() / count as f64
    }
}

/// Group records by strategy, preserving first-seen order.
#[must_use]
pub fn summarize(records: &[CampaignRecord]) -> Vec<StrategySummary> {
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        if !order.contains(&record.strategy.as_str()) {
            order.push(&record.strategy);
        }
    }

    order
        .into_iter()
        .map(|strategy| {
            let runs: Vec<&CampaignRecord> =
                records.iter().filter(|r| r.strategy == strategy).collect();
            let count = runs.len();
            let wins = runs.iter().filter(|r| r.won).count();
            let mut grades = BTreeMap::new();
            for record in &runs {
                *grades.entry(record.grade).or_insert(0) += 1;
            }
            let failures = runs
                .iter()
                .flat_map(|record| {
                    record
                        .violations
                        .iter()
                        .map(move |v| format!("seed {}: {v}", record.seed))
                })
                .collect();
            let average_duration = if count == 0 {
                Duration::ZERO
            } else {
                runs.iter().map(|r| r.duration).sum::<Duration>()
                    / u32::try_from(count).unwrap_or(1)
            };
            #[allow(clippy::cast_precision_loss)]
            let mean_score = mean(runs.iter().map(|r| r.total_score as f64), count);
            #[allow(clippy::cast_precision_loss)]
            let win_rate = if count == 0 {
                0.0
            } else {
                wins as f64 / count as f64
            };
            StrategySummary {
                strategy: strategy.to_string(),
                difficulty: runs.first().map_or(Difficulty::TossUp, |r| r.difficulty),
                runs: count,
                wins,
                win_rate,
                mean_margin: mean(runs.iter().map(|r| r.margin), count),
                mean_score,
                recounts: runs.iter().filter(|r| r.recount).count(),
                grades,
                failures,
                average_duration,
            }
        })
        .collect()
}

fn grade_line(grades: &BTreeMap<Grade, usize>) -> String {
    grades
        .iter()
        .map(|(grade, count)| format!("{grade}:{count}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    summaries: &[StrategySummary],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Campaign Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let passed = summaries.iter().filter(|s| s.passed()).count();
    writeln!(out, "Strategies: {}", summaries.len())?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (summaries.len() - passed).to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for summary in summaries {
        let status = if summary.passed() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} ({})",
            status,
            summary.strategy.bold(),
            summary.difficulty
        )?;
        writeln!(
            out,
            "   Win rate: {:.1}% ({}/{})",
            summary.win_rate * 100.0,
            summary.wins,
            summary.runs
        )?;
        writeln!(out, "   Mean margin: {:+.2}", summary.mean_margin)?;
        writeln!(out, "   Mean score: {:.1}", summary.mean_score)?;
        writeln!(out, "   Recounts: {}", summary.recounts)?;
        writeln!(out, "   Grades: {}", grade_line(&summary.grades))?;
        writeln!(out, "   Average time: {:?}", summary.average_duration)?;
        if !summary.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &summary.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    out: &mut W,
    summaries: &[StrategySummary],
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summaries)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    summaries: &[StrategySummary],
) -> Result<()> {
    writeln!(out, "# Power Broker Simulation Results\n")?;
    writeln!(
        out,
        "| Strategy | Difficulty | Runs | Win rate | Mean margin | Recounts | Grades |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for summary in summaries {
        writeln!(
            out,
            "| {} | {} | {} | {:.1}% | {:+.2} | {} | {} |",
            summary.strategy,
            summary.difficulty,
            summary.runs,
            summary.win_rate * 100.0,
            summary.mean_margin,
            summary.recounts,
            grade_line(&summary.grades)
        )?;
    }

    let failing: Vec<&StrategySummary> = summaries.iter().filter(|s| !s.passed()).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Invariant failures\n")?;
        for summary in failing {
            writeln!(out, "### {}\n", summary.strategy)?;
            for failure in &summary.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(strategy: &str, seed: u64, won: bool, margin: f64) -> CampaignRecord {
        CampaignRecord {
            strategy: strategy.to_string(),
            difficulty: Difficulty::TossUp,
            seed,
            won,
            margin,
            recount: margin.abs() < 2.0,
            grade: if won { Grade::B } else { Grade::D },
            total_score: if won { 65 } else { 35 },
            final_cash: 10_000.0,
            endorsements: 2,
            events_resolved: 4,
            turns: 26,
            violations: Vec::new(),
            duration: Duration::from_millis(2),
        }
    }

    #[test]
    fn summarize_groups_by_strategy() {
        let mut failing = record("attack-dog", 3, false, -4.0);
        failing.violations.push("turn 5: momentum 11.00".to_string());
        let records = vec![
            record("balanced", 1, true, 3.0),
            record("balanced", 2, false, -1.0),
            failing,
        ];
        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);
        let balanced = &summaries[0];
        assert_eq!(balanced.strategy, "balanced");
        assert_eq!(balanced.runs, 2);
        assert_eq!(balanced.wins, 1);
        assert!((balanced.win_rate - 0.5).abs() < f64::EPSILON);
        assert!((balanced.mean_margin - 1.0).abs() < f64::EPSILON);
        assert_eq!(balanced.recounts, 1);
        assert_eq!(balanced.grades.get(&Grade::B), Some(&1));
        assert!(balanced.passed());
        assert!(!summaries[1].passed());
        assert_eq!(summaries[1].failures, vec!["seed 3: turn 5: momentum 11.00"]);
    }

    #[test]
    fn reports_render_every_format() {
        let summaries = summarize(&[record("balanced", 1, true, 3.0)]);

        let mut console = Vec::new();
        generate_console_report(&mut console, &summaries, Duration::from_millis(5)).unwrap();
        assert!(String::from_utf8(console).unwrap().contains("Win rate: 100.0%"));

        let mut json = Vec::new();
        generate_json_report(&mut json, &summaries).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed[0]["strategy"], "balanced");
        assert_eq!(parsed[0]["grades"]["B"], 1);

        let mut markdown = Vec::new();
        generate_markdown_report(&mut markdown, &summaries).unwrap();
        let text = String::from_utf8(markdown).unwrap();
        assert!(text.contains("# Power Broker Simulation Results"));
        assert!(text.contains("| balanced | toss-up | 1 | 100.0% |"));
    }
}
