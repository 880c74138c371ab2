//! MARS and SUS questionnaire scoring
//!
//! Both instruments are 1–5 Likert CSVs. A respondent with any missing or
//! non-numeric required answer is excluded from that instrument rather than
//! having the gap imputed; the excluded count is reported with the scores.

use std::path::{Path, PathBuf};

use serde::Serialize;

use navlog_telemetry::{read_decoded, TelemetryError, TelemetryResult};

pub const MARS_ENGAGEMENT: [&str; 5] = ["E1", "E2", "E3", "E4", "E5"];
pub const MARS_FUNCTIONALITY: [&str; 4] = ["F1", "F2", "F3", "F4"];
pub const MARS_AESTHETICS: [&str; 3] = ["A1", "A2", "A3"];
pub const MARS_INFORMATION: [&str; 4] = ["I1", "I2", "I3", "I4"];
pub const MARS_OVERALL: &str = "S1";

pub const SUS_ITEMS: [&str; 10] = ["Q1", "Q2", "Q3", "Q4", "Q5", "Q6", "Q7", "Q8", "Q9", "Q10"];

/// Survey responses with normalised headers and numeric cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl SurveyTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required headers that are absent
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| self.column(name).is_none())
            .collect()
    }

    /// Rows with a numeric answer in every `required` column, projected onto
    /// those columns, plus the number of rows left out
    fn complete_rows(&self, required: &[&str]) -> (Vec<Vec<f64>>, usize) {
        let indices: Vec<usize> = required.iter().filter_map(|n| self.column(n)).collect();
        let mut complete = Vec::new();
        let mut excluded = 0;
        for row in &self.rows {
            let answers: Option<Vec<f64>> = indices
                .iter()
                .map(|&i| row.get(i).copied().flatten())
                .collect();
            match answers {
                Some(a) => complete.push(a),
                None => excluded += 1,
            }
        }
        (complete, excluded)
    }
}

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|&d| header.bytes().filter(|&b| b == d).count())
        .filter(|&d| header.bytes().any(|b| b == d))
        .unwrap_or(b',')
}

fn normalise_header(raw: &str) -> String {
    raw.replace('\u{feff}', "").trim().to_ascii_uppercase()
}

/// Parse survey CSV text: the delimiter is sniffed from the header line,
/// headers are trimmed and upper-cased, cells are coerced to numbers.
pub fn parse_survey(text: &str) -> TelemetryResult<SurveyTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalise_header).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(TelemetryError::MissingColumn("header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<Option<f64>> = (0..headers.len())
            .map(|i| {
                record
                    .get(i)
                    .and_then(|c| c.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        rows.push(cells);
    }

    Ok(SurveyTable { headers, rows })
}

pub fn read_survey(path: &Path) -> TelemetryResult<SurveyTable> {
    read_decoded(path, parse_survey)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarsScores {
    pub n: usize,
    pub excluded: usize,
    pub engagement: Option<f64>,
    pub functionality: Option<f64>,
    pub aesthetics: Option<f64>,
    pub information: Option<f64>,
    pub overall: Option<f64>,
}

impl MarsScores {
    /// `(label, mean)` pairs in chart order
    pub fn subscales(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("Engagement", self.engagement),
            ("Functionality", self.functionality),
            ("Aesthetics", self.aesthetics),
            ("Information", self.information),
            ("Overall", self.overall),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SusScores {
    /// One 0–100 score per complete respondent
    pub scores: Vec<f64>,
    pub excluded: usize,
}

impl SusScores {
    pub fn n(&self) -> usize {
        self.scores.len()
    }

    pub fn mean(&self) -> Option<f64> {
        mean(&self.scores)
    }
}

/// Result of loading and scoring one instrument
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyOutcome<T> {
    NotFound(PathBuf),
    Unreadable { path: PathBuf, reason: String },
    MissingHeaders { found: Vec<String>, missing: Vec<String> },
    Scored(T),
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mean over respondents of each respondent's mean over `items`
fn subscale_mean(table: &SurveyTable, rows: &[usize], items: &[&str]) -> Option<f64> {
    let indices: Vec<usize> = items.iter().filter_map(|n| table.column(n)).collect();
    let per_respondent: Vec<f64> = rows
        .iter()
        .filter_map(|&r| {
            let answers: Vec<f64> = indices
                .iter()
                .filter_map(|&i| table.rows[r].get(i).copied().flatten())
                .collect();
            mean(&answers)
        })
        .collect();
    mean(&per_respondent)
}

fn mars_items() -> Vec<&'static str> {
    MARS_ENGAGEMENT
        .iter()
        .chain(MARS_FUNCTIONALITY.iter())
        .chain(MARS_AESTHETICS.iter())
        .chain(MARS_INFORMATION.iter())
        .copied()
        .chain(std::iter::once(MARS_OVERALL))
        .collect()
}

/// Score MARS subscales; `Err` lists the missing headers
pub fn score_mars(table: &SurveyTable) -> Result<MarsScores, Vec<String>> {
    let required = mars_items();
    let missing = table.missing(&required);
    if !missing.is_empty() {
        return Err(missing.into_iter().map(String::from).collect());
    }

    let indices: Vec<usize> = required.iter().filter_map(|n| table.column(n)).collect();
    let complete: Vec<usize> = (0..table.rows.len())
        .filter(|&r| {
            indices
                .iter()
                .all(|&i| table.rows[r].get(i).copied().flatten().is_some())
        })
        .collect();

    Ok(MarsScores {
        n: complete.len(),
        excluded: table.rows.len() - complete.len(),
        engagement: subscale_mean(table, &complete, &MARS_ENGAGEMENT),
        functionality: subscale_mean(table, &complete, &MARS_FUNCTIONALITY),
        aesthetics: subscale_mean(table, &complete, &MARS_AESTHETICS),
        information: subscale_mean(table, &complete, &MARS_INFORMATION),
        overall: subscale_mean(table, &complete, &[MARS_OVERALL]),
    })
}

/// Standard SUS score of one respondent's ten answers (Q1..Q10 order)
pub fn sus_score(answers: &[f64]) -> f64 {
    let total: f64 = answers
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            // Q1, Q3, ... are positively worded; Q2, Q4, ... negatively
            if i % 2 == 0 {
                (r - 1.0).clamp(0.0, 4.0)
            } else {
                (5.0 - r).clamp(0.0, 4.0)
            }
        })
        .sum();
    total * 2.5
}

/// Score SUS respondents; `Err` lists the missing headers
pub fn score_sus(table: &SurveyTable) -> Result<SusScores, Vec<String>> {
    let missing = table.missing(&SUS_ITEMS);
    if !missing.is_empty() {
        return Err(missing.into_iter().map(String::from).collect());
    }

    let (complete, excluded) = table.complete_rows(&SUS_ITEMS);
    Ok(SusScores {
        scores: complete.iter().map(|answers| sus_score(answers)).collect(),
        excluded,
    })
}

fn load_and_score<T>(
    path: &Path,
    score: impl Fn(&SurveyTable) -> Result<T, Vec<String>>,
) -> SurveyOutcome<T> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "survey file not found, skipping");
        return SurveyOutcome::NotFound(path.to_path_buf());
    }

    let table = match read_survey(path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable survey file");
            return SurveyOutcome::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            };
        }
    };

    match score(&table) {
        Ok(scores) => SurveyOutcome::Scored(scores),
        Err(missing) => {
            tracing::warn!(path = %path.display(), ?missing, "survey file missing headers");
            SurveyOutcome::MissingHeaders {
                found: table.headers,
                missing,
            }
        }
    }
}

pub fn load_mars(path: &Path) -> SurveyOutcome<MarsScores> {
    load_and_score(path, score_mars)
}

pub fn load_sus(path: &Path) -> SurveyOutcome<SusScores> {
    load_and_score(path, score_sus)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARS_HEADER: &str = "E1,E2,E3,E4,E5,F1,F2,F3,F4,A1,A2,A3,I1,I2,I3,I4,S1";

    #[test]
    fn test_sus_score_extremes() {
        // Best possible answers: 5 on odd items, 1 on even items
        let best = [5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0];
        assert_eq!(sus_score(&best), 100.0);
        let worst = [1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0];
        assert_eq!(sus_score(&worst), 0.0);
        let neutral = [3.0; 10];
        assert_eq!(sus_score(&neutral), 50.0);
    }

    #[test]
    fn test_sus_clamps_out_of_range_answers() {
        let answers = [7.0, 0.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0, 5.0, 1.0];
        assert_eq!(sus_score(&answers), 100.0);
    }

    #[test]
    fn test_score_sus_excludes_incomplete_respondents() {
        let text = "Q1,Q2,Q3,Q4,Q5,Q6,Q7,Q8,Q9,Q10\n\
                    5,1,5,1,5,1,5,1,5,1\n\
                    3,3,3,3,3,3,3,3,3,3\n\
                    4,2,,2,4,2,4,2,4,2\n";
        let table = parse_survey(text).unwrap();
        let sus = score_sus(&table).unwrap();
        assert_eq!(sus.n(), 2);
        assert_eq!(sus.excluded, 1);
        assert_eq!(sus.mean(), Some(75.0));
    }

    #[test]
    fn test_parse_survey_normalises_headers_and_delimiter() {
        let text = "\u{feff} q1 ;q2\n4;2\n";
        let table = parse_survey(text).unwrap();
        assert_eq!(table.headers, vec!["Q1", "Q2"]);
        assert_eq!(table.rows, vec![vec![Some(4.0), Some(2.0)]]);
    }

    #[test]
    fn test_parse_survey_tab_delimited_with_text_cells() {
        let text = "Q1\tQ2\n4\tn/a\n";
        let table = parse_survey(text).unwrap();
        assert_eq!(table.rows, vec![vec![Some(4.0), None]]);
    }

    #[test]
    fn test_score_mars_subscales() {
        let text = format!(
            "{MARS_HEADER}\n\
             5,5,5,5,5,4,4,4,4,3,3,3,2,2,2,2,4\n\
             3,3,3,3,3,2,2,2,2,5,5,5,4,4,4,4,2\n"
        );
        let table = parse_survey(&text).unwrap();
        let mars = score_mars(&table).unwrap();
        assert_eq!(mars.n, 2);
        assert_eq!(mars.excluded, 0);
        assert_eq!(mars.engagement, Some(4.0));
        assert_eq!(mars.functionality, Some(3.0));
        assert_eq!(mars.aesthetics, Some(4.0));
        assert_eq!(mars.information, Some(3.0));
        assert_eq!(mars.overall, Some(3.0));
        assert_eq!(mars.subscales()[0].0, "Engagement");
    }

    #[test]
    fn test_score_mars_excludes_incomplete_respondents() {
        let text = format!(
            "{MARS_HEADER}\n\
             5,5,5,5,5,4,4,4,4,3,3,3,2,2,2,2,4\n\
             3,,3,3,3,2,2,2,2,5,5,5,4,4,4,4,2\n"
        );
        let table = parse_survey(&text).unwrap();
        let mars = score_mars(&table).unwrap();
        assert_eq!(mars.n, 1);
        assert_eq!(mars.excluded, 1);
        assert_eq!(mars.engagement, Some(5.0));
        assert_eq!(mars.functionality, Some(4.0));
    }

    #[test]
    fn test_score_mars_missing_headers() {
        let table = parse_survey("E1,E2\n5,5\n").unwrap();
        let missing = score_mars(&table).unwrap_err();
        assert!(missing.contains(&"F1".to_string()));
        assert!(missing.contains(&"S1".to_string()));
        assert!(!missing.contains(&"E1".to_string()));
    }

    #[test]
    fn test_load_outcomes() {
        let temp = tempfile::TempDir::new().unwrap();
        let absent = temp.path().join("mars.csv");
        assert!(matches!(load_mars(&absent), SurveyOutcome::NotFound(_)));

        let sus_path = temp.path().join("sus.csv");
        std::fs::write(&sus_path, "Q1,Q2\n5,1\n").unwrap();
        match load_sus(&sus_path) {
            SurveyOutcome::MissingHeaders { found, missing } => {
                assert_eq!(found, vec!["Q1", "Q2"]);
                assert_eq!(missing.len(), 8);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        std::fs::write(&sus_path, "Q1,Q2,Q3,Q4,Q5,Q6,Q7,Q8,Q9,Q10\n4,2,4,2,4,2,4,2,4,2\n").unwrap();
        match load_sus(&sus_path) {
            SurveyOutcome::Scored(sus) => assert_eq!(sus.scores, vec![75.0]),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
