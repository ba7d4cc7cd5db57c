//! Five-score extraction from structured assistant output.
//!
//! The assistant has answered with several JSON layouts over time, and the
//! score names are requested in Portuguese, so every layout is recognized
//! under both its English and its Portuguese keys. Layouts are probed in a
//! fixed order and the first match wins. Values may be numbers or numeric
//! strings; anything else falls back to the per-field default.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::types::AnalysisResult;

const DEFAULT_PROFILE_COMPLETENESS: f64 = 8.0;
const DEFAULT_HEADLINE_QUALITY: f64 = 7.0;
const DEFAULT_EXPERIENCE_DETAILS: f64 = 8.0;
const DEFAULT_SKILLS_RELEVANCE: f64 = 7.0;
const DEFAULT_OVERALL_IMPRESSION: f64 = 8.0;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("number pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSet {
    pub profile_completeness: f64,
    pub headline_quality: f64,
    pub experience_details: f64,
    pub skills_relevance: f64,
    pub overall_impression: f64,
}

impl Default for ScoreSet {
    fn default() -> Self {
        Self {
            profile_completeness: DEFAULT_PROFILE_COMPLETENESS,
            headline_quality: DEFAULT_HEADLINE_QUALITY,
            experience_details: DEFAULT_EXPERIENCE_DETAILS,
            skills_relevance: DEFAULT_SKILLS_RELEVANCE,
            overall_impression: DEFAULT_OVERALL_IMPRESSION,
        }
    }
}

type Matcher = fn(&Value) -> Option<ScoreSet>;

/// Layout probes in priority order.
const MATCHERS: [(&str, Matcher); 5] = [
    ("nested_grade", nested_grade),
    ("flat_grades", flat_grades),
    ("initial_impression", initial_impression),
    ("overall_grade_object", overall_grade_object),
    ("summary_total", summary_total),
];

/// Scores for `result`; defaults unless structured output matches a layout.
#[must_use]
pub fn extract_scores(result: &AnalysisResult) -> ScoreSet {
    match (&result.analysis_structured, result.is_structured_format) {
        (Some(structured), true) => scores_from_value(structured),
        _ => ScoreSet::default(),
    }
}

/// Runs the layout probes over `structured`.
#[must_use]
pub fn scores_from_value(structured: &Value) -> ScoreSet {
    for (layout, matcher) in MATCHERS {
        if let Some(scores) = matcher(structured) {
            tracing::debug!(layout, "scores extracted");
            return scores;
        }
    }
    ScoreSet::default()
}

/// `analysis.grade` / `análise.nota` block with one field per score.
fn nested_grade(v: &Value) -> Option<ScoreSet> {
    let block = nested(v, &[("analysis", "grade"), ("análise", "nota")])?;
    Some(ScoreSet {
        profile_completeness: number_or(block, &["overall", "score_geral"], DEFAULT_PROFILE_COMPLETENESS),
        headline_quality: number_or(block, &["presentation", "score_apresentação"], DEFAULT_HEADLINE_QUALITY),
        experience_details: number_or(block, &["professional", "score_profissional"], DEFAULT_EXPERIENCE_DETAILS),
        skills_relevance: number_or(block, &["skills", "score_habilidades"], DEFAULT_SKILLS_RELEVANCE),
        overall_impression: number_or(block, &["linkedin", "score_linkedin"], DEFAULT_OVERALL_IMPRESSION),
    })
}

/// Top-level `profile_grade` / `nota_perfil` and siblings.
fn flat_grades(v: &Value) -> Option<ScoreSet> {
    const PROFILE: [&str; 2] = ["profile_grade", "nota_perfil"];
    present(v, &PROFILE)?;
    Some(ScoreSet {
        profile_completeness: number_or(v, &PROFILE, DEFAULT_PROFILE_COMPLETENESS),
        headline_quality: number_or(v, &["title_grade", "nota_titulo"], DEFAULT_HEADLINE_QUALITY),
        experience_details: number_or(v, &["experience_grade", "nota_experiencia"], DEFAULT_EXPERIENCE_DETAILS),
        skills_relevance: number_or(v, &["skills_grade", "nota_habilidades"], DEFAULT_SKILLS_RELEVANCE),
        overall_impression: number_or(v, &PROFILE, DEFAULT_OVERALL_IMPRESSION),
    })
}

/// First number inside the free-text initial impression.
fn initial_impression(v: &Value) -> Option<ScoreSet> {
    let text = nested(
        v,
        &[
            ("general_summary", "initial_impression"),
            ("resumo_geral", "impressao_inicial"),
        ],
    )
    .and_then(Value::as_str)?;
    let n = FIRST_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(DEFAULT_PROFILE_COMPLETENESS);
    Some(ScoreSet {
        profile_completeness: n,
        headline_quality: DEFAULT_HEADLINE_QUALITY,
        experience_details: DEFAULT_EXPERIENCE_DETAILS,
        skills_relevance: DEFAULT_SKILLS_RELEVANCE,
        overall_impression: n,
    })
}

/// `"Overall Grade"` / `"Nota Geral"` object with camelCase Portuguese fields.
fn overall_grade_object(v: &Value) -> Option<ScoreSet> {
    let grades = present(v, &["Overall Grade", "Nota Geral"]).filter(|g| g.is_object())?;
    Some(ScoreSet {
        profile_completeness: number_or(grades, &["notaPerfil"], DEFAULT_PROFILE_COMPLETENESS),
        headline_quality: number_or(grades, &["notaTitulo"], DEFAULT_HEADLINE_QUALITY),
        experience_details: number_or(
            grades,
            &["notaExperiencia", "notaOportunidadesMelhoria"],
            DEFAULT_EXPERIENCE_DETAILS,
        ),
        skills_relevance: number_or(grades, &["notaHabilidades"], DEFAULT_SKILLS_RELEVANCE),
        overall_impression: number_or(grades, &["notaPerfil", "notaGeral"], DEFAULT_OVERALL_IMPRESSION),
    })
}

/// Single total grade spread over all five scores with fixed offsets.
fn summary_total(v: &Value) -> Option<ScoreSet> {
    let n = [("summary", "totalGrade"), ("resumoGeral", "notaTotal")]
        .iter()
        .find_map(|(outer, inner)| v.get(outer).and_then(|o| o.get(inner)).and_then(as_number))?;
    Some(ScoreSet {
        profile_completeness: n,
        headline_quality: n - 1.0,
        experience_details: n,
        skills_relevance: n - 1.5,
        overall_impression: n,
    })
}

/// First non-null value among `keys`.
fn present<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| v.get(key).filter(|x| !x.is_null()))
}

/// First non-null `outer.inner` value. Each pair is tried on its own so a
/// malformed English block does not hide the Portuguese one.
fn nested<'a>(v: &'a Value, pairs: &[(&str, &str)]) -> Option<&'a Value> {
    pairs.iter().find_map(|(outer, inner)| {
        v.get(outer)
            .and_then(|o| o.get(inner))
            .filter(|x| !x.is_null())
    })
}

/// First numeric value among `keys`, else `default`.
fn number_or(v: &Value, keys: &[&str], default: f64) -> f64 {
    keys.iter()
        .find_map(|key| v.get(key).and_then(as_number))
        .unwrap_or(default)
}

/// Finite number, or a string holding one. `"NaN"` and `"1e400"` do not count.
fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}
