//! Weighted similarity scoring between two patents.
//!
//! Compares five fields (keywords, abstract, primary IPC class, region,
//! applicant), each against a fixed weight, and reports a rounded 0-100
//! total plus a per-field breakdown. Fields that either patent lacks are
//! left out of both the earned sum and the achievable maximum.

use patentmap_explain::{explain_score, Explanation};
use patentmap_features::{
    abstract_words, common_word_count, keyword_overlap, keyword_terms, primary_class,
    same_applicant,
};
use patentmap_model::{FieldEvidence, FieldScore, PatentRecord, SimilarityField, SimilarityScore};
use serde::{Deserialize, Serialize};

/// Configuration for the similarity engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Weight for keyword term overlap
    pub keywords_weight: f64,
    /// Weight for abstract word overlap
    pub abstract_weight: f64,
    /// Weight for primary IPC class equality
    pub classification_weight: f64,
    /// Weight for region equality
    pub region_weight: f64,
    /// Weight for applicant equality
    pub applicant_weight: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            keywords_weight: 30.0,
            abstract_weight: 25.0,
            classification_weight: 20.0,
            region_weight: 15.0,
            applicant_weight: 10.0,
        }
    }
}

impl SimilarityConfig {
    pub fn weight(&self, field: SimilarityField) -> f64 {
        match field {
            SimilarityField::Keywords => self.keywords_weight,
            SimilarityField::Abstract => self.abstract_weight,
            SimilarityField::Classification => self.classification_weight,
            SimilarityField::Region => self.region_weight,
            SimilarityField::Applicant => self.applicant_weight,
        }
    }
}

/// A similarity score together with its human-readable breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedSimilarity {
    pub score: SimilarityScore,
    pub explanations: Vec<Explanation>,
}

/// Score two patents with the default weights.
pub fn score(first: &PatentRecord, second: &PatentRecord) -> SimilarityScore {
    score_with(first, second, &SimilarityConfig::default())
}

/// Score two patents and explain every field.
pub fn score_detailed(first: &PatentRecord, second: &PatentRecord) -> DetailedSimilarity {
    let score = score(first, second);
    let explanations = explain_score(&score);
    DetailedSimilarity {
        score,
        explanations,
    }
}

/// Score two patents with the given weights.
pub fn score_with(
    first: &PatentRecord,
    second: &PatentRecord,
    config: &SimilarityConfig,
) -> SimilarityScore {
    let breakdown: Vec<FieldScore> = SimilarityField::ALL
        .iter()
        .map(|&field| {
            let weight = config.weight(field);
            match field {
                SimilarityField::Keywords => keywords_score(first, second, weight),
                SimilarityField::Abstract => abstract_score(first, second, weight),
                SimilarityField::Classification => classification_score(first, second, weight),
                SimilarityField::Region => region_score(first, second, weight),
                SimilarityField::Applicant => applicant_score(first, second, weight),
            }
        })
        .collect();

    let (earned, possible) = breakdown
        .iter()
        .filter(|f| f.applicable)
        .fold((0.0_f64, 0.0_f64), |(earned, possible), f| {
            (earned + f.score, possible + f.weight)
        });

    let total = if possible > 0.0 {
        (earned / possible * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    tracing::debug!(
        first = %first.patent_no,
        second = %second.patent_no,
        earned,
        possible,
        total,
        "Scored patent pair"
    );

    SimilarityScore { total, breakdown }
}

fn keywords_score(first: &PatentRecord, second: &PatentRecord, weight: f64) -> FieldScore {
    let field = SimilarityField::Keywords;
    let (Some(k1), Some(k2)) = (first.keywords(), second.keywords()) else {
        return FieldScore::inapplicable(field, weight);
    };

    let terms1 = keyword_terms(k1);
    let terms2 = keyword_terms(k2);
    let largest = terms1.len().max(terms2.len());
    if terms1.is_empty() || terms2.is_empty() {
        return FieldScore::inapplicable(field, weight);
    }

    let common = keyword_overlap(&terms1, &terms2);
    FieldScore {
        field,
        weight,
        score: common.len() as f64 / largest as f64 * weight,
        applicable: true,
        evidence: Some(FieldEvidence::CommonKeywords { terms: common }),
    }
}

fn abstract_score(first: &PatentRecord, second: &PatentRecord, weight: f64) -> FieldScore {
    let field = SimilarityField::Abstract;
    let (Some(a1), Some(a2)) = (first.abstract_text(), second.abstract_text()) else {
        return FieldScore::inapplicable(field, weight);
    };

    let words1 = abstract_words(a1);
    let words2 = abstract_words(a2);
    if words1.is_empty() || words2.is_empty() {
        return FieldScore::inapplicable(field, weight);
    }

    // Membership counts differ by direction when a word repeats; the smaller
    // count keeps the score independent of argument order.
    let common = common_word_count(&words1, &words2).min(common_word_count(&words2, &words1));
    let largest = words1.len().max(words2.len());

    FieldScore {
        field,
        weight,
        score: common as f64 / largest as f64 * weight,
        applicable: true,
        evidence: Some(FieldEvidence::CommonWords { count: common }),
    }
}

fn classification_score(first: &PatentRecord, second: &PatentRecord, weight: f64) -> FieldScore {
    let field = SimilarityField::Classification;
    let (Some(ipc1), Some(ipc2)) = (first.ipc(), second.ipc()) else {
        return FieldScore::inapplicable(field, weight);
    };
    let (Some(class1), Some(class2)) = (primary_class(ipc1), primary_class(ipc2)) else {
        return FieldScore::inapplicable(field, weight);
    };

    equality_score(field, weight, class1 == class2, ipc1, ipc2)
}

fn region_score(first: &PatentRecord, second: &PatentRecord, weight: f64) -> FieldScore {
    let field = SimilarityField::Region;
    let (Some(r1), Some(r2)) = (first.geographic_region, second.geographic_region) else {
        return FieldScore::inapplicable(field, weight);
    };

    equality_score(field, weight, r1 == r2, r1.as_str(), r2.as_str())
}

fn applicant_score(first: &PatentRecord, second: &PatentRecord, weight: f64) -> FieldScore {
    let field = SimilarityField::Applicant;
    let (Some(app1), Some(app2)) = (first.applicant(), second.applicant()) else {
        return FieldScore::inapplicable(field, weight);
    };

    equality_score(field, weight, same_applicant(app1, app2), app1, app2)
}

fn equality_score(
    field: SimilarityField,
    weight: f64,
    equal: bool,
    first: &str,
    second: &str,
) -> FieldScore {
    FieldScore {
        field,
        weight,
        score: if equal { weight } else { 0.0 },
        applicable: true,
        evidence: Some(FieldEvidence::Compared {
            first: first.to_string(),
            second: second.to_string(),
        }),
    }
}
