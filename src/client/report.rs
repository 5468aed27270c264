//! Pure presentational derivations over a business insight record
//!
//! Recomputed on every render, never stored in state. The score and
//! visibility numbers are display flavor only, not values callers should
//! build logic on.

use crate::models::BusinessInsight;
use chrono::Utc;
use serde::Serialize;

/// One slot of the five-star row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Five-star row: floor(rating) full stars, one half star for a nonzero
/// fractional part, empty stars for the rest. Always exactly 5 entries.
pub fn star_row(rating: f64) -> Vec<Star> {
    let full = (rating.floor() as usize).min(5);
    let mut stars = vec![Star::Full; full];
    if rating.fract() > f64::EPSILON && stars.len() < 5 {
        stars.push(Star::Half);
    }
    while stars.len() < 5 {
        stars.push(Star::Empty);
    }
    stars
}

pub fn performance_tier(rating: f64) -> &'static str {
    if rating >= 4.5 {
        "Excellent"
    } else if rating >= 4.0 {
        "Very Good"
    } else if rating >= 3.5 {
        "Good"
    } else {
        "Needs Improvement"
    }
}

pub fn engagement_tier(reviews: u32) -> &'static str {
    if reviews >= 300 {
        "High"
    } else if reviews >= 150 {
        "Medium-High"
    } else if reviews >= 75 {
        "Medium"
    } else {
        "Growing"
    }
}

pub fn seo_score(rating: f64) -> u32 {
    (85.0 + (rating - 3.5) * 10.0).round().max(0.0) as u32
}

pub fn local_visibility(reviews: u32) -> u32 {
    (70.0 + reviews as f64 / 10.0).round().min(100.0) as u32
}

pub fn competitive_rank(rating: f64) -> &'static str {
    if rating >= 4.5 {
        "Top 10%"
    } else if rating >= 4.0 {
        "Top 25%"
    } else {
        "Top 50%"
    }
}

/// Metric block of the exportable report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub google_rating: f64,
    pub total_reviews: u32,
    pub seo_score: u32,
    pub local_visibility: u32,
    pub competitive_rank: &'static str,
    pub performance_level: &'static str,
    pub engagement_level: &'static str,
}

/// Exportable analysis report derived from one insight record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub report_id: String,
    pub business_name: String,
    pub location: String,
    pub analysis_date: String,
    pub metrics: ReportMetrics,
    pub seo_headline: String,
    pub recommendations: Vec<&'static str>,
    pub strengths: Vec<&'static str>,
    pub improvements: Vec<&'static str>,
}

/// Build the exportable report. Pure except for the report id and date.
pub fn build_report(data: &BusinessInsight) -> InsightReport {
    let seo = seo_score(data.rating);

    let recommendations = vec![
        if data.rating < 4.0 {
            "Focus on improving customer satisfaction to increase rating"
        } else {
            "Maintain excellent customer service standards"
        },
        if data.reviews < 100 {
            "Encourage more customers to leave reviews"
        } else {
            "Continue engaging with customer feedback"
        },
        if seo < 90 {
            "Optimize website content for better SEO performance"
        } else {
            "Maintain current SEO optimization strategies"
        },
        "Regularly update business information on Google My Business",
        "Respond promptly to customer reviews and feedback",
    ];

    let mut strengths = Vec::new();
    if data.rating >= 4.0 {
        strengths.push("Strong customer satisfaction");
    }
    if data.reviews >= 100 {
        strengths.push("Good review volume");
    }
    if seo >= 85 {
        strengths.push("Solid SEO foundation");
    }

    let mut improvements = Vec::new();
    if data.rating < 4.0 {
        improvements.push("Customer satisfaction needs attention");
    }
    if data.reviews < 50 {
        improvements.push("Low review count");
    }
    if seo < 80 {
        improvements.push("SEO optimization required");
    }

    InsightReport {
        report_id: format!("RPT-{}", Utc::now().timestamp_millis()),
        business_name: data.name.clone(),
        location: data.location.clone(),
        analysis_date: Utc::now().to_rfc3339(),
        metrics: ReportMetrics {
            google_rating: data.rating,
            total_reviews: data.reviews,
            seo_score: seo,
            local_visibility: local_visibility(data.reviews),
            competitive_rank: competitive_rank(data.rating),
            performance_level: performance_tier(data.rating),
            engagement_level: engagement_tier(data.reviews),
        },
        seo_headline: data.headline.clone(),
        recommendations,
        strengths,
        improvements,
    }
}
