//! Every chart the report can show, keyed by a stable id.
//!
//! Selector-bound charts keep the same id across selector values; only their
//! fields change.

use dental_model::{
    ChartSpec, ColorHint, ColorScale, Field, ProblemType, RatingType, SelectorKey, Trend,
};

use crate::recipe::ChartRecipe;

pub const RATING_DISTRIBUTION: &str = "overview.rating_distribution";
pub const CORRELATION_HEATMAP: &str = "overview.correlation_heatmap";
pub const DURATION_HISTOGRAM: &str = "temporal.duration_histogram";
pub const TEETH_VS_DURATION: &str = "temporal.teeth_vs_duration";
pub const DURATION_COMPARISON: &str = "temporal.duration_comparison";
pub const IMPACT_ON_DURATION: &str = "problems.impact_on_duration";
pub const IMPACT_ON_SATISFACTION: &str = "problems.impact_on_satisfaction";
pub const PROBLEM_RELATION: &str = "problems.problem_relation";
pub const RATING_AGREEMENT: &str = "satisfaction.rating_agreement";

const BLUE: &str = "#636EFA";
const RED: &str = "#EF553B";
const GREEN: &str = "#00CC96";
const PURPLE: &str = "#AB63FA";
const ORANGE: &str = "#FFA15A";
const PINK: &str = "#FF6692";
const CYAN: &str = "#19D3F3";
const LIME: &str = "#B6E880";

/// Bin count of the total duration histogram.
pub const DURATION_BINS: u32 = 30;

fn problem_color(problem: ProblemType) -> &'static str {
    match problem {
        ProblemType::Interruptions => ORANGE,
        ProblemType::Errors => PINK,
    }
}

fn rating_color(rating: RatingType) -> &'static str {
    match rating {
        RatingType::Patient => BLUE,
        RatingType::Doctor => RED,
    }
}

pub fn rating_distribution() -> ChartSpec {
    ChartRecipe::histogram(RATING_DISTRIBUTION, Field::PatientRating)
        .series(&[Field::DoctorRating])
        .title("Satisfaction ratings")
        .color(ColorHint::palette(&[BLUE, RED]))
        .build()
}

pub fn correlation_heatmap() -> ChartSpec {
    let (first, rest) = Field::CORRELATED.split_at(1);
    ChartRecipe::heatmap(CORRELATION_HEATMAP, first[0], rest)
        .title("Correlation matrix")
        .color(ColorHint::Scale(ColorScale::Coolwarm))
        .build()
}

pub fn duration_histogram() -> ChartSpec {
    ChartRecipe::histogram(DURATION_HISTOGRAM, Field::TotalDurationMin)
        .bins(DURATION_BINS)
        .title("Total duration distribution")
        .color(ColorHint::solid(GREEN))
        .build()
}

pub fn teeth_vs_duration() -> ChartSpec {
    ChartRecipe::scatter(TEETH_VS_DURATION, Field::NumberOfTeeth, Field::TreatmentDurationMin)
        .trend(Trend::Smoothed)
        .title("Teeth vs treatment duration")
        .color(ColorHint::solid(PURPLE))
        .build()
}

pub fn duration_comparison() -> ChartSpec {
    ChartRecipe::box_plot(DURATION_COMPARISON, Field::SetupDurationMin)
        .series(&[Field::TreatmentDurationMin])
        .title("Setup vs treatment duration")
        .color(ColorHint::palette(&[BLUE, RED]))
        .build()
}

/// Id of the histogram for `problem`.
pub fn problem_distribution_id(problem: ProblemType) -> &'static str {
    match problem {
        ProblemType::Interruptions => "problems.interruptions_distribution",
        ProblemType::Errors => "problems.errors_distribution",
    }
}

pub fn problem_distribution(problem: ProblemType) -> ChartSpec {
    ChartRecipe::histogram(problem_distribution_id(problem), problem.field())
        .title(format!("{} distribution", problem.label()))
        .color(ColorHint::solid(problem_color(problem)))
        .build()
}

pub fn impact_on_duration(problem: ProblemType) -> ChartSpec {
    let color = match problem {
        ProblemType::Interruptions => CYAN,
        ProblemType::Errors => LIME,
    };
    ChartRecipe::scatter(IMPACT_ON_DURATION, problem.field(), Field::TotalDurationMin)
        .trend(Trend::Smoothed)
        .title(format!("Impact of {} on total duration", problem.label().to_lowercase()))
        .color(ColorHint::solid(color))
        .bind(SelectorKey::DurationProblem)
        .build()
}

pub fn impact_on_satisfaction(problem: ProblemType, rating: RatingType) -> ChartSpec {
    ChartRecipe::grouped_box(IMPACT_ON_SATISFACTION, problem.field(), rating.field())
        .title(format!(
            "Impact of {} on {} satisfaction",
            problem.label().to_lowercase(),
            rating.label().to_lowercase()
        ))
        .color(ColorHint::solid(problem_color(problem)))
        .bind(SelectorKey::SatisfactionProblem)
        .bind(SelectorKey::Rating)
        .build()
}

pub fn problem_relation() -> ChartSpec {
    ChartRecipe::scatter(PROBLEM_RELATION, Field::Interruptions, Field::Errors)
        .color_by(Field::TotalDurationMin, ColorHint::Scale(ColorScale::Viridis))
        .title("Interruptions vs errors")
        .build()
}

/// Id of the duration scatter for `rating`.
pub fn duration_vs_rating_id(rating: RatingType) -> &'static str {
    match rating {
        RatingType::Patient => "satisfaction.duration_vs_patient",
        RatingType::Doctor => "satisfaction.duration_vs_doctor",
    }
}

pub fn duration_vs_rating(rating: RatingType) -> ChartSpec {
    ChartRecipe::scatter(duration_vs_rating_id(rating), Field::TotalDurationMin, rating.field())
        .trend(Trend::Smoothed)
        .title(format!("Total duration vs {} satisfaction", rating.label().to_lowercase()))
        .color(ColorHint::solid(rating_color(rating)))
        .build()
}

pub fn rating_agreement() -> ChartSpec {
    ChartRecipe::scatter(RATING_AGREEMENT, Field::PatientRating, Field::DoctorRating)
        .trend(Trend::Linear)
        .title("Patient vs doctor satisfaction")
        .color(ColorHint::solid(GREEN))
        .build()
}

/// Every distinct chart descriptor, including each selector variant.
pub fn all_recipes() -> Vec<ChartSpec> {
    let mut specs = vec![
        rating_distribution(),
        correlation_heatmap(),
        duration_histogram(),
        teeth_vs_duration(),
        duration_comparison(),
    ];
    specs.extend(ProblemType::ALL.map(problem_distribution));
    specs.extend(ProblemType::ALL.map(impact_on_duration));
    for problem in ProblemType::ALL {
        specs.extend(RatingType::ALL.map(|rating| impact_on_satisfaction(problem, rating)));
    }
    specs.push(problem_relation());
    specs.extend(RatingType::ALL.map(duration_vs_rating));
    specs.push(rating_agreement());
    specs
}
