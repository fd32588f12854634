// Reads free-text survey answers as eight fixed rating aspects.
//
// For each aspect the first answer, in document order, whose lowercased label
// contains one of the aspect keywords and whose value is a number in (0, 5]
// is the rating. Missing aspects rate 0 and are left out of every mean.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aspect {
    Teamwork,
    Communication,
    Punctuality,
    Initiative,
    TechnicalSkills,
    Adaptability,
    Productivity,
    CriticalThinking,
}

impl Aspect {
    pub const ALL: [Aspect; 8] = [
        Aspect::Teamwork,
        Aspect::Communication,
        Aspect::Punctuality,
        Aspect::Initiative,
        Aspect::TechnicalSkills,
        Aspect::Adaptability,
        Aspect::Productivity,
        Aspect::CriticalThinking,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Aspect::Teamwork => "Teamwork",
            Aspect::Communication => "Communication",
            Aspect::Punctuality => "Punctuality",
            Aspect::Initiative => "Initiative",
            Aspect::TechnicalSkills => "Technical Skills",
            Aspect::Adaptability => "Adaptability",
            Aspect::Productivity => "Productivity",
            Aspect::CriticalThinking => "Critical Thinking",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Aspect::Teamwork => &["teamwork", "team work", "collaboration", "cooperation"],
            Aspect::Communication => &["communication"],
            Aspect::Punctuality => &["punctuality", "attendance"],
            Aspect::Initiative => &["initiative"],
            Aspect::TechnicalSkills => &["technical"],
            Aspect::Adaptability => &["adaptability", "flexibility"],
            Aspect::Productivity => &["productivity", "quality of work", "work quality"],
            Aspect::CriticalThinking => &["critical", "problem solving", "problem_solving"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurveyMetrics {
    ratings: [f64; 8],
}

impl SurveyMetrics {
    pub fn extract(answers: &Map<String, Value>) -> Self {
        let mut ratings = [0.0; 8];
        for (slot, aspect) in ratings.iter_mut().zip(Aspect::ALL) {
            *slot = answers
                .iter()
                .find_map(|(label, value)| {
                    let label = label.to_lowercase();
                    if !aspect.keywords().iter().any(|k| label.contains(k)) {
                        return None;
                    }
                    value.as_f64().filter(|rating| *rating > 0.0 && *rating <= 5.0)
                })
                .unwrap_or(0.0);
        }
        Self { ratings }
    }

    pub fn rating(&self, aspect: Aspect) -> f64 {
        self.ratings[aspect as usize]
    }

    /// Teamwork, communication, punctuality and initiative.
    pub fn work_attitude(&self) -> f64 {
        mean_of_rated(&self.ratings[..4])
    }

    pub fn work_performance(&self) -> f64 {
        mean_of_rated(&self.ratings[4..])
    }

    pub fn overall(&self) -> f64 {
        mean_of_rated(&self.ratings)
    }
}

fn mean_of_rated(ratings: &[f64]) -> f64 {
    let rated: Vec<f64> = ratings.iter().copied().filter(|r| *r > 0.0).collect();
    if rated.is_empty() {
        0.0
    } else {
        rated.iter().sum::<f64>() / rated.len() as f64
    }
}
