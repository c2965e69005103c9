//! Curated context passages for question answering.

use std::fmt;
use std::str::FromStr;

/// A subject area with a pre-authored context passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Preventive care, mental health, sleep and habits.
    GeneralHealth,
    /// Food groups, macronutrients and antioxidants.
    Nutrition,
    /// Training principles and injury prevention.
    Fitness,
}

const GENERAL_HEALTH: &str = "\
Regular check-ups with healthcare providers are essential for preventive care.
Vaccination helps prevent infectious diseases by building immunity.
Mental health is as important as physical health for overall well-being.
Chronic stress can lead to various physical and mental health problems.
Sleep hygiene practices include consistent sleep schedule and limiting screen time before bed.
Proper handwashing is one of the most effective ways to prevent illness.
Smoking is the leading cause of preventable death worldwide.
Moderate alcohol consumption means up to 1 drink per day for women and 2 for men.";

const NUTRITION: &str = "\
The five main food groups are fruits, vegetables, grains, protein foods, and dairy.
Proteins are essential for building and repairing tissues in the body.
Carbohydrates are the body's main source of energy.
Healthy fats support cell growth and protect organs.
Fiber aids digestion and helps maintain bowel health.
Vitamins and minerals are essential for various bodily functions.
Antioxidants help protect cells from damage caused by free radicals.
Turmeric contains curcumin which has anti-inflammatory properties.
Green tea is rich in antioxidants called catechins.
Processed foods often contain high levels of sodium, sugar, and unhealthy fats.";

const FITNESS: &str = "\
Cardiovascular exercise improves heart health and increases stamina.
Strength training helps build and maintain muscle mass.
Flexibility exercises help maintain joint mobility and prevent injuries.
Rest days are important for muscle recovery and growth.
Progressive overload is necessary for continued fitness improvements.
HIIT (High-Intensity Interval Training) involves short bursts of intense exercise.
Proper form during exercise helps prevent injuries.
Warming up before exercise prepares your body for physical activity.
Cooling down after exercise helps reduce muscle stiffness.
Functional fitness focuses on exercises that help with everyday activities.";

impl Topic {
    /// All topics in display order.
    pub fn all() -> &'static [Topic] {
        &[Self::GeneralHealth, Self::Nutrition, Self::Fitness]
    }

    /// Short identifier accepted on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::GeneralHealth => "general",
            Self::Nutrition => "nutrition",
            Self::Fitness => "fitness",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GeneralHealth => "General Health",
            Self::Nutrition => "Nutrition",
            Self::Fitness => "Fitness",
        }
    }

    /// The context passage answers are extracted from.
    pub fn passage(&self) -> &'static str {
        match self {
            Self::GeneralHealth => GENERAL_HEALTH,
            Self::Nutrition => NUTRITION,
            Self::Fitness => FITNESS,
        }
    }

    /// Advice printed under every answer for this topic.
    pub fn disclaimer(&self) -> &'static str {
        match self {
            Self::GeneralHealth => {
                "Note: This AI provides general information and should not replace professional medical advice."
            }
            Self::Nutrition => "Consult with a nutritionist for personalized dietary advice.",
            Self::Fitness => {
                "Always consult with a fitness professional before starting a new exercise program."
            }
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" | "general-health" | "health" => Ok(Self::GeneralHealth),
            "nutrition" => Ok(Self::Nutrition),
            "fitness" => Ok(Self::Fitness),
            other => Err(format!(
                "unknown topic '{other}' (expected general, nutrition or fitness)"
            )),
        }
    }
}
