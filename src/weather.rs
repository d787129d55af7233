use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Storm,
}

impl WeatherCategory {
    pub const ALL: [WeatherCategory; 5] = [
        WeatherCategory::Clear,
        WeatherCategory::PartlyCloudy,
        WeatherCategory::Cloudy,
        WeatherCategory::Rain,
        WeatherCategory::Storm,
    ];

    pub fn from_average(average: f64) -> Self {
        if average < 0.3 {
            WeatherCategory::Clear
        } else if average < 0.5 {
            WeatherCategory::PartlyCloudy
        } else if average < 0.7 {
            WeatherCategory::Cloudy
        } else if average < 0.9 {
            WeatherCategory::Rain
        } else {
            WeatherCategory::Storm
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WeatherCategory::Clear => "☀️",
            WeatherCategory::PartlyCloudy => "🌤️",
            WeatherCategory::Cloudy => "☁️",
            WeatherCategory::Rain => "🌧️",
            WeatherCategory::Storm => "⛈️",
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            WeatherCategory::Clear => {
                "Plenty of capacity. A great day to take on something new."
            }
            WeatherCategory::PartlyCloudy => {
                "Moderate load. Steady planning will see you through."
            }
            WeatherCategory::Cloudy => {
                "Load is running high. Finish important tasks in the morning."
            }
            WeatherCategory::Rain => {
                "A heavy day. Consider trimming tasks to what is manageable."
            }
            WeatherCategory::Storm => {
                "Risk of exceeding capacity. Reviewing your plans is strongly advised."
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherCategory::Clear => "clear",
            WeatherCategory::PartlyCloudy => "partly cloudy",
            WeatherCategory::Cloudy => "cloudy",
            WeatherCategory::Rain => "rain",
            WeatherCategory::Storm => "storm",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: WeatherCategory,
    pub description: &'static str,
}

/// Days without records are always clear.
pub fn classify(total_load: f64, count: usize) -> Classification {
    let category = if count == 0 {
        WeatherCategory::Clear
    } else {
        WeatherCategory::from_average(total_load / count as f64)
    };

    Classification {
        category,
        description: category.advisory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_day_is_clear_whatever_the_total() {
        for total in [0.0, 0.5, 3.0, 1e9] {
            assert_eq!(classify(total, 0).category, WeatherCategory::Clear);
        }
    }

    #[test]
    fn thresholds_are_inclusive_on_the_lower_bound() {
        assert_eq!(classify(0.29999, 1).category, WeatherCategory::Clear);
        assert_eq!(classify(0.3, 1).category, WeatherCategory::PartlyCloudy);
        assert_eq!(classify(0.5, 1).category, WeatherCategory::Cloudy);
        assert_eq!(classify(0.7, 1).category, WeatherCategory::Rain);
        assert_eq!(classify(0.9, 1).category, WeatherCategory::Storm);
        assert_eq!(classify(1.5, 1).category, WeatherCategory::Storm);
    }

    #[test]
    fn averages_over_record_count() {
        assert_eq!(classify(0.2, 2).category, WeatherCategory::Clear);
        assert_eq!(classify(1.6, 2).category, WeatherCategory::Rain);
    }

    #[test]
    fn description_matches_category() {
        let result = classify(0.6, 1);
        assert_eq!(result.description, WeatherCategory::Cloudy.advisory());
    }

    #[test]
    fn categories_are_ordered_by_severity() {
        let mut sorted = WeatherCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, WeatherCategory::ALL);
        assert!(WeatherCategory::Clear < WeatherCategory::Storm);
    }
}
