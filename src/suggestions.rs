//! Activity and food suggestions
//!
//! A fixed decision table: each forecast day is reduced to a few coarse
//! buckets (sky, wet or dry, temperature band) and the first matching rule
//! picks canned text from the per-city tables below.

use serde::Serialize;

use crate::models::{City, DailyForecast, WeatherCode};

/// Rain sum (inches) at or above which a day counts as rainy
pub const RAIN_THRESHOLD_IN: f32 = 0.01;
/// Precipitation probability (%) at or above which a day counts as wet
pub const WET_PROBABILITY: u8 = 50;
/// Cloud cover (%) below which a day reported without a code counts as clear
pub const CLEAR_CLOUD_COVER: u8 = 30;

const OUTDOOR_MIN_F: f32 = 60.0;
const MIXED_MIN_F: f32 = 45.0;
const COLD_BELOW_F: f32 = 50.0;
const WARM_MIN_F: f32 = 70.0;

/// Coarse sky classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sky {
    /// Codes 0-1
    Clear,
    /// Codes 2-3
    Cloudy,
    /// Drizzle, rain, snow and showers (51-82) or thunderstorms (95-99)
    Precipitation,
    /// Fog and anything else; only ever matches the indoor/comfort rules
    Other,
}

impl Sky {
    #[must_use]
    pub fn classify(code: WeatherCode, cloud_cover: Option<u8>) -> Self {
        if code == WeatherCode::UNKNOWN {
            // No code reported: cloud cover is the only sky signal left
            return match cloud_cover {
                Some(cover) if cover < CLEAR_CLOUD_COVER => Sky::Clear,
                Some(_) => Sky::Cloudy,
                None => Sky::Other,
            };
        }
        match code.0 {
            0 | 1 => Sky::Clear,
            2 | 3 => Sky::Cloudy,
            51..=82 | 95..=99 => Sky::Precipitation,
            _ => Sky::Other,
        }
    }
}

/// The weather inputs the rules look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub max_temp_f: f32,
    pub rain_in: f32,
    pub precipitation_probability: Option<u8>,
    pub cloud_cover: Option<u8>,
    pub weather_code: WeatherCode,
}

impl From<&DailyForecast> for Conditions {
    fn from(day: &DailyForecast) -> Self {
        Self {
            max_temp_f: day.max_temp_f,
            rain_in: day.rain_in,
            precipitation_probability: day.precipitation_probability,
            cloud_cover: day.cloud_cover,
            weather_code: day.weather_code,
        }
    }
}

impl Conditions {
    #[must_use]
    pub fn sky(&self) -> Sky {
        Sky::classify(self.weather_code, self.cloud_cover)
    }

    /// Measurable rain or a likely chance of it
    #[must_use]
    pub fn is_wet(&self) -> bool {
        self.rain_in >= RAIN_THRESHOLD_IN
            || self
                .precipitation_probability
                .is_some_and(|p| p >= WET_PROBABILITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityBucket {
    Outdoor,
    Mixed,
    Indoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodBucket {
    ColdRainy,
    WarmClear,
    Restaurant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySuggestion {
    pub bucket: ActivityBucket,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodSuggestion {
    pub bucket: FoodBucket,
    pub dish: &'static str,
    pub tip: &'static str,
    /// Dining style, e.g. `Takeout/Delivery`
    pub style: &'static str,
}

impl FoodSuggestion {
    /// One-line text, e.g. `Deep Dish Pizza (Takeout/Delivery). Suggestion: ...`
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} ({}). Suggestion: {}", self.dish, self.style, self.tip)
    }
}

/// Everything suggested for a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySuggestion {
    pub activity: ActivitySuggestion,
    pub food: FoodSuggestion,
    /// Estimated spend per person, e.g. `$15 - $35`
    pub price_range: &'static str,
}

struct FoodEntry {
    dish: &'static str,
    tip: &'static str,
    budget: &'static str,
}

struct CityTable {
    slug: &'static str,
    outdoor: &'static str,
    indoor: &'static str,
    cold_rainy: FoodEntry,
    warm_clear: FoodEntry,
    restaurant: FoodEntry,
}

static TABLES: [CityTable; 4] = [
    CityTable {
        slug: "honolulu",
        outdoor: "Beach Day, Surfing, Diamond Head Hike",
        indoor: "Pearl Harbor Museum, Iolani Palace, Aquarium",
        cold_rainy: FoodEntry {
            dish: "Warm Saimin Noodle Soup",
            tip: "Try Zippy's for quick takeout.",
            budget: "$5 - $15",
        },
        warm_clear: FoodEntry {
            dish: "Fresh Poke Bowl",
            tip: "Check out Ono Seafood or a local farmers market stand.",
            budget: "$15 - $35",
        },
        restaurant: FoodEntry {
            dish: "Dinner with a view",
            tip: "Miro Kaimuki (Contemporary) or Duke's Waikiki (Casual).",
            budget: "$35 - $75",
        },
    },
    CityTable {
        slug: "new-york",
        outdoor: "Central Park Stroll, Brooklyn Bridge Walk, Rooftop Drinks",
        indoor: "Museum of Modern Art (MoMA), Broadway Show, Met Museum",
        cold_rainy: FoodEntry {
            dish: "Classic New York Pizza",
            tip: "Order delivery from Joe's Pizza or Artichoke Basille's.",
            budget: "$5 - $15",
        },
        warm_clear: FoodEntry {
            dish: "Street Food/Deli Sandwich",
            tip: "Grab a hot dog from a street vendor or a sandwich from Katz's Deli.",
            budget: "$15 - $35",
        },
        restaurant: FoodEntry {
            dish: "Global Cuisine",
            tip: "Via Carota (Italian) in Greenwich or Keens Steakhouse (Steak).",
            budget: "$100 - $400",
        },
    },
    CityTable {
        slug: "chicago",
        outdoor: "Millennium Park/The Bean, Architectural Boat Tour, Lakefront Biking",
        indoor: "Art Institute of Chicago, Field Museum, Deep Dish Pizza",
        cold_rainy: FoodEntry {
            dish: "Deep Dish Pizza",
            tip: "Lou Malnati's or Giordano's.",
            budget: "$15 - $35",
        },
        warm_clear: FoodEntry {
            dish: "Chicago-style Hot Dog/Street Tacos",
            tip: "Hot dog from Portillo's or tacos from Birrieria Zaragoza.",
            budget: "$5 - $15",
        },
        restaurant: FoodEntry {
            dish: "Modern American",
            tip: "Alinea (Fine Dining) or Girl & The Goat (Contemporary).",
            budget: "$100 - $400",
        },
    },
    CityTable {
        slug: "san-francisco",
        outdoor: "Golden Gate Park, Golden Gate Bridge Walk, Fisherman's Wharf",
        indoor: "Exploratorium, Academy of Sciences, Alcatraz Tour",
        cold_rainy: FoodEntry {
            dish: "Clam Chowder in a Sourdough Bowl",
            tip: "Get takeout from Boudin Bakery in Fisherman's Wharf.",
            budget: "$15 - $35",
        },
        warm_clear: FoodEntry {
            dish: "Mission Burrito or Seafood Grill",
            tip: "A burrito from La Taqueria or grilled fish from Swan Oyster Depot.",
            budget: "$15 - $35",
        },
        restaurant: FoodEntry {
            dish: "Coastal California Cuisine",
            tip: "Foreign Cinema (Mediterranean) or House of Prime Rib (Classic).",
            budget: "$35 - $75",
        },
    },
];

fn table_for(city: &City) -> &'static CityTable {
    TABLES
        .iter()
        .find(|t| t.slug == city.slug)
        .unwrap_or(&TABLES[0])
}

fn activity(table: &CityTable, conditions: &Conditions) -> ActivitySuggestion {
    let sky = conditions.sky();
    let max = conditions.max_temp_f;

    let (bucket, text) = match sky {
        Sky::Precipitation => (ActivityBucket::Indoor, format!("INDOOR: {}", table.indoor)),
        _ if conditions.is_wet() => (ActivityBucket::Indoor, format!("INDOOR: {}", table.indoor)),
        Sky::Clear if max >= OUTDOOR_MIN_F => {
            (ActivityBucket::Outdoor, format!("OUTDOOR: {}", table.outdoor))
        }
        Sky::Cloudy if (MIXED_MIN_F..OUTDOOR_MIN_F).contains(&max) => (
            ActivityBucket::Mixed,
            format!(
                "MIXED: {} (Dress Warmly), or {}",
                table.outdoor, table.indoor
            ),
        ),
        _ => (ActivityBucket::Indoor, format!("INDOOR: {}", table.indoor)),
    };

    ActivitySuggestion { bucket, text }
}

fn food(table: &'static CityTable, conditions: &Conditions) -> (FoodSuggestion, &'static str) {
    let sky = conditions.sky();
    let max = conditions.max_temp_f;

    let (bucket, entry, style) = if conditions.is_wet() || max < COLD_BELOW_F {
        (FoodBucket::ColdRainy, &table.cold_rainy, "Takeout/Delivery")
    } else if sky == Sky::Clear && max >= WARM_MIN_F {
        (FoodBucket::WarmClear, &table.warm_clear, "Casual Dine-In/Takeout")
    } else if matches!(sky, Sky::Clear | Sky::Cloudy) {
        (FoodBucket::Restaurant, &table.restaurant, "Restaurant/Dine-in")
    } else {
        (
            FoodBucket::ColdRainy,
            &table.cold_rainy,
            "Comfort Food (Takeout/Delivery)",
        )
    };

    let suggestion = FoodSuggestion {
        bucket,
        dish: entry.dish,
        tip: entry.tip,
        style,
    };
    (suggestion, entry.budget)
}

/// Pick the activity, food and budget for one day in `city`
#[must_use]
pub fn suggest(city: &City, conditions: &Conditions) -> DaySuggestion {
    let table = table_for(city);
    let activity = activity(table, conditions);
    let (food, price_range) = food(table, conditions);
    DaySuggestion {
        activity,
        food,
        price_range,
    }
}

/// Suggestions for every day of a forecast
#[must_use]
pub fn suggest_days(city: &City, days: &[DailyForecast]) -> Vec<DaySuggestion> {
    days.iter()
        .map(|day| suggest(city, &Conditions::from(day)))
        .collect()
}
