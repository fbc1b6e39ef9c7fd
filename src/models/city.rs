//! The fixed set of cities shown on the dashboard

/// A supported city
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    /// URL-safe identifier used in `?city=` and `/api/forecast/{slug}`
    pub slug: &'static str,
    /// Short name, also accepted as a lookup key
    pub name: &'static str,
    /// Label shown in the dropdown and headings
    pub display_name: &'static str,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Background photo for the summary page
    pub image_url: &'static str,
}

pub static CITIES: [City; 4] = [
    City {
        slug: "honolulu",
        name: "Honolulu",
        display_name: "Honolulu, HI",
        latitude: 21.31,
        longitude: -157.86,
        image_url: "https://a.cdn-hotels.com/gdcs/production89/d1001/2e2f2638-33ce-4919-afcf-42ad381e2ac8.jpg",
    },
    City {
        slug: "new-york",
        name: "New York",
        display_name: "New York, NY",
        latitude: 40.71,
        longitude: -74.01,
        image_url: "https://1.bp.blogspot.com/-klHXHFbBkcg/Vh_oH8aFeyI/AAAAAAAADkI/WvdVpR4LWTc/s1600/CORT-NYC-StudyUSA07.jpg",
    },
    City {
        slug: "chicago",
        name: "Chicago",
        display_name: "Chicago, IL",
        latitude: 41.88,
        longitude: -87.63,
        image_url: "https://64.media.tumblr.com/13afe8611d96ea09f138e6b34bc7f672/tumblr_omvl5ulmDa1up9mboo1_1280.jpg",
    },
    City {
        slug: "san-francisco",
        name: "San Francisco",
        display_name: "San Francisco, CA",
        latitude: 37.77,
        longitude: -122.42,
        image_url: "https://images.squarespace-cdn.com/content/v1/5eb9e1f6a256591412b55263/1589316856542-UCHOZOT51ASHZPBDUTW5/Golden-Gate-at-Night.jpg?format=2500w",
    },
];

impl City {
    /// Find a city by slug or by name, ignoring case
    #[must_use]
    pub fn find(key: &str) -> Option<&'static City> {
        let key = key.trim();
        CITIES
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(key) || c.name.eq_ignore_ascii_case(key))
    }

    /// The city selected when none is given
    #[must_use]
    pub fn default_city() -> &'static City {
        &CITIES[0]
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.2}, {:.2}", self.latitude, self.longitude)
    }
}
