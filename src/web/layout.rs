//! HTML views for the detail and summary pages

use crate::models::{CITIES, City, DailyForecast};
use crate::suggestions::{self, DaySuggestion};
use crate::web::chart;

pub const SUMMARY_DAYS: usize = 3;

const DETAIL_BACKGROUND_URL: &str = "https://static.vecteezy.com/system/resources/previews/003/692/649/large_2x/beautiful-clear-blue-sky-in-summer-look-lke-heaven-free-photo.jpg";
const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// Escape text for HTML element and attribute content
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, head_extra: &str, body_class: &str, body_style: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_extra}<title>{title}</title>
<link rel="stylesheet" href="{BOOTSTRAP_CSS}">
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<div class="{body_class}" style="{body_style}">
{content}
</div>
</body>
</html>
"#,
        title = escape(title),
        body_style = escape(body_style),
    )
}

fn header(title: &str, link_text: &str, link_href: &str) -> String {
    format!(
        r#"<header class="page-header">
<h2>{}</h2>
<div><a class="page-link" href="{}">{}</a></div>
</header>"#,
        escape(title),
        escape(link_href),
        escape(link_text)
    )
}

fn city_dropdown(action: &str, id: &str, selected: &City) -> String {
    let options: String = CITIES
        .iter()
        .map(|city| {
            let marker = if city.slug == selected.slug { " selected" } else { "" };
            format!(
                r#"<option value="{}"{marker}>{}</option>"#,
                city.slug,
                escape(city.display_name)
            )
        })
        .collect();

    format!(
        r#"<form class="city-form" method="get" action="{action}">
<select id="{id}" name="city" class="form-select city-dropdown" onchange="this.form.submit()">{options}</select>
<noscript><button type="submit" class="btn btn-light mt-2">Show</button></noscript>
</form>"#
    )
}

fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger load-error" role="alert">{}</div>"#,
        escape(message)
    )
}

fn forecast_table(days: &[DailyForecast], suggestions: &[DaySuggestion]) -> String {
    let rows: String = days
        .iter()
        .zip(suggestions)
        .map(|(day, suggestion)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.0}</td><td class=\"activity\">{}</td></tr>",
                escape(&day.date_label()),
                day.description(),
                day.rain_in,
                day.wind_mph,
                escape(&suggestion.activity.text)
            )
        })
        .collect();

    format!(
        r#"<div class="table-responsive"><table class="table forecast-table">
<thead><tr><th>Date</th><th>Description</th><th>Rain (in)</th><th>Wind (mph)</th><th>Activity Suggestions</th></tr></thead>
<tbody>{rows}</tbody>
</table></div>"#
    )
}

/// 7-day page: temperature chart and detail table
#[must_use]
pub fn detail_page(
    city: &City,
    forecast: Result<&[DailyForecast], String>,
    refresh_interval_seconds: u64,
) -> String {
    let mut content = header(
        "7-Day Detailed Weather Forecast",
        "→ Go to 3-Day City Summary",
        &format!("/summary?city={}", city.slug),
    );
    content.push_str(&city_dropdown("/", "city-dropdown-detailed", city));
    content.push_str(r#"<div class="panel">"#);

    match forecast {
        Ok(days) => {
            let suggestions = suggestions::suggest_days(city, days);
            content.push_str(&format!(
                r#"<h4 class="chart-title">7-day Temperature Trend for {}</h4>"#,
                escape(city.display_name)
            ));
            content.push_str(&chart::temperature_chart(days));
            content.push_str(&format!(
                r#"<h4 class="table-title">7-Day Forecast Details for {}</h4>"#,
                escape(city.display_name)
            ));
            content.push_str(&forecast_table(days, &suggestions));
        }
        Err(message) => content.push_str(&error_banner(&message)),
    }
    content.push_str("</div>");

    let refresh = format!(
        r#"<meta http-equiv="refresh" content="{refresh_interval_seconds}">
<script src="{}" charset="utf-8"></script>"#,
        chart::PLOTLY_JS
    );
    let style = format!("background-image: url(\"{DETAIL_BACKGROUND_URL}\");");
    page(
        &format!("Weather Forecast - {}", city.display_name),
        &format!("{refresh}\n"),
        "page detail-page",
        &style,
        &content,
    )
}

fn max_temp_value(day: &DailyForecast) -> String {
    format!("{:.0}", day.max_temp_f)
}

fn summary_cards(city: &City, days: &[DailyForecast]) -> String {
    let days = &days[..days.len().min(SUMMARY_DAYS)];
    let suggestions = suggestions::suggest_days(city, days);

    let row = |cells: Vec<String>| -> String {
        let cols: String = cells
            .into_iter()
            .map(|cell| format!(r#"<div class="col-4">{cell}</div>"#))
            .collect();
        format!(r#"<div class="row justify-content-center">{cols}</div>"#)
    };

    let mut html = String::new();
    html.push_str(&row(days
        .iter()
        .map(|d| format!(r#"<div class="card card-header-cell"><h4 class="card-title">{}</h4></div>"#, escape(&d.date_label())))
        .collect()));
    html.push_str(&row(days
        .iter()
        .map(|d| format!(r#"<div class="card card-header-cell"><div class="description">{}</div></div>"#, d.description()))
        .collect()));

    let metrics: [(&str, &str, &str, fn(&DailyForecast) -> String); 3] = [
        ("Max Temp (°F)", "🌡️", "metric-temp", max_temp_value),
        ("Rain (in)", "💧", "metric-rain", DailyForecast::format_rain),
        ("Wind (mph)", "🌬️", "metric-wind", DailyForecast::format_wind),
    ];
    for (label, icon, class, value) in metrics {
        html.push_str(&row(days
            .iter()
            .map(|d| {
                format!(
                    r#"<div class="card metric-card"><h5 class="card-subtitle">{label}</h5><h2 class="{class}">{}</h2><div>{icon}</div></div>"#,
                    value(d)
                )
            })
            .collect()));
    }

    html.push_str(&row(suggestions
        .iter()
        .map(|s| {
            format!(
                r#"<div class="card suggestion-card"><h5 class="card-subtitle">Suggested Activity</h5><div class="suggestion">{}</div></div>"#,
                escape(&s.activity.text)
            )
        })
        .collect()));

    html.push_str(&row(suggestions
        .iter()
        .map(|s| {
            format!(
                r#"<div class="card suggestion-card"><h5 class="card-subtitle">Food Suggestion 🍔</h5><div class="suggestion"><strong>{}</strong> ({}). <strong>Suggestion:</strong> {} <strong>Estimated Budget: {}</strong></div></div>"#,
                escape(s.food.dish),
                escape(s.food.style),
                escape(s.food.tip),
                escape(s.price_range)
            )
        })
        .collect()));

    html
}

/// 3-day page: metric and suggestion cards over the city photo
#[must_use]
pub fn summary_page(city: &City, forecast: Result<&[DailyForecast], String>) -> String {
    let mut content = header(
        "City 3-Day Forecast Summary",
        "← Back to Detailed Forecast",
        &format!("/?city={}", city.slug),
    );
    content.push_str(&city_dropdown("/summary", "city-dropdown-summary", city));
    content.push_str(r#"<div id="summary-cards" class="summary-cards">"#);
    match forecast {
        Ok(days) => content.push_str(&summary_cards(city, days)),
        Err(message) => content.push_str(&error_banner(&message)),
    }
    content.push_str("</div>");

    let style = format!(
        "background-image: linear-gradient(rgba(0, 0, 0, 0.4), rgba(0, 0, 0, 0.4)), url(\"{}\");",
        city.image_url
    );
    page(
        &format!("3-Day Summary - {}", city.display_name),
        "",
        "page summary-page",
        &style,
        &content,
    )
}

/// Standalone error page for unknown routes and cities
#[must_use]
pub fn not_found_page(message: &str) -> String {
    let mut content = header("Page not found", "← Back to Detailed Forecast", "/");
    content.push_str(r#"<div class="panel">"#);
    content.push_str(&error_banner(message));
    content.push_str("</div>");
    page("Not found", "", "page detail-page", "", &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCode;
    use chrono::{Days, NaiveDate};

    fn days(count: u64) -> Vec<DailyForecast> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| DailyForecast {
                date: start.checked_add_days(Days::new(i)).unwrap(),
                max_temp_f: 95.0,
                min_temp_f: 75.0,
                rain_in: 0.0,
                wind_mph: 8.0,
                weather_code: WeatherCode(0),
                precipitation_probability: Some(0),
                cloud_cover: Some(5),
            })
            .collect()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_detail_page_renders_chart_and_table() {
        let city = City::find("honolulu").unwrap();
        let week = days(7);
        let html = detail_page(city, Ok(&week), 86_400);

        assert!(html.contains("7-day Temperature Trend for Honolulu, HI"));
        assert!(html.contains(chart::PLOTLY_JS));
        assert!(html.contains(r#"Plotly.newPlot("temperature-chart""#));
        assert_eq!(html.matches("<tr><td>").count(), 7);
        assert!(html.contains("Monday, January 1st"));
        assert!(html.contains("OUTDOOR: Beach Day, Surfing, Diamond Head Hike"));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="86400">"#));
        assert!(html.contains(r#"<option value="honolulu" selected>"#));
        assert!(!html.contains("load-error"));
    }

    #[test]
    fn test_detail_page_error_state() {
        let city = City::find("chicago").unwrap();
        let html = detail_page(city, Err("Unable to load".to_string()), 60);
        assert!(html.contains("load-error"));
        assert!(html.contains("Unable to load"));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_summary_page_shows_three_days() {
        let city = City::find("new-york").unwrap();
        let week = days(7);
        let html = summary_page(city, Ok(&week));

        assert!(html.contains("Monday, January 1st"));
        assert!(html.contains("Wednesday, January 3rd"));
        assert!(!html.contains("Thursday, January 4th"));
        assert_eq!(html.matches("Suggested Activity").count(), 3);
        assert!(html.contains("Estimated Budget: $15 - $35"));
        assert!(html.contains("CORT-NYC-StudyUSA07.jpg"));
        assert!(html.contains(r#"<option value="new-york" selected>"#));
    }

    #[test]
    fn test_summary_page_with_short_forecast() {
        let city = City::find("chicago").unwrap();
        let two = days(2);
        let html = summary_page(city, Ok(&two));
        assert_eq!(html.matches("Suggested Activity").count(), 2);
    }
}
