//! Plotly line chart of daily max/min temperatures

use plotly::common::{Line, Marker, Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};

use crate::models::DailyForecast;

/// Element id the chart is drawn into
pub const CHART_DIV_ID: &str = "temperature-chart";
/// plotly.js bundle loaded by pages that embed a chart
pub const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

pub const MAX_COLOR: &str = "red";
pub const MIN_COLOR: &str = "blue";

fn trace(
    labels: &[String],
    days: &[DailyForecast],
    name: &str,
    color: &'static str,
    value: impl Fn(&DailyForecast) -> f32,
) -> Box<Scatter<String, f32>> {
    let temps: Vec<f32> = days.iter().map(value).collect();
    Scatter::new(labels.to_vec(), temps)
        .mode(Mode::LinesMarkers)
        .name(name)
        .line(Line::new().color(color).width(2.5))
        .marker(Marker::new().color(color).size(8))
}

/// Both temperature series with titled axes
#[must_use]
pub fn temperature_plot(days: &[DailyForecast]) -> Plot {
    let labels: Vec<String> = days.iter().map(DailyForecast::short_label).collect();

    let mut plot = Plot::new();
    plot.add_trace(trace(&labels, days, "Max Temp", MAX_COLOR, |d| d.max_temp_f));
    plot.add_trace(trace(&labels, days, "Min Temp", MIN_COLOR, |d| d.min_temp_f));
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .y_axis(Axis::new().title(Title::with_text("Temperature (°F)")))
            .height(400),
    );
    plot
}

/// Chart container plus the script that draws into it. An empty forecast
/// yields a placeholder and no script.
#[must_use]
pub fn temperature_chart(days: &[DailyForecast]) -> String {
    if days.is_empty() {
        return format!(r#"<div id="{CHART_DIV_ID}" class="temp-chart">No forecast data</div>"#);
    }

    // Keep the JSON from closing the script element early
    let figure = temperature_plot(days).to_json().replace("</", "<\\/");
    format!(
        r#"<div id="{CHART_DIV_ID}" class="temp-chart"></div>
<script type="text/javascript">Plotly.newPlot("{CHART_DIV_ID}", {figure});</script>"#
    )
}
