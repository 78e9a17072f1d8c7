use crate::config::MapSettings;
use crate::domain::model::{MapPlan, MarkerGroup, PendingJob, StatusColor};
use crate::utils::error::Result;
use serde::Serialize;

const MAP_ID: &str = "job_map";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const FONT_AWESOME_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

const LEGEND_ROWS: [(StatusColor, &str); 4] = [
    (StatusColor::Blue, "Applied"),
    (StatusColor::Green, "Interview Pending"),
    (StatusColor::Red, "Rejected"),
    (StatusColor::LightGray, "Withdrawn/Other"),
];

#[derive(Serialize)]
struct MapOptions {
    center: [f64; 2],
    zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    id: &'a str,
    attribution: &'a str,
    min_zoom: u8,
    max_zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkerOptions {
    radius: u32,
    color: StatusColor,
    fill: bool,
    fill_color: StatusColor,
    fill_opacity: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopupOptions {
    max_width: u32,
}

/// Renders the plan as one standalone Leaflet page.
pub fn render_map(plan: &MapPlan, settings: &MapSettings, show_pending: bool) -> Result<String> {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(&page_head());
    html.push_str(&format!("<div id=\"{}\"></div>\n", MAP_ID));
    html.push_str(&legend_html());
    if show_pending {
        html.push_str(&pending_list_html(&plan.pending));
    }

    html.push_str("<script>\n");
    html.push_str(&format!(
        "var {} = L.map({}, {});\n",
        MAP_ID,
        js_literal(&MAP_ID)?,
        js_literal(&MapOptions {
            center: [settings.center_lat, settings.center_lon],
            zoom: settings.zoom,
        })?
    ));
    html.push_str(&format!(
        "L.tileLayer({}, {}).addTo({});\n",
        js_literal(&settings.tiles.resolved_url())?,
        js_literal(&TileOptions {
            id: &settings.tiles.name,
            attribution: &settings.tiles.attribution,
            min_zoom: settings.tiles.min_zoom,
            max_zoom: settings.tiles.max_zoom,
        })?,
        MAP_ID
    ));
    for group in &plan.groups {
        html.push_str(&marker_js(group)?);
    }
    if show_pending {
        html.push_str(&pending_script(settings.focus_zoom));
    }
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

/// Popup and tooltip body: one link per job, in input order.
pub fn popup_html(group: &MarkerGroup) -> String {
    group
        .entries
        .iter()
        .map(|entry| {
            format!(
                "<a href=\"{}\" target=\"_blank\">{}</a><br>",
                escape_html(&entry.link),
                escape_html(&entry.text)
            )
        })
        .collect()
}

fn marker_js(group: &MarkerGroup) -> Result<String> {
    let color = group.color();
    let popup = js_literal(&popup_html(group))?;

    Ok(format!(
        "L.circleMarker([{}, {}], {})\n    .bindPopup({}, {})\n    .bindTooltip({})\n    .addTo({});\n",
        group.point.lat,
        group.point.lon,
        js_literal(&MarkerOptions {
            radius: group.radius,
            color,
            fill: true,
            fill_color: color,
            fill_opacity: 0.85,
        })?,
        popup,
        js_literal(&PopupOptions { max_width: 500 })?,
        popup,
        MAP_ID
    ))
}

fn page_head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<title>Job Applications</title>
<link rel="stylesheet" href="{}" />
<link rel="stylesheet" href="{}" />
<script src="{}"></script>
<style>
html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
#{} {{ position: absolute; top: 0; bottom: 0; right: 0; left: 0; }}
</style>
</head>
<body>
"#,
        LEAFLET_CSS, FONT_AWESOME_CSS, LEAFLET_JS, MAP_ID
    )
}

fn legend_html() -> String {
    let rows: String = LEGEND_ROWS
        .iter()
        .map(|(color, label)| {
            format!(
                "  &nbsp; <i class=\"fa fa-circle\" style=\"color:{}\"></i>&nbsp; {} <br>\n",
                color, label
            )
        })
        .collect();

    format!(
        concat!(
            "<div id=\"legend\" style=\"position: fixed; bottom: 50px; right: 10px; width: 150px; height: 150px; ",
            "border:2px solid grey; z-index:9999; font-size:14px; background-color:#2A2B2B; opacity: 0.8; color: white;\">\n",
            "  &nbsp; <b>Legend</b> <br>\n",
            "{}",
            "</div>\n"
        ),
        rows
    )
}

fn pending_list_html(pending: &[PendingJob]) -> String {
    let items: String = pending
        .iter()
        .map(|job| {
            format!(
                "    <div onclick=\"centerMap({}, {})\" style=\"cursor:pointer; margin-bottom:5px;\"><i class=\"fa fa-circle\" style=\"color:{}\"></i> {}</div>\n",
                job.point.lat,
                job.point.lon,
                job.color,
                escape_html(&job.text)
            )
        })
        .collect();

    format!(
        concat!(
            "<div id=\"pendingJobs\" style=\"position: fixed; top: 10px; right: 10px; width: 400px; border:2px solid grey; ",
            "z-index:9999; font-size:14px; background-color:#2A2B2B; opacity: 0.8; color: white;\">\n",
            "  <div id=\"listHeader\" style=\"padding: 10px; cursor: pointer;\" onclick=\"toggleList()\">Pending Jobs &#9654;</div>\n",
            "  <div id=\"jobList\" style=\"height:300px; overflow-y:auto; padding:10px; display:none;\">\n",
            "{}",
            "  </div>\n",
            "</div>\n"
        ),
        items
    )
}

fn pending_script(focus_zoom: u8) -> String {
    format!(
        r#"function toggleList() {{
    var list = document.getElementById('jobList');
    var header = document.getElementById('listHeader');
    if (list.style.display === 'none') {{
        list.style.display = 'block';
        header.innerHTML = 'Pending Jobs &#9660;';
    }} else {{
        list.style.display = 'none';
        header.innerHTML = 'Pending Jobs &#9654;';
    }}
}}
function centerMap(lat, lng) {{
    {}.setView([lat, lng], {});
}}
"#,
        MAP_ID, focus_zoom
    )
}

/// JSON is valid JavaScript; `</` is escaped so the text cannot close the script tag.
fn js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GeoPoint, PopupEntry};

    fn group(entries: Vec<(&str, &str, StatusColor)>) -> MarkerGroup {
        MarkerGroup {
            point: GeoPoint::new(39.53, -119.81),
            entries: entries
                .into_iter()
                .map(|(text, link, color)| PopupEntry {
                    text: text.to_string(),
                    link: link.to_string(),
                    color,
                })
                .collect(),
            radius: 5,
        }
    }

    #[test]
    fn test_popup_concatenates_links() {
        let group = group(vec![
            ("Acme Co - Engineer - Applied - 2024-01-05", "http://x/1", StatusColor::Blue),
            ("Globex - Analyst - Rejected - 2024-01-06", "http://x/2", StatusColor::Red),
        ]);

        assert_eq!(
            popup_html(&group),
            concat!(
                "<a href=\"http://x/1\" target=\"_blank\">Acme Co - Engineer - Applied - 2024-01-05</a><br>",
                "<a href=\"http://x/2\" target=\"_blank\">Globex - Analyst - Rejected - 2024-01-06</a><br>"
            )
        );
    }

    #[test]
    fn test_popup_escapes_markup() {
        let group = group(vec![("AT&T - <Ops>", "http://x/?a=1&b=\"2\"", StatusColor::Blue)]);

        assert_eq!(
            popup_html(&group),
            "<a href=\"http://x/?a=1&amp;b=&quot;2&quot;\" target=\"_blank\">AT&amp;T - &lt;Ops&gt;</a><br>"
        );
    }

    #[test]
    fn test_marker_uses_last_color_and_radius() {
        let mut group = group(vec![
            ("a", "http://x/1", StatusColor::Blue),
            ("b", "http://x/2", StatusColor::Green),
        ]);
        group.radius = 3;

        let js = marker_js(&group).unwrap();

        assert!(js.starts_with("L.circleMarker([39.53, -119.81], "));
        assert!(js.contains(r#""radius":3"#));
        assert!(js.contains(r#""color":"green""#));
        assert!(js.contains(r#""fillColor":"green""#));
        assert!(js.contains(r#""fillOpacity":0.85"#));
        assert!(js.contains(r#"{"maxWidth":500}"#));
        assert!(js.contains(r#"<\/a><br>"#));
    }

    #[test]
    fn test_empty_plan_renders_base_map_and_legend() {
        let mut settings = MapSettings::default();
        settings.tiles.access_token = Some("tok".to_string());

        let html = render_map(&MapPlan::default(), &settings, true).unwrap();

        assert!(html.contains(
            r#"var job_map = L.map("job_map", {"center":[39.8283,-115.5795],"zoom":5});"#
        ));
        assert!(html.contains("jawg-dark/{z}/{x}/{y}{r}.png?access-token=tok"));
        assert!(html.contains(r#""minZoom":0,"maxZoom":22"#));
        assert!(html.contains("<b>Legend</b>"));
        assert!(html.contains("Withdrawn/Other"));
        assert!(html.contains("Pending Jobs &#9654;"));
        assert!(!html.contains("L.circleMarker("));
    }

    #[test]
    fn test_pending_list_recenters_map() {
        let plan = MapPlan {
            pending: vec![PendingJob {
                text: "Acme Co - Engineer".to_string(),
                color: StatusColor::Blue,
                point: GeoPoint::new(39.53, -119.81),
            }],
            ..MapPlan::default()
        };

        let html = render_map(&plan, &MapSettings::default(), true).unwrap();

        assert!(html.contains(r#"onclick="centerMap(39.53, -119.81)""#));
        assert!(html.contains("Acme Co - Engineer</div>"));
        assert!(html.contains("job_map.setView([lat, lng], 12);"));
    }

    #[test]
    fn test_pending_list_can_be_omitted() {
        let html = render_map(&MapPlan::default(), &MapSettings::default(), false).unwrap();

        assert!(!html.contains("Pending Jobs"));
        assert!(!html.contains("function centerMap"));
        assert!(html.contains("<b>Legend</b>"));
    }
}
