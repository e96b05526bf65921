//! Popup HTML for a styled region.

use advisory_common::{AdvisoryRecord, FirstHeight};

const ARRIVAL_DISPLAY_FORMAT: &str = "%m/%d %H:%M";

/// Build the popup body for a record.
pub fn popup_html(record: &AdvisoryRecord) -> String {
    let mut content = format!("<h3>{}</h3>", escape_html(&record.name));

    if record.immediate {
        content.push_str("<strong>ただちに津波来襲と予測</strong><br>");
    }

    if let Some(max_height) = &record.max_height {
        match (max_height.value, &max_height.description) {
            (Some(value), _) => content.push_str(&format!("最大津波高: {}m<br>", value)),
            (None, Some(description)) => {
                content.push_str(&format!("最大津波高: {}<br>", escape_html(description)))
            }
            (None, None) => {}
        }
    }

    let arrival = record.first_height.as_ref().and_then(FirstHeight::arrival_time);
    match &record.first_height {
        Some(FirstHeight::Condition { condition }) => {
            content.push_str(&format!("初動: {}<br>", escape_html(condition)));
        }
        Some(FirstHeight::Arrival { arrival_time }) => {
            let shown = arrival
                .map(|t| t.format(ARRIVAL_DISPLAY_FORMAT).to_string())
                .unwrap_or_else(|| escape_html(arrival_time));
            content.push_str(&format!("初動: {} 到達予想<br>", shown));
        }
        None => {}
    }

    content
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
