use std::fmt::Write;

use crate::config::DashboardMode;
use crate::dashboard::{Dashboard, GroupFinances};
use crate::summary::{GameRecord, GroupSummary};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #101218; color: #e8e8ee; margin: 0; padding: 2rem; }
h1 { margin-top: 0; }
.group { background: #1a1d26; border-radius: 8px; padding: 1rem 1.5rem; margin-bottom: 1.5rem; }
.group.error { border: 1px solid #e05260; }
.total { font-size: 1.4rem; font-weight: 600; color: #7fd68b; }
table { border-collapse: collapse; width: 100%; margin-top: .5rem; }
th, td { text-align: left; padding: .35rem .5rem; border-bottom: 1px solid #2a2e3a; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
a { color: #8ab4ff; }
.muted { color: #8a8fa0; }
"#;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the whole dashboard page. `place_url` is the base that game links
/// are built from.
pub fn render_page(dashboard: &Dashboard, place_url: &str) -> String {
    let (title, metric_label) = match dashboard.mode {
        DashboardMode::Players => ("Group player counts", "Playing now"),
        DashboardMode::Revenue => ("Group revenue (last 30 days)", "Revenue"),
    };

    let mut groups = String::new();
    for summary in &dashboard.analysis_data {
        render_group(&mut groups, summary, dashboard.mode, metric_label, place_url);
    }

    let mut finances = String::new();
    if !dashboard.finances.is_empty() {
        finances.push_str("<h2>Group finances</h2>\n");
        for f in &dashboard.finances {
            render_finances(&mut finances, f);
        }
    }

    // Raw data for scripts; `<` is escaped so the payload can't close the tag.
    let data = serde_json::to_string(dashboard)
        .unwrap_or_else(|_| "null".into())
        .replace('<', "\\u003c");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{title}</h1>
{groups}{finances}<script type="application/json" id="analysis-data">{data}</script>
</body>
</html>
"#
    )
}

fn render_group(
    out: &mut String,
    summary: &GroupSummary,
    mode: DashboardMode,
    metric_label: &str,
    place_url: &str,
) {
    if summary.is_error() {
        let _ = write!(
            out,
            "<section class=\"group error\">\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
            escape_html(&summary.group_name),
            escape_html(&summary.total_summary),
        );
        return;
    }

    let _ = write!(
        out,
        "<section class=\"group\">\n<h2>{} <span class=\"muted\">#{}</span></h2>\n\
         <p>Total: <span class=\"total\">{}</span></p>\n",
        escape_html(&summary.group_name),
        summary.group_id,
        escape_html(&summary.total_summary),
    );

    if summary.games_data.is_empty() {
        out.push_str("<p class=\"muted\">No games found.</p>\n</section>\n");
        return;
    }

    let _ = write!(
        out,
        "<table>\n<tr><th>Game</th><th>Universe</th><th>{metric_label}</th></tr>\n"
    );
    for game in &summary.games_data {
        render_game_row(out, game, mode, place_url);
    }
    out.push_str("</table>\n</section>\n");
}

fn render_game_row(out: &mut String, game: &GameRecord, mode: DashboardMode, place_url: &str) {
    let name = escape_html(&game.name);
    let name_cell = match game.place_id {
        Some(place_id) => format!(
            "<a href=\"{}/{place_id}\">{name}</a>",
            escape_html(place_url.trim_end_matches('/'))
        ),
        None => name,
    };
    let metric = match mode {
        DashboardMode::Players => crate::summary::format_thousands(game.current_players),
        DashboardMode::Revenue => escape_html(&game.total_revenue),
    };
    let _ = writeln!(
        out,
        "<tr><td>{name_cell}</td><td>{}</td><td class=\"num\">{metric}</td></tr>",
        game.universe_id
    );
}

fn render_finances(out: &mut String, f: &GroupFinances) {
    let _ = write!(
        out,
        "<section class=\"group\">\n<h3>{}</h3>\n<p>Funds: <span class=\"total\">{}</span></p>\n",
        escape_html(&f.group_name),
        escape_html(&f.funds),
    );

    if let Some(note) = &f.sales_note {
        let _ = writeln!(out, "<p class=\"muted\">Recent sales: {}</p>", escape_html(note));
    } else if f.recent_sales.is_empty() {
        out.push_str("<p class=\"muted\">No recent sales.</p>\n");
    } else {
        out.push_str("<table>\n<tr><th>When</th><th>Item</th><th>Buyer</th><th>Robux</th></tr>\n");
        for sale in &f.recent_sales {
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                escape_html(sale.created.as_deref().unwrap_or("")),
                escape_html(&sale.item),
                escape_html(&sale.buyer),
                crate::summary::format_thousands(sale.amount),
            );
        }
        out.push_str("</table>\n");
    }
    out.push_str("</section>\n");
}
