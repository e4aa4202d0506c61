//! Table markup.

use intake_forms::widgets::html_escape;
use ironhtml::html;

use crate::table::DataTable;

/// Renders the current page of a table with its previous/next controls.
pub fn render_data_table(table: &DataTable) -> String {
    let headers: Vec<String> = table
        .columns()
        .iter()
        .map(|col| format!("<th>{}</th>", html_escape(&col.header)))
        .collect();

    let rows: Vec<String> = table
        .page_rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(cell)))
                .collect();
            format!(r#"<tr class="shad-table-row">{}</tr>"#, cells.concat())
        })
        .collect();

    let body = if rows.is_empty() {
        format!(
            r#"<tr><td colspan="{}" class="h-24 text-center">No results.</td></tr>"#,
            table.columns().len().max(1)
        )
    } else {
        rows.join("\n")
    };

    format!(
        r#"<div class="data-table">
    <table class="table shad-table">
        <thead class="bg-dark-200">
            <tr class="shad-table-row-header">{headers}</tr>
        </thead>
        <tbody>
            {body}
        </tbody>
    </table>
    {actions}
</div>"#,
        headers = headers.concat(),
        body = body,
        actions = render_actions(table),
    )
}

fn render_actions(table: &DataTable) -> String {
    let info = table.page_info();
    let previous_page = info.page_index.saturating_sub(1).to_string();
    let next_page = (info.page_index + 1).to_string();

    let previous = html! {
        button.type_("button").class("btn btn-outline-secondary btn-sm shad-gray-btn") {
            i.class("bi bi-arrow-left")
        }
    }
    .attr("data-page", &previous_page)
    .attr("aria-label", "Previous page")
    .when(!table.can_previous_page(), |b| b.attr("disabled", "disabled"));

    let next = html! {
        button.type_("button").class("btn btn-outline-secondary btn-sm") {
            i.class("bi bi-arrow-right")
        }
    }
    .attr("data-page", &next_page)
    .attr("aria-label", "Next page")
    .when(!table.can_next_page(), |b| b.attr("disabled", "disabled"));

    format!(
        r#"<div class="table-actions d-flex gap-2 align-items-center">{}<span class="text-muted small">Page {} of {}</span>{}</div>"#,
        previous.render(),
        info.page_index + 1,
        info.page_count,
        next.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn test_empty_table_shows_no_results() {
        let table = DataTable::new(
            vec![Column::new("name", "Patient"), Column::new("email", "Email")],
            Vec::new(),
        )
        .unwrap();
        let html = render_data_table(&table);
        assert!(html.contains("No results."));
        assert!(html.contains(r#"colspan="2""#));
        assert_eq!(html.matches(r#"disabled="disabled""#).count(), 2);
    }

    #[test]
    fn test_renders_current_page_only() {
        let rows = vec![
            vec!["Jane <Doe>".to_string()],
            vec!["John Roe".to_string()],
        ];
        let mut table = DataTable::new(vec![Column::new("name", "Patient")], rows)
            .unwrap()
            .with_page_size(1)
            .unwrap();

        let html = render_data_table(&table);
        assert!(html.contains("Jane &lt;Doe&gt;"));
        assert!(!html.contains("John Roe"));
        assert!(html.contains("<th>Patient</th>"));

        table.next_page();
        let html = render_data_table(&table);
        assert!(html.contains("John Roe"));
        assert!(html.contains("2 of 2"));
    }
}
