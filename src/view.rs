use chrono::NaiveDate;
use comfy_table::{ContentArrangement, Table};
use core_types::Record;

pub const MENU: &str = "\n=== MAIN MENU ===
1. Show students         4. Add student          7. Edit student             10. Delete student
2. Show supervisors      5. Add supervisor       8. Edit supervisor          11. Delete supervisor
3. Show projects         6. Add project          9. Edit project             12. Delete project

13. Generate random data (replaces ALL existing data)
14. Search: grade range + student name
15. Search: date range + supervisor department
16. Search: student stats by project status
0. Exit";

pub const NO_DATA: &str = "No data.";

/// Renders a result set as a table, columns in the row type's declared order.
pub fn render_rows<T: Record>(rows: &[T]) -> String {
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(T::COLUMNS.iter().copied());
    for row in rows {
        table.add_row(row.cells());
    }

    table.to_string()
}

pub fn render_elapsed(elapsed_ms: Option<f64>) -> String {
    match elapsed_ms {
        Some(ms) => format!("Query time: {ms:.2} ms\n"),
        None => "Query time: n/a\n".to_string(),
    }
}

pub fn grade_search_header(min: i32, max: i32, name_pattern: &str) -> String {
    format!("\n=== RESULTS FOR grade {min}..{max} AND student name ILIKE '{name_pattern}' ===")
}

pub fn date_search_header(start: NaiveDate, end: NaiveDate, department_pattern: &str) -> String {
    format!("\n=== RESULTS FOR date {start}..{end} AND department ILIKE '{department_pattern}' ===")
}

pub fn stats_search_header(status_pattern: &str, min_avg: i32) -> String {
    format!("\n=== RESULTS FOR status ILIKE '{status_pattern}' AND avg_grade >= {min_avg} ===")
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Student;

    #[test]
    fn empty_result_is_a_single_notice() {
        let rows: Vec<Student> = Vec::new();
        assert_eq!(render_rows(&rows), "No data.");
    }

    #[test]
    fn table_has_header_and_rows_in_order() {
        let rows = vec![
            Student {
                student_id: 1,
                name: "Ivan Lapin".to_string(),
                email: "ivan@x.com".to_string(),
                group_name: "КВ-31".to_string(),
            },
            Student {
                student_id: 2,
                name: "Maryna Starovoit".to_string(),
                email: "maryna@x.com".to_string(),
                group_name: "КВ-32".to_string(),
            },
        ];
        let rendered = render_rows(&rows);

        let header = rendered.find("student_id").unwrap();
        let group = rendered.find("group").unwrap();
        let first = rendered.find("Ivan Lapin").unwrap();
        let second = rendered.find("Maryna Starovoit").unwrap();
        assert!(header < group && group < first && first < second);
        assert!(rendered.contains("КВ-32"));
    }

    #[test]
    fn elapsed_has_two_decimals() {
        assert_eq!(render_elapsed(Some(1.23456)), "Query time: 1.23 ms\n");
        assert_eq!(render_elapsed(None), "Query time: n/a\n");
    }

    #[test]
    fn headers_describe_the_active_filter() {
        assert_eq!(
            grade_search_header(80, 90, "%Ivan%"),
            "\n=== RESULTS FOR grade 80..90 AND student name ILIKE '%Ivan%' ==="
        );
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert!(date_search_header(start, end, "FI%").contains("date 2025-01-01..2025-06-30"));
        assert!(stats_search_header("completed", 75).ends_with("avg_grade >= 75 ==="));
    }

    #[test]
    fn menu_lists_every_code() {
        for code in 0..=16 {
            assert!(MENU.contains(&format!("{code}. ")), "missing {code}");
        }
    }
}
