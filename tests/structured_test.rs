//! Section and table recovery through the public API.

#![allow(clippy::expect_used)] // expect() is appropriate in tests for clear panic messages

use crease::structured::{build_table, extract_sections, extract_tables};
use crease::Section;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn nested_heading_text_belongs_to_outer_section() {
    let sections = extract_sections(
        "<h2>Squad</h2><p>XI named.</p><h3>Sub</h3><p>Bench</p><h2>Venue</h2><p>Stadium.</p>",
    );

    let outer: Vec<&Section> = sections.iter().filter(|s| s.level == 2).collect();
    assert_eq!(outer.len(), 2);
    assert_eq!(outer[0].title, "Squad");
    assert_eq!(outer[0].content, "XI named. Sub Bench");
    assert_eq!(outer[1].title, "Venue");
    assert_eq!(outer[1].content, "Stadium.");
}

#[test]
fn batting_table_renders_text_and_rows() {
    let tables = extract_tables(
        "<table><thead><tr><th>Player</th><th>Runs</th></tr></thead>\
         <tbody><tr><td>Kohli</td><td>45</td></tr><tr><td>Sharma</td><td>60</td></tr></tbody></table>",
    );

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(
        table.text_representation,
        "Player | Runs\n--- | ---\nKohli | 45\nSharma | 60"
    );
    assert_eq!(table.row_count, 2);
    assert_eq!(table.column_count, 2);

    let expected: Vec<IndexMap<String, String>> = [("Kohli", "45"), ("Sharma", "60")]
        .into_iter()
        .map(|(player, runs)| {
            IndexMap::from([
                ("Player".to_string(), player.to_string()),
                ("Runs".to_string(), runs.to_string()),
            ])
        })
        .collect();
    assert_eq!(table.structured_rows.as_ref(), Some(&expected));
}

#[test]
fn points_table_serializes_with_ordered_keys() {
    let tables = extract_tables(
        "<table><caption>Points Table</caption>\
         <tr><th>Team</th><th>P</th><th>Pts</th></tr>\
         <tr><td>KKR</td><td>14</td><td>20</td></tr></table>",
    );

    let json = serde_json::to_string(&tables[0].structured_rows).expect("serializable");
    assert_eq!(json, r#"[{"Team":"KKR","P":"14","Pts":"20"}]"#);
    assert!(tables[0].text_representation.starts_with("Table: Points Table\n\n"));
}

#[test]
fn short_rows_pad_missing_cells_in_mappings() {
    let tables = extract_tables(
        "<table><tr><th>Bowler</th><th>O</th><th>W</th></tr><tr><td>Bumrah</td><td>4</td></tr></table>",
    );

    let rows = tables[0].structured_rows.as_ref().expect("mapped rows");
    assert_eq!(rows[0].get("W").map(String::as_str), Some(""));
}

#[test]
fn multi_line_cells_keep_their_words_apart() {
    let tables = extract_tables(
        "<table><tr><th>Bowler</th><th>Figures</th></tr>\
         <tr><td>Jasprit<br>Bumrah</td><td>4-0-21-3</td></tr></table>",
    );

    assert_eq!(tables[0].rows, vec![vec!["Jasprit Bumrah", "4-0-21-3"]]);
    assert_eq!(
        tables[0].text_representation,
        "Bowler | Figures\n--- | ---\nJasprit Bumrah | 4-0-21-3"
    );
}

#[test]
fn blank_and_headerless_tables() {
    assert!(extract_tables("<table><tr><td> </td></tr></table>").is_empty());

    let tables = extract_tables("<table><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>");
    // First row doubles as the header when there is no thead or th.
    assert_eq!(tables[0].headers, vec!["1", "2"]);
    assert_eq!(tables[0].rows, vec![vec!["3", "4"]]);
}

#[test]
fn nested_table_rows_stay_with_their_own_table() {
    let tables = extract_tables(
        "<table><tr><th>Outer</th></tr><tr><td>\
         <table><tr><th>Inner</th></tr><tr><td>x</td></tr></table>\
         </td></tr></table>",
    );

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].headers, vec!["Inner"]);
    assert_eq!(tables[1].rows, vec![vec!["x"]]);
}

#[test]
fn malformed_input_degrades_to_empty() {
    assert!(extract_sections("").is_empty());
    assert!(extract_tables("   ").is_empty());
    assert!(extract_sections("<h2").is_empty());
}

fn cell() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

proptest! {
    #[test]
    fn column_count_is_widest_row_or_header(
        headers in proptest::collection::hash_set(cell(), 0..5),
        rows in proptest::collection::vec(proptest::collection::vec(cell(), 1..7), 0..6),
    ) {
        let headers: Vec<String> = headers.into_iter().collect();
        let widest = rows.iter().map(Vec::len).chain([headers.len()]).max().unwrap_or(0);

        let table = build_table(0, "", headers.clone(), rows.clone());

        prop_assert_eq!(table.column_count, widest);
        prop_assert_eq!(table.row_count, rows.len());
        match &table.structured_rows {
            Some(mapped) => {
                prop_assert!(!headers.is_empty() && !rows.is_empty());
                prop_assert_eq!(mapped.len(), rows.len());
                for entry in mapped {
                    let keys: Vec<&String> = entry.keys().collect();
                    prop_assert_eq!(keys, headers.iter().collect::<Vec<_>>());
                }
            }
            None => prop_assert!(headers.is_empty() || rows.is_empty()),
        }
    }

    #[test]
    fn flat_headings_split_text_exactly(
        parts in proptest::collection::vec((cell(), cell()), 1..8),
    ) {
        let html: String = parts
            .iter()
            .map(|(title, body)| format!("<h2>{title}</h2><p>{body}</p>"))
            .collect();

        let sections = extract_sections(&html);

        prop_assert_eq!(sections.len(), parts.len());
        for (section, (title, body)) in sections.iter().zip(&parts) {
            prop_assert_eq!(section.level, 2);
            prop_assert_eq!(&section.title, title);
            prop_assert_eq!(&section.content, body);
        }
    }
}
