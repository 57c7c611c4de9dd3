//! End-to-end scenarios stored under `specs/`.
//!
//! Each scenario `NAME` has three files:
//! - `NAME.csv` - input table (comma delimited)
//! - `NAME.cmd` - whitespace-separated command tokens
//! - `NAME.out` - expected output

use sheet_rs::{CommandRegistry, SheetConfig, edit_table};
use std::fs;
use std::path::Path;

fn assert_scenario(name: &str) {
    let spec_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("specs");
    let input = fs::read(spec_dir.join(format!("{name}.csv"))).unwrap();
    let commands = fs::read_to_string(spec_dir.join(format!("{name}.cmd"))).unwrap();
    let expected = fs::read_to_string(spec_dir.join(format!("{name}.out"))).unwrap();

    let tokens: Vec<&str> = commands.split_whitespace().collect();
    let config = SheetConfig::with_delimiters(",").unwrap();
    let registry = CommandRegistry::standard();

    let report = edit_table(&registry, &input, &tokens, &config)
        .unwrap_or_else(|e| panic!("scenario {name} failed: {e}"));

    assert_eq!(
        String::from_utf8(report.output).unwrap(),
        expected,
        "output differs for {name}"
    );
}

macro_rules! scenario_test {
    ($name:ident, $file:expr) => {
        #[test]
        fn $name() {
            assert_scenario($file);
        }
    };
}

scenario_test!(scenario_append_column, "append-column");
scenario_test!(scenario_set_selected_cell, "set-selected-cell");
scenario_test!(scenario_delete_middle_column, "delete-middle-column");
scenario_test!(scenario_round_column, "round-column");
scenario_test!(scenario_reinsert_first_row, "reinsert-first-row");
scenario_test!(scenario_empty_selection, "empty-selection");
scenario_test!(scenario_move_to_end, "move-to-end");
scenario_test!(scenario_combined_selection, "combined-selection");
scenario_test!(scenario_truncate_prices, "truncate-prices");
scenario_test!(scenario_layout_chain, "layout-chain");
scenario_test!(scenario_copy_selected, "copy-selected");
scenario_test!(scenario_swap_last_rows, "swap-last-rows");
scenario_test!(scenario_lower_ragged_trailing, "lower-ragged-trailing");
