//! Scripted walkthrough of a tags-mode select.
//!
//! Logs go to `select.log`.

use std::fs::File;

use chooser::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

fn print_state(select: &Select) {
    let items: Vec<String> = select.display_items().into_iter().map(|d| d.text).collect();
    println!(
        "  open={} input={:?} active={:?} value=[{}]",
        select.is_open(),
        select.input_text(),
        select.active_value(),
        items.join(", ")
    );
}

fn main() {
    if let Ok(log_file) = File::create("select.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let decls = vec![
        OptionDecl::group(
            "Fruit",
            [
                SelectOption::new("apple", "Apple"),
                SelectOption::new("pear", "Pear"),
                SelectOption::new("quince", "Quince").disabled(),
            ],
        ),
        OptionDecl::group(
            "Vegetable",
            [
                SelectOption::new("leek", "Leek"),
                SelectOption::new("kale", "Kale"),
            ],
        ),
    ];

    let select = Select::with_options(
        SelectConfig::new()
            .mode(SelectMode::Tags)
            .show_search(true)
            .label_in_value()
            .placeholder("Pick produce"),
        decls,
    )
    .handlers(
        SelectHandlers::new()
            .on_change(|value, _| println!("-> change {:?}", value))
            .on_deselect(|value, _| println!("-> deselect {:?}", value))
            .on_search(|text, reason| println!("-> search {:?} ({})", text, reason))
            .on_visible_change(|visible| println!("-> visible {}", visible)),
    )
    .scroll_target(|key: &OptionKey| println!("-> scroll to {}", key));

    println!("open with arrow down");
    select.on_key(&KeyCombo::key(Key::Down));
    select.run_deferred();
    print_state(&select);

    println!("move down and pick");
    select.on_key(&KeyCombo::key(Key::Down));
    select.on_key(&KeyCombo::key(Key::Enter));
    select.run_deferred();
    print_state(&select);

    println!("type a new tag");
    select.type_text("fig");
    select.on_key(&KeyCombo::key(Key::Enter));
    print_state(&select);

    println!("search and close");
    select.type_text("le");
    select.click_outside();
    print_state(&select);

    println!("backspace removes the last tag");
    select.on_key(&KeyCombo::key(Key::Backspace));
    print_state(&select);
}
