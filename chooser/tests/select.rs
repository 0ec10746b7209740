use std::sync::{Arc, Mutex};

use chooser::prelude::*;

type Log = Arc<Mutex<Vec<SelectEvent>>>;

fn recorder() -> (SelectHandlers, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let handlers = SelectHandlers::new().on_event(move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    (handlers, log)
}

fn fruit() -> Vec<OptionDecl> {
    let mut decls = options([("a", "Apple"), ("b", "Banana"), ("x", "X")]);
    decls.push(SelectOption::new("z", "Zucchini").disabled().into());
    decls
}

fn build(config: SelectConfig) -> (Select, Log) {
    let (handlers, log) = recorder();
    let select = Select::with_options(config, fruit()).handlers(handlers);
    (select, log)
}

fn changes(log: &Log) -> Vec<ChangePayload> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            SelectEvent::Change { value, .. } => Some(value.clone()),
            _ => None,
        })
        .collect()
}

fn searches(log: &Log) -> Vec<(String, InputChangeReason)> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            SelectEvent::Search { text, reason } => Some((text.clone(), *reason)),
            _ => None,
        })
        .collect()
}

fn multi(values: &[&str]) -> SelectValue {
    SelectValue::Multiple(values.iter().map(|v| Value::from(*v)).collect())
}

// -----------------------------------------------------------------------------
// Single mode
// -----------------------------------------------------------------------------

#[test]
fn test_single_pick_commits_and_closes_after_settle() {
    let (select, log) = build(SelectConfig::new());
    select.open();
    assert_eq!(select.click_option("b"), EventResult::Consumed);

    assert_eq!(select.value(), SelectValue::from(Value::from("b")));
    // Close is deferred.
    assert!(select.is_open());
    select.run_deferred();
    assert!(!select.is_open());

    assert_eq!(changes(&log), vec![ChangePayload::Raw(Value::from("b").into())]);
}

#[test]
fn test_single_pick_same_value_does_not_emit_change() {
    let (select, log) = build(SelectConfig::new().default_value(Value::from("a")));
    select.open();
    select.click_option("a");
    assert!(changes(&log).is_empty());
}

#[test]
fn test_single_value_never_multiple() {
    let (select, _) = build(SelectConfig::new());
    select.open();
    select.click_option("a");
    select.type_text("x");
    select.on_key(&KeyCombo::key(Key::Backspace));
    select.clear();
    assert!(!select.value().is_multiple());
    assert_eq!(select.check_option("a"), Err(SelectError::NotMultiple));
    assert!(!select.value().is_multiple());
}

#[test]
fn test_disabled_option_click_ignored() {
    let (select, log) = build(SelectConfig::new());
    select.open();
    assert_eq!(select.click_option("z"), EventResult::Ignored);
    assert_eq!(select.click_option("unknown"), EventResult::Ignored);
    assert!(changes(&log).is_empty());
}

#[test]
fn test_label_in_value_emits_labeled_value() {
    let (handlers, _) = recorder();
    let seen: Arc<Mutex<Vec<(ChangePayload, Vec<Option<OptionInfo>>)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let select = Select::with_options(SelectConfig::new().label_in_value(), fruit()).handlers(
        handlers.on_change(move |value, options| {
            sink.lock().unwrap().push((value.clone(), options.to_vec()));
        }),
    );

    select.click_option("x");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].0,
        ChangePayload::Labeled(SelectValue::Single(Some(LabeledValue {
            value: Value::from("x"),
            label: "X".to_string(),
        })))
    );
    let option = seen[0].1[0].as_ref().unwrap();
    assert_eq!(option.option.value, Value::from("x"));
    assert_eq!(option.label(), "X");
}

// -----------------------------------------------------------------------------
// Multiple mode
// -----------------------------------------------------------------------------

#[test]
fn test_multiple_value_always_sequence() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Multiple));
    assert_eq!(select.value(), multi(&[]));
    select.open();
    select.click_option("a");
    select.click_option("a");
    select.clear();
    assert!(select.value().is_multiple());
}

#[test]
fn test_multiple_click_toggles() {
    let (select, log) = build(SelectConfig::new().mode(SelectMode::Multiple));
    select.open();
    select.click_option("a");
    select.click_option("b");
    assert_eq!(select.value(), multi(&["a", "b"]));

    select.click_option("a");
    assert_eq!(select.value(), multi(&["b"]));
    // Multiple mode keeps the list open.
    select.run_deferred();
    assert!(select.is_open());

    let deselects: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            SelectEvent::Deselect { value, option } => Some((value.clone(), option.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(deselects.len(), 1);
    assert_eq!(deselects[0].0, ChangePayload::Raw(Value::from("a").into()));
    assert_eq!(deselects[0].1.as_ref().unwrap().label(), "Apple");
}

#[test]
fn test_check_twice_appends_once() {
    let (select, log) = build(SelectConfig::new().mode(SelectMode::Multiple));
    assert_eq!(select.check_option("a"), Ok(true));
    assert_eq!(select.check_option("a"), Ok(false));
    assert_eq!(select.value(), multi(&["a"]));
    assert_eq!(changes(&log), vec![ChangePayload::Raw(multi(&["a"]))]);
}

#[test]
fn test_check_errors() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Multiple));
    assert_eq!(
        select.check_option("nope"),
        Err(SelectError::UnknownValue(Value::from("nope")))
    );
    assert_eq!(
        select.check_option("z"),
        Err(SelectError::OptionDisabled(Value::from("z")))
    );
    assert_eq!(select.uncheck_option("a"), Ok(false));
}

#[test]
fn test_pick_clears_search_unless_retained() {
    let (select, log) = build(SelectConfig::new().mode(SelectMode::Multiple).show_search(true));
    select.type_text("ban");
    select.click_option("b");
    assert_eq!(select.input_text(), "");
    // Clearing after a pick doesn't trigger a search notification.
    assert_eq!(searches(&log), vec![("ban".to_string(), InputChangeReason::Manual)]);

    let (select, _) = build(
        SelectConfig::new()
            .mode(SelectMode::Multiple)
            .show_search(ShowSearch::Retain),
    );
    select.type_text("ban");
    select.click_option("b");
    assert_eq!(select.input_text(), "ban");
}

#[test]
fn test_remove_checked_at() {
    let (select, _) = build(
        SelectConfig::new()
            .mode(SelectMode::Multiple)
            .default_value(multi(&["a", "b"])),
    );
    assert_eq!(select.remove_checked_at(0), Ok(true));
    assert_eq!(select.value(), multi(&["b"]));
    assert_eq!(
        select.remove_checked_at(5),
        Err(SelectError::IndexOutOfRange { index: 5, len: 1 })
    );
}

#[test]
fn test_clear_keeps_disabled_selection() {
    let (select, log) = build(
        SelectConfig::new()
            .mode(SelectMode::Multiple)
            .default_value(multi(&["a", "z"])),
    );
    select.clear();
    assert_eq!(select.value(), multi(&["z"]));
    assert!(
        log.lock()
            .unwrap()
            .contains(&SelectEvent::Clear { visible: false })
    );
}

#[test]
fn test_backspace_removes_last_enabled() {
    let (select, _) = build(
        SelectConfig::new()
            .mode(SelectMode::Multiple)
            .default_value(multi(&["a", "b", "z"])),
    );
    assert_eq!(select.on_key(&KeyCombo::key(Key::Backspace)), EventResult::Consumed);
    assert_eq!(select.value(), multi(&["a", "z"]));
}

// -----------------------------------------------------------------------------
// Mode switching
// -----------------------------------------------------------------------------

#[test]
fn test_mode_switch_is_silent() {
    let (select, log) = build(SelectConfig::new().default_value(Value::from("a")));
    select.set_mode(SelectMode::Multiple);
    assert_eq!(select.value(), multi(&["a"]));

    select.check_option("b").unwrap();
    select.set_mode(SelectMode::Single);
    assert_eq!(select.value(), SelectValue::from(Value::from("a")));

    // Only the explicit check emitted a change.
    assert_eq!(changes(&log).len(), 1);
}

#[test]
fn test_mode_switch_empty_sequence_to_absent() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Multiple));
    select.set_mode(SelectMode::Single);
    assert_eq!(select.value(), SelectValue::Single(None));
}

// -----------------------------------------------------------------------------
// Controlled value
// -----------------------------------------------------------------------------

#[test]
fn test_controlled_value_ignores_internal_writes() {
    let (select, log) = build(SelectConfig::new().value(Value::from("a")));
    assert_eq!(select.ownership(), ValueOwnership::External);

    select.click_option("b");
    assert_eq!(select.value(), SelectValue::from(Value::from("a")));
    assert_eq!(changes(&log), vec![ChangePayload::Raw(Value::from("b").into())]);

    select.sync_value(Value::from("b"));
    assert_eq!(select.value(), SelectValue::from(Value::from("b")));
}

#[test]
fn test_uncontrolled_ignores_sync() {
    let (select, _) = build(SelectConfig::new());
    select.sync_value(Value::from("b"));
    assert!(select.value().is_empty());
}

#[test]
fn test_unknown_controlled_value_displays_raw() {
    let (select, _) = build(SelectConfig::new().value(Value::from("ghost")));
    let items = select.display_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "ghost");
}

// -----------------------------------------------------------------------------
// Visibility and search
// -----------------------------------------------------------------------------

#[test]
fn test_open_highlights_current_value() {
    let (select, _) = build(SelectConfig::new().default_value(Value::from("b")));
    select.open();
    assert_eq!(select.active_value(), Some(Value::from("b")));
}

#[test]
fn test_open_with_unknown_value_highlights_first() {
    let (select, _) = build(SelectConfig::new().value(Value::from("ghost")));
    select.open();
    assert_eq!(select.active_value(), Some(Value::from("a")));
}

#[test]
fn test_visible_change_fires_once_per_transition() {
    let (select, log) = build(SelectConfig::new());
    assert!(select.open());
    assert!(!select.open());
    assert!(select.close());
    assert!(!select.close());
    let visible: Vec<_> = log
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            SelectEvent::VisibleChange(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(visible, vec![true, false]);
}

#[test]
fn test_close_resets_search_with_one_notification() {
    let (select, log) = build(SelectConfig::new().show_search(true));
    select.type_text("ap");
    assert!(select.is_open());
    log.lock().unwrap().clear();

    select.click_outside();
    assert_eq!(select.input_text(), "");
    assert_eq!(
        searches(&log),
        vec![(String::new(), InputChangeReason::ListClosed)]
    );
}

#[test]
fn test_search_filters_and_moves_highlight() {
    let (select, _) = build(SelectConfig::new().show_search(true));
    select.open();
    assert_eq!(select.active_value(), Some(Value::from("a")));

    select.type_text("ban");
    assert_eq!(select.index().values(), &[Value::from("b")]);
    assert_eq!(select.active_value(), Some(Value::from("b")));
}

#[test]
fn test_typing_while_closed_highlights_visible_option() {
    let (select, _) = build(
        SelectConfig::new()
            .default_value(Value::from("b"))
            .show_search(true),
    );
    select.type_text("app");
    assert!(select.is_open());
    assert_eq!(select.index().values(), &[Value::from("a")]);
    assert_eq!(select.active_value(), Some(Value::from("a")));

    select.on_key(&KeyCombo::key(Key::Enter));
    assert_eq!(select.value(), SelectValue::from(Value::from("a")));
}

#[test]
fn test_typing_keeps_visible_selected_highlight() {
    let (select, _) = build(
        SelectConfig::new()
            .default_value(Value::from("b"))
            .show_search(true),
    );
    select.open();
    select.type_text("an");
    assert_eq!(select.active_value(), Some(Value::from("b")));
}

#[test]
fn test_typing_ignored_without_search_box() {
    let (select, log) = build(SelectConfig::new());
    assert_eq!(select.type_text("ap"), EventResult::Ignored);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_blur_keeps_input_while_open() {
    let (select, log) = build(SelectConfig::new().show_search(true));
    select.type_text("ap");
    log.lock().unwrap().clear();

    select.blur();
    assert_eq!(select.input_text(), "ap");
    assert_eq!(*log.lock().unwrap(), vec![SelectEvent::Blur]);
}

#[test]
fn test_keyboard_navigation() {
    let (select, _) = build(SelectConfig::new());
    assert_eq!(select.on_key(&KeyCombo::key(Key::Down)), EventResult::Consumed);
    assert!(select.is_open());
    assert_eq!(select.active_value(), Some(Value::from("a")));

    select.on_key(&KeyCombo::key(Key::Down));
    select.on_key(&KeyCombo::key(Key::Down));
    assert_eq!(select.active_value(), Some(Value::from("x")));
    // "z" is disabled, so Down wraps to the top.
    select.on_key(&KeyCombo::key(Key::Down));
    assert_eq!(select.active_value(), Some(Value::from("a")));

    select.on_key(&KeyCombo::key(Key::End));
    select.on_key(&KeyCombo::key(Key::Enter));
    assert_eq!(select.value(), SelectValue::from(Value::from("x")));

    select.on_key(&KeyCombo::key(Key::Escape));
    assert!(!select.is_open());
}

#[test]
fn test_hover_ignored_while_navigating_by_keyboard() {
    let (select, _) = build(SelectConfig::new());
    select.open();
    select.on_key(&KeyCombo::key(Key::Down));
    assert_eq!(select.hover("x"), EventResult::Ignored);

    select.mouse_moved();
    assert_eq!(select.hover("x"), EventResult::Consumed);
    assert_eq!(select.active_value(), Some(Value::from("x")));
}

#[test]
fn test_modified_keys_ignored() {
    let (select, _) = build(SelectConfig::new());
    assert!(!select.on_key(&KeyCombo::key(Key::Down).ctrl()).is_handled());
    assert!(!select.on_key(&KeyCombo::key(Key::Enter).alt()).is_handled());
    assert!(!select.is_open());

    let shifted = KeyCombo::new(
        Key::Down,
        Modifiers {
            shift: true,
            ..Modifiers::NONE
        },
    );
    assert!(select.on_key(&shifted).is_handled());
    assert!(select.is_open());
}

// -----------------------------------------------------------------------------
// Deferred tasks
// -----------------------------------------------------------------------------

#[test]
fn test_deferred_scroll_targets_highlight() {
    let scrolled: Arc<Mutex<Vec<OptionKey>>> = Arc::default();
    let sink = Arc::clone(&scrolled);
    let select = Select::with_options(SelectConfig::new().default_value(Value::from("b")), fruit())
        .scroll_target(move |key: &OptionKey| sink.lock().unwrap().push(key.clone()));

    select.open();
    assert!(scrolled.lock().unwrap().is_empty());
    assert_eq!(select.run_deferred(), 1);

    let expected = select.option_info(&Value::from("b")).unwrap().key;
    assert_eq!(*scrolled.lock().unwrap(), vec![expected]);
}

#[test]
fn test_stale_scroll_dropped_after_close() {
    let scrolled: Arc<Mutex<Vec<OptionKey>>> = Arc::default();
    let sink = Arc::clone(&scrolled);
    let select = Select::with_options(SelectConfig::new(), fruit())
        .scroll_target(move |key: &OptionKey| sink.lock().unwrap().push(key.clone()));

    select.open();
    select.close();
    assert_eq!(select.run_deferred(), 0);
    assert!(scrolled.lock().unwrap().is_empty());
    assert!(!select.has_deferred());
}

#[test]
fn test_stale_close_dropped_after_reopen() {
    let (select, _) = build(SelectConfig::new());
    select.open();
    select.click_option("a");
    select.close();
    select.open();

    select.run_deferred();
    // The close queued for the first opening doesn't close the second.
    assert!(select.is_open());
}

// -----------------------------------------------------------------------------
// Tags mode
// -----------------------------------------------------------------------------

#[test]
fn test_tags_enter_creates_tag() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Tags));
    select.type_text("fig");
    assert_eq!(select.origin(&Value::from("fig")), Some(OptionOrigin::Creating));

    assert_eq!(select.on_key(&KeyCombo::key(Key::Enter)), EventResult::Consumed);
    assert_eq!(select.value(), multi(&["fig"]));
    assert_eq!(select.input_text(), "");
    assert_eq!(select.created_tags(), vec![Value::from("fig")]);
    // Still resolvable once the input is cleared.
    assert_eq!(select.origin(&Value::from("fig")), Some(OptionOrigin::Created));
}

#[test]
fn test_tags_enter_picks_option_reached_with_arrows() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Tags));
    select.type_text("ap");
    assert_eq!(select.active_value(), Some(Value::from("ap")));

    select.on_key(&KeyCombo::key(Key::Down));
    assert_eq!(select.active_value(), Some(Value::from("a")));
    select.on_key(&KeyCombo::key(Key::Enter));

    assert_eq!(select.value(), multi(&["a"]));
    assert!(select.created_tags().is_empty());
}

#[test]
fn test_tags_typing_while_open_highlights_new_tag() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Tags));
    select.open();
    assert_eq!(select.active_value(), Some(Value::from("a")));

    // "Apple" still matches, but the typed tag takes the highlight.
    select.type_text("ap");
    assert_eq!(select.active_value(), Some(Value::from("ap")));
    select.on_key(&KeyCombo::key(Key::Enter));
    assert_eq!(select.value(), multi(&["ap"]));
}

#[test]
fn test_tags_enter_without_highlight_creates_tag() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Tags));
    select.type_text("fig");
    select.mouse_moved();
    select.hover_leave();
    assert_eq!(select.active_value(), None);

    select.on_key(&KeyCombo::key(Key::Enter));
    assert_eq!(select.value(), multi(&["fig"]));
    assert_eq!(select.created_tags(), vec![Value::from("fig")]);
}

#[test]
fn test_tags_enter_on_existing_option_picks_it() {
    let (select, _) = build(SelectConfig::new().mode(SelectMode::Tags));
    select.type_text("a");
    assert_eq!(select.on_key(&KeyCombo::key(Key::Enter)), EventResult::Consumed);
    assert_eq!(select.value(), multi(&["a"]));
    assert!(select.created_tags().is_empty());
}

// -----------------------------------------------------------------------------
// Misc
// -----------------------------------------------------------------------------

#[test]
fn test_disabled_select_ignores_input() {
    let (select, log) = build(SelectConfig::new().mode(SelectMode::Multiple).disabled());
    assert!(!select.open());
    assert_eq!(select.click_option("a"), EventResult::Ignored);
    assert_eq!(select.on_key(&KeyCombo::key(Key::Down)), EventResult::Ignored);
    assert_eq!(select.check_option("a"), Err(SelectError::Disabled));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_index_cached_between_reads() {
    let (select, _) = build(SelectConfig::new());
    select.index();
    select.index();
    let builds = select.index_builds();
    select.index();
    assert_eq!(select.index_builds(), builds);

    select.set_options(options([("q", "Q")]));
    assert_eq!(select.index().values(), &[Value::from("q")]);
    assert_eq!(select.index_builds(), builds + 1);
}

#[test]
fn test_set_filter_rebuilds_index() {
    let (select, _) = build(SelectConfig::new().show_search(true));
    select.type_text("ban");
    assert_eq!(select.index().values(), &[Value::from("b")]);
    let builds = select.index_builds();

    select.set_filter(FilterOption::Disabled);
    assert_eq!(select.index().values().len(), 4);
    assert_eq!(select.index_builds(), builds + 1);

    select.set_filter(FilterOption::custom(|query, option| option.label.ends_with(query)));
    select.type_text("a");
    assert_eq!(select.index().values(), &[Value::from("b")]);
}

#[test]
fn test_labels_survive_option_removal() {
    let (select, _) = build(SelectConfig::new());
    select.click_option("b");
    select.set_options(Vec::new());
    assert_eq!(select.display_items()[0].text, "Banana");
}

#[test]
fn test_popup_scroll_forwarded() {
    let (select, log) = build(SelectConfig::new());
    let metrics = ScrollMetrics {
        offset: 90.0,
        viewport: 10.0,
        content: 100.0,
    };
    select.popup_scrolled(metrics);
    assert!(metrics.at_end(0.0));
    assert_eq!(*log.lock().unwrap(), vec![SelectEvent::PopupScroll(metrics)]);
}

#[test]
fn test_dirty_tracking() {
    let (select, _) = build(SelectConfig::new());
    assert!(!select.is_dirty());
    select.open();
    assert!(select.is_dirty());
    select.clear_dirty();
    assert!(!select.is_dirty());
}

#[test]
fn test_clones_share_state() {
    let (select, _) = build(SelectConfig::new());
    let other = select.clone();
    other.click_option("a");
    assert_eq!(select.value(), SelectValue::from(Value::from("a")));
    assert_eq!(select.id(), other.id());
}
