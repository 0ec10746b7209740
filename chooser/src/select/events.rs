//! Input dispatch for the Select widget.
//!
//! These never fail: input that doesn't apply in the current state is
//! reported as [`EventResult::Ignored`].

use crate::config::SelectMode;
use crate::deferred::DeferredTask;
use crate::events::{InputChangeReason, SelectEvent};
use crate::index::Direction;
use crate::input::{EventResult, Key, KeyCombo, ScrollMetrics};
use crate::value::{SelectValue, Value};
use crate::visibility::Visibility;

use super::state::{Select, SelectInner};

impl SelectInner {
    /// Pick `value` as if clicked in the list.
    fn pick(&mut self, value: &Value, events: &mut Vec<SelectEvent>) -> EventResult {
        let index = self.index();
        let Some(info) = index.get(value) else {
            return EventResult::Ignored;
        };
        if info.is_disabled() {
            return EventResult::Ignored;
        }

        if self.config.mode.is_multiple() {
            let result = if self.store.current().contains(value) {
                self.uncheck(value, events)
            } else {
                self.check(value, events)
            };
            if let Err(err) = result {
                log::debug!("Select pick {} ignored: {}", value, err);
                return EventResult::Ignored;
            }
            if !self.config.show_search.retains_input() {
                self.update_input(String::new(), InputChangeReason::OptionChecked, events);
            }
        } else {
            if self.store.current().first() != Some(value) {
                self.commit(SelectValue::Single(Some(value.clone())), events);
            }
            self.coord.schedule(DeferredTask::ClosePopup);
        }
        EventResult::Consumed
    }

    /// Enter in tags mode with nothing highlighted: create the tag.
    fn create_tag(&mut self, events: &mut Vec<SelectEvent>) -> EventResult {
        let text = self.coord.text().to_string();
        if text.is_empty() {
            return EventResult::Ignored;
        }
        let value = Value::from(text);
        match self.check(&value, events) {
            Ok(_) => {
                self.update_input(String::new(), InputChangeReason::OptionChecked, events);
                EventResult::Consumed
            }
            Err(err) => {
                log::debug!("Select tag {} not created: {}", value, err);
                EventResult::Ignored
            }
        }
    }

    fn accepts_text(&self) -> bool {
        self.config.show_search.is_enabled() || self.config.mode == SelectMode::Tags
    }
}

impl Select {
    /// Handle a click on the option with `value`.
    ///
    /// Disabled and unknown options are ignored. Multiple mode toggles the
    /// option; single mode commits it and closes the list on the next
    /// [`run_deferred`](Select::run_deferred).
    pub fn click_option(&self, value: impl Into<Value>) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        let value = value.into();
        self.mutate(|inner, events| inner.pick(&value, events))
            .unwrap_or(EventResult::Ignored)
    }

    /// The user edited the search box.
    ///
    /// Opens the list when text is entered while closed.
    pub fn type_text(&self, text: impl Into<String>) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        let text = text.into();
        self.mutate(|inner, events| {
            if !inner.accepts_text() {
                return EventResult::Ignored;
            }
            let open = !text.is_empty() && !inner.coord.is_open();
            inner.update_input(text, InputChangeReason::Manual, events);
            if open {
                inner.set_visible(Visibility::Open, events);
            }
            EventResult::Consumed
        })
        .unwrap_or(EventResult::Ignored)
    }

    /// Handle a key press while focused.
    pub fn on_key(&self, key: &KeyCombo) -> EventResult {
        if self.is_disabled() || key.modifiers.ctrl || key.modifiers.alt {
            return EventResult::Ignored;
        }
        self.mutate(|inner, events| {
            if !inner.coord.is_open() {
                return match key.key {
                    Key::Enter | Key::Space | Key::Down => {
                        inner.set_visible(Visibility::Open, events);
                        EventResult::Consumed
                    }
                    Key::Backspace => remove_last(inner, events),
                    _ => EventResult::Ignored,
                };
            }

            match key.key {
                Key::Up | Key::Down => {
                    let direction = if key.key == Key::Up {
                        Direction::Up
                    } else {
                        Direction::Down
                    };
                    let index = inner.index();
                    inner.coord.move_active(direction, &index);
                    EventResult::Consumed
                }
                Key::Home | Key::End => {
                    let index = inner.index();
                    let target = if key.key == Key::Home {
                        index.first_navigable()
                    } else {
                        index.next_navigable(None, Direction::Up)
                    };
                    inner.coord.set_active(target.cloned());
                    EventResult::Consumed
                }
                Key::Enter => match inner.coord.active().cloned() {
                    Some(value) => inner.pick(&value, events),
                    None if inner.config.mode == SelectMode::Tags => inner.create_tag(events),
                    None => EventResult::Ignored,
                },
                Key::Escape | Key::Tab => {
                    inner.set_visible(Visibility::Closed, events);
                    EventResult::Consumed
                }
                Key::Backspace => remove_last(inner, events),
                _ => EventResult::Ignored,
            }
        })
        .unwrap_or(EventResult::Ignored)
    }

    /// The select received focus.
    pub fn focus(&self) {
        self.mutate(|_, events| events.push(SelectEvent::Focus));
    }

    /// The select lost focus. Clears the search text if the list is closed.
    pub fn blur(&self) {
        self.mutate(|inner, events| {
            events.push(SelectEvent::Blur);
            if !inner.coord.is_open() {
                inner.update_input(String::new(), InputChangeReason::ListClosed, events);
            }
        });
    }

    /// A click landed outside the select and its popup.
    pub fn click_outside(&self) -> EventResult {
        if self.close() {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    /// Clear button: empties the selection and the search text.
    ///
    /// In multiple mode, selected options that are disabled stay selected.
    pub fn clear(&self) -> EventResult {
        if self.is_disabled() {
            return EventResult::Ignored;
        }
        self.mutate(|inner, events| {
            let index = inner.index();
            let next = inner.store.cleared(&index);
            inner.commit(next, events);
            inner.update_input(String::new(), InputChangeReason::Manual, events);
            events.push(SelectEvent::Clear {
                visible: inner.coord.is_open(),
            });
            EventResult::Consumed
        })
        .unwrap_or(EventResult::Ignored)
    }

    /// The pointer entered the option with `value`.
    pub fn hover(&self, value: impl Into<Value>) -> EventResult {
        let value = value.into();
        let moved = self
            .mutate(|inner, _| inner.coord.is_open() && inner.coord.hover(value))
            .unwrap_or(false);
        self.mark_if(moved)
    }

    /// The pointer left the highlighted option.
    pub fn hover_leave(&self) -> EventResult {
        let moved = self
            .mutate(|inner, _| inner.coord.is_open() && inner.coord.hover_leave())
            .unwrap_or(false);
        self.mark_if(moved)
    }

    /// The pointer moved over the list; hover tracking resumes.
    pub fn mouse_moved(&self) {
        self.mutate(|inner, _| inner.coord.mouse_moved());
    }

    /// The option popup scrolled.
    pub fn popup_scrolled(&self, metrics: ScrollMetrics) {
        self.mutate(|_, events| events.push(SelectEvent::PopupScroll(metrics)));
    }

    fn mark_if(&self, changed: bool) -> EventResult {
        if changed {
            self.dirty.store(true, std::sync::atomic::Ordering::SeqCst);
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}

/// Backspace on an empty search box removes the last enabled selection.
fn remove_last(inner: &mut SelectInner, events: &mut Vec<SelectEvent>) -> EventResult {
    if !inner.config.mode.is_multiple() || !inner.coord.text().is_empty() {
        return EventResult::Ignored;
    }
    let index = inner.index();
    let last = inner
        .store
        .current()
        .as_slice()
        .iter()
        .rev()
        .find(|v| !inner.store.lookup(v, &index).is_some_and(|info| info.is_disabled()))
        .cloned();
    let Some(value) = last else {
        return EventResult::Ignored;
    };
    match inner.uncheck(&value, events) {
        Ok(true) => EventResult::Consumed,
        _ => EventResult::Ignored,
    }
}
