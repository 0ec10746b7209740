//! Option index: flattened entries plus value lookup.
//!
//! The index is a pure derivation of the declared options and the current
//! filter inputs. It is never patched in place; [`IndexCache`] rebuilds it
//! whenever its key changes.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::filter::{FilterOption, PreparedFilter};
use crate::option::{OptionDecl, OptionInfo, OptionKey, OptionOrigin, SelectOption};
use crate::value::Value;

/// One row of the flattened option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// Non-selectable group heading.
    GroupHeader { label: String },
    /// A selectable option. `position` indexes into [`OptionIndex::values`].
    Option {
        value: Value,
        key: OptionKey,
        disabled: bool,
        position: usize,
    },
}

/// Arrow-key direction for highlight navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Everything besides the declarations that shapes the index.
#[derive(Debug, Clone, Copy)]
pub struct IndexInput<'a> {
    /// Current search text.
    pub search: &'a str,
    /// Filter applied with `search`.
    pub filter: &'a FilterOption,
    /// Tags the user created earlier (tags mode).
    pub created: &'a [Value],
    /// Text of the tag being typed (tags mode), empty otherwise.
    pub creating: &'a str,
}

impl<'a> IndexInput<'a> {
    /// No search text, no tags.
    pub fn unfiltered(filter: &'a FilterOption) -> Self {
        Self {
            search: "",
            filter,
            created: &[],
            creating: "",
        }
    }
}

/// Lookup structure derived from the option declarations.
#[derive(Debug, Clone, Default)]
pub struct OptionIndex {
    entries: Vec<IndexEntry>,
    info: HashMap<Value, OptionInfo>,
    values: Vec<Value>,
    arrow: Vec<usize>,
    has_groups: bool,
}

impl OptionIndex {
    /// Flatten `decls` against `input`.
    ///
    /// Every declared option is entered in the value map, even when the
    /// filter hides it, so a selected value keeps its label while the user
    /// searches. On duplicate values the last declaration wins in the map;
    /// both still appear positionally.
    pub fn build(decls: &[OptionDecl], input: &IndexInput<'_>) -> Self {
        let mut index = Self::default();
        let mut filter = PreparedFilter::new(input.search, input.filter);

        let declared: HashSet<&Value> = decls
            .iter()
            .flat_map(|decl| match decl {
                OptionDecl::Option(o) => std::slice::from_ref(o).iter(),
                OptionDecl::Group { options, .. } => options.iter(),
            })
            .map(|o| &o.value)
            .collect();

        let creating = (!input.creating.is_empty()).then(|| Value::from(input.creating));
        if let Some(value) = creating.as_ref()
            && !declared.contains(value)
        {
            index.push(SelectOption::plain(value.clone()), OptionOrigin::Creating, true);
        }

        for value in input.created {
            if declared.contains(value) || creating.as_ref() == Some(value) {
                continue;
            }
            let option = SelectOption::plain(value.clone());
            let visible = filter.matches(&option);
            index.push(option, OptionOrigin::Created, visible);
        }

        for decl in decls {
            match decl {
                OptionDecl::Option(option) => {
                    let visible = filter.matches(option);
                    index.push(option.clone(), OptionOrigin::Declared, visible);
                }
                OptionDecl::Group { label, options } => {
                    index.has_groups = true;
                    let mut header_pushed = false;
                    for option in options {
                        let mut option = option.clone();
                        option.group = Some(label.clone());
                        let visible = filter.matches(&option);
                        if visible && !header_pushed {
                            index.entries.push(IndexEntry::GroupHeader {
                                label: label.clone(),
                            });
                            header_pushed = true;
                        }
                        index.push(option, OptionOrigin::Declared, visible);
                    }
                }
            }
        }

        index
    }

    fn push(&mut self, option: SelectOption, origin: OptionOrigin, visible: bool) {
        let key = OptionKey::for_value(&option.value);
        if visible {
            let position = self.values.len();
            self.values.push(option.value.clone());
            if !option.disabled {
                self.arrow.push(position);
            }
            self.entries.push(IndexEntry::Option {
                value: option.value.clone(),
                key: key.clone(),
                disabled: option.disabled,
                position,
            });
        }
        self.info.insert(
            option.value.clone(),
            OptionInfo {
                option,
                key,
                origin,
            },
        );
    }

    /// Resolved metadata for `value`.
    pub fn get(&self, value: &Value) -> Option<&OptionInfo> {
        self.info.get(value)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.info.contains_key(value)
    }

    /// Flattened rows in display order, group headers included.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Visible option values in display order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Positions in [`values`](Self::values) reachable with arrow keys.
    pub fn navigable_positions(&self) -> &[usize] {
        &self.arrow
    }

    pub fn has_groups(&self) -> bool {
        self.has_groups
    }

    /// Number of visible options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First value reachable with arrow keys.
    pub fn first_navigable(&self) -> Option<&Value> {
        self.arrow.first().and_then(|&pos| self.values.get(pos))
    }

    /// Step from `from` to the next navigable value, wrapping at either end.
    ///
    /// When `from` isn't navigable, `Down` lands on the first entry and `Up`
    /// on the last.
    pub fn next_navigable(&self, from: Option<&Value>, direction: Direction) -> Option<&Value> {
        if self.arrow.is_empty() {
            return None;
        }
        let len = self.arrow.len();
        let current = from.and_then(|v| {
            self.arrow
                .iter()
                .position(|&pos| self.values.get(pos) == Some(v))
        });
        let next = match (current, direction) {
            (Some(i), Direction::Down) => (i + 1) % len,
            (Some(i), Direction::Up) => (i + len - 1) % len,
            (None, Direction::Down) => 0,
            (None, Direction::Up) => len - 1,
        };
        self.values.get(self.arrow[next])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    version: u64,
    content: u64,
}

impl CacheKey {
    fn new(version: u64, decls: &[OptionDecl], input: &IndexInput<'_>) -> Self {
        let mut hasher = DefaultHasher::new();
        decls.hash(&mut hasher);
        input.search.hash(&mut hasher);
        input.filter.cache_tag().hash(&mut hasher);
        input.created.hash(&mut hasher);
        input.creating.hash(&mut hasher);
        Self {
            version,
            content: hasher.finish(),
        }
    }
}

/// Caches the last built index against an explicit key.
///
/// The key combines a version counter, which the owner bumps whenever the
/// declarations or filter predicate are replaced, with a content hash of
/// everything hashable that feeds the build.
#[derive(Debug, Default)]
pub struct IndexCache {
    key: Option<CacheKey>,
    index: Arc<OptionIndex>,
    builds: usize,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index, rebuilding it if the key changed.
    pub fn get_or_build(
        &mut self,
        version: u64,
        decls: &[OptionDecl],
        input: &IndexInput<'_>,
    ) -> Arc<OptionIndex> {
        let key = CacheKey::new(version, decls, input);
        if self.key != Some(key) {
            self.index = Arc::new(OptionIndex::build(decls, input));
            self.key = Some(key);
            self.builds += 1;
            log::debug!(
                "OptionIndex rebuilt version={} visible={} search={:?}",
                version,
                self.index.len(),
                input.search
            );
        }
        Arc::clone(&self.index)
    }

    /// How many times the index has been rebuilt.
    pub fn build_count(&self) -> usize {
        self.builds
    }
}
