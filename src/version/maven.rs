//! Maven item lists
//!
//! A Maven version is a list of items. `.` separates items inside the
//! current list, while `-`, `_` and digit/letter transitions open a nested
//! list. A nested list sorts below a number and above a qualifier, so
//! `1-1 < 1.1` and `31.1-jre < 31.1.1-jre`.

use std::cmp::Ordering;

/// Known qualifiers from lowest to highest; `""` is the release itself
const QUALIFIERS: &[&str] = &["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// One item of a Maven version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Item {
    Int(u64),
    /// Canonical qualifier text, empty for `ga`, `final` and `release`
    Qualifier(String),
    List(Vec<Item>),
}

impl Item {
    fn qualifier(text: &str, followed_by_digit: bool) -> Self {
        let text = match (text, followed_by_digit) {
            ("a", true) => "alpha",
            ("b", true) => "beta",
            ("m", true) => "milestone",
            ("ga" | "final" | "release", _) => "",
            ("cr", _) => "rc",
            (other, _) => other,
        };
        Item::Qualifier(text.to_string())
    }

    fn parse(text: &str, digit: bool) -> Option<Self> {
        if digit {
            text.parse().ok().map(Item::Int)
        } else {
            Some(Item::qualifier(text, false))
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(n) => *n == 0,
            Item::Qualifier(q) => q.is_empty(),
            Item::List(items) => items.is_empty(),
        }
    }
}

/// Parse lowercase version text into a normalized item list
pub(crate) fn parse(text: &str) -> Option<Vec<Item>> {
    let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
    let mut start = 0;
    let mut digit = false;

    for (i, c) in text.char_indices() {
        match c {
            '.' | '-' | '_' => {
                let item = if i == start {
                    Item::Int(0)
                } else {
                    Item::parse(&text[start..i], digit)?
                };
                stack.last_mut()?.push(item);
                start = i + 1;
                if c != '.' {
                    stack.push(Vec::new());
                }
            }
            c if c.is_ascii_digit() => {
                if !digit && i > start {
                    stack.last_mut()?.push(Item::qualifier(&text[start..i], true));
                    start = i;
                    stack.push(Vec::new());
                }
                digit = true;
            }
            _ => {
                if digit && i > start {
                    stack.last_mut()?.push(Item::parse(&text[start..i], true)?);
                    start = i;
                    stack.push(Vec::new());
                }
                digit = false;
            }
        }
    }
    if text.len() > start {
        stack.last_mut()?.push(Item::parse(&text[start..], digit)?);
    }

    let mut list = stack.pop()?;
    while let Some(mut parent) = stack.pop() {
        normalize(&mut list);
        if let [Item::List(_)] = list.as_slice() {
            if let Some(Item::List(inner)) = list.pop() {
                list = inner;
            }
        }
        parent.push(Item::List(list));
        list = parent;
    }
    normalize(&mut list);
    Some(list)
}

/// Drop trailing null items, looking through trailing sublists
fn normalize(list: &mut Vec<Item>) {
    let mut i = list.len();
    while i > 0 {
        i -= 1;
        if list[i].is_null() {
            list.remove(i);
        } else if !matches!(list[i], Item::List(_)) {
            break;
        }
    }
}

fn qualifier_key(q: &str) -> (usize, &str) {
    match QUALIFIERS.iter().position(|known| *known == q) {
        Some(i) => (i, ""),
        None => (QUALIFIERS.len(), q),
    }
}

/// Compare an item with another item or with padding
fn compare(item: &Item, other: Option<&Item>) -> Ordering {
    match (item, other) {
        (Item::Int(n), None) => n.cmp(&0),
        (Item::Int(a), Some(Item::Int(b))) => a.cmp(b),
        (Item::Int(_), Some(_)) => Ordering::Greater,
        (Item::Qualifier(q), None) => qualifier_key(q).cmp(&qualifier_key("")),
        (Item::Qualifier(a), Some(Item::Qualifier(b))) => qualifier_key(a).cmp(&qualifier_key(b)),
        (Item::Qualifier(_), Some(_)) => Ordering::Less,
        (Item::List(items), None) => items
            .iter()
            .map(|i| compare(i, None))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal),
        (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
        (Item::List(_), Some(Item::Qualifier(_))) => Ordering::Greater,
        (Item::List(a), Some(Item::List(b))) => compare_lists(a, b),
    }
}

pub(crate) fn compare_lists(a: &[Item], b: &[Item]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(left), right) => compare(left, right),
            (None, Some(right)) => compare(right, None).reverse(),
            (None, None) => Ordering::Equal,
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}
