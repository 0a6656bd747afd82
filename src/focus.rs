//! Keyboard focus traversal.
//!
//! [`next_focus_index`] computes which control should receive focus after a
//! directional key press.  It only computes an index; moving the focus is
//! the caller's job.

/// A control that can appear in a focus ring.
pub trait Selectable {
    /// Stable identity of the control for the lifetime of its row.
    fn key(&self) -> &str;

    /// Whether the control takes part in keyboard focus traversal.
    fn is_focusable(&self) -> bool {
        true
    }
}

/// Index of the control to focus after moving `delta` steps from `focused`.
///
/// The current position is where `focused` sits in `items`, provided that
/// item is focusable.  An unknown, non-focusable or absent `focused` counts
/// as position `0`, so the first `+1` from "nothing" lands on the second
/// item.  Movement wraps around both ends for any `delta`.
///
/// Returns `None` only when `items` is empty.
pub fn next_focus_index<S: Selectable>(
    items: &[S],
    focused: Option<&str>,
    delta: i32,
) -> Option<usize> {
    if items.is_empty() {
        return None;
    }

    let current = focused
        .and_then(|key| {
            items
                .iter()
                .position(|item| item.key() == key && item.is_focusable())
        })
        .unwrap_or(0);

    let len = items.len() as i64;
    let next = (current as i64 + i64::from(delta)).rem_euclid(len);
    Some(next as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Item {
        key: String,
        focusable: bool,
    }

    impl Selectable for Item {
        fn key(&self) -> &str {
            &self.key
        }

        fn is_focusable(&self) -> bool {
            self.focusable
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                key: format!("app.{}", i),
                focusable: true,
            })
            .collect()
    }

    #[test]
    fn empty_list_is_noop() {
        let none: Vec<Item> = Vec::new();
        assert_eq!(next_focus_index(&none, None, 1), None);
        assert_eq!(next_focus_index(&none, Some("app.0"), -1), None);
    }

    #[test]
    fn nothing_focused_moves_from_first() {
        let list = items(4);
        assert_eq!(next_focus_index(&list, None, 1), Some(1));
        assert_eq!(next_focus_index(&list, None, -1), Some(3));
    }

    #[test]
    fn single_item_always_zero() {
        let list = items(1);
        for delta in [-7, -1, 0, 1, 42] {
            assert_eq!(next_focus_index(&list, Some("app.0"), delta), Some(0));
            assert_eq!(next_focus_index(&list, None, delta), Some(0));
        }
    }

    #[test]
    fn wraps_at_both_ends() {
        let list = items(3);
        assert_eq!(next_focus_index(&list, Some("app.2"), 1), Some(0));
        assert_eq!(next_focus_index(&list, Some("app.0"), -1), Some(2));
    }

    #[test]
    fn unknown_key_counts_as_first() {
        let list = items(3);
        assert_eq!(next_focus_index(&list, Some("settings"), 1), Some(1));
    }

    #[test]
    fn non_focusable_holder_counts_as_first() {
        let mut list = items(3);
        list[2].focusable = false;
        assert_eq!(next_focus_index(&list, Some("app.2"), 1), Some(1));
    }

    #[test]
    fn large_negative_delta_wraps() {
        let list = items(4);
        // (1 - 9) mod 4 = 0
        assert_eq!(next_focus_index(&list, Some("app.1"), -9), Some(0));
        assert_eq!(next_focus_index(&list, Some("app.0"), i32::MIN), Some(0));
    }

    proptest! {
        #[test]
        fn result_is_in_range(n in 1usize..40, start in 0usize..40, delta in any::<i32>()) {
            let list = items(n);
            let key = format!("app.{}", start % n);
            let idx = next_focus_index(&list, Some(&key), delta).unwrap();
            prop_assert!(idx < n);
        }

        #[test]
        fn n_steps_forward_return_home(n in 1usize..30, start in 0usize..30) {
            let list = items(n);
            let start = start % n;
            let mut idx = start;
            for _ in 0..n {
                idx = next_focus_index(&list, Some(list[idx].key()), 1).unwrap();
            }
            prop_assert_eq!(idx, start);
        }

        #[test]
        fn forward_then_back_is_identity(n in 1usize..30, i in 0usize..30) {
            let list = items(n);
            let i = i % n;
            let fwd = next_focus_index(&list, Some(list[i].key()), 1).unwrap();
            prop_assert_eq!(fwd, (i + 1) % n);
            let back = next_focus_index(&list, Some(list[fwd].key()), -1).unwrap();
            prop_assert_eq!(back, i);
        }
    }
}
