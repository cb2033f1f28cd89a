//! Reconciling a fresh remote snapshot with the aggregate cache.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::sorted_list::SortedList;
use crate::tracking::tracked_event::{TrackedEvent, by_start_time};

/// Merge-join `local` with `remote` into `out`, which is cleared first.
///
/// Both inputs must be sorted by [`by_start_time`], which makes this a single
/// linear pass with every output appended in order. Local events missing from
/// `remote` are kept only if their calendar is in `failed_calendars`. Events
/// present on both sides keep their local instance, and with it any snooze,
/// unless a displayed field changed.
pub fn merge_into(
    out: &mut SortedList<Arc<TrackedEvent>>,
    local: &SortedList<Arc<TrackedEvent>>,
    remote: &SortedList<Arc<TrackedEvent>>,
    failed_calendars: &HashSet<String>,
) {
    out.clear();

    let keep_stale =
        |tracked: &Arc<TrackedEvent>| failed_calendars.contains(&tracked.calendar().id);
    let mut l = 0;
    let mut r = 0;

    while let (Some(local_event), Some(remote_event)) = (local.get(l), remote.get(r)) {
        match by_start_time(local_event, remote_event) {
            Ordering::Greater => {
                out.push_sorted(Arc::clone(remote_event));
                r += 1;
            }
            Ordering::Less => {
                if keep_stale(local_event) {
                    out.push_sorted(Arc::clone(local_event));
                }
                l += 1;
            }
            Ordering::Equal => {
                let kept = if local_event.event().display_differs(remote_event.event()) {
                    remote_event
                } else {
                    local_event
                };
                out.push_sorted(Arc::clone(kept));
                l += 1;
                r += 1;
            }
        }
    }

    for local_event in &local.as_slice()[l..] {
        if keep_stale(local_event) {
            out.push_sorted(Arc::clone(local_event));
        }
    }
    for remote_event in &remote.as_slice()[r..] {
        out.push_sorted(Arc::clone(remote_event));
    }
}
