//! Reconciliation of submitted vacation sets against stored rows.
//!
//! A client submits the complete desired set of vacations. Each submitted item
//! either carries the id of an existing vacation (update or keep) or no id
//! (insert). Existing vacations missing from the submission are deleted.

use std::collections::{HashMap, HashSet};

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day of the range.
    pub start_date: Date,
    /// Last day of the range, inclusive.
    pub end_date: Date,
}

impl DateRange {
    /// Creates a new range without checking its ordering.
    #[inline]
    pub const fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Returns whether the range starts on or before its end.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start_date <= self.end_date
    }
}

/// A vacation as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedVacation {
    /// Identifier of an existing vacation, or `None` to create one.
    pub id: Option<Uuid>,
    /// Requested range.
    pub range: DateRange,
}

impl SubmittedVacation {
    /// Creates a new submitted vacation.
    pub fn new(id: Option<Uuid>, range: DateRange) -> Self {
        Self { id, range }
    }
}

/// Rejection of a vacation or exclusion submission.
///
/// Every variant carries the zero-based index of the offending item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VacationSyncError {
    #[error("Vacation at index {index} starts on {start_date}, after its end {end_date}")]
    InvalidRange {
        index: usize,
        start_date: Date,
        end_date: Date,
    },

    #[error("Vacation at index {index} repeats the range {start_date}..{end_date}")]
    DuplicateRange {
        index: usize,
        start_date: Date,
        end_date: Date,
    },

    #[error("Item at index {index} repeats the id {id}")]
    DuplicateId { index: usize, id: Uuid },

    #[error("Item at index {index} refers to {id}, which is not part of this set")]
    UnknownId { index: usize, id: Uuid },
}

impl VacationSyncError {
    /// Returns the index of the offending item.
    pub fn index(&self) -> usize {
        match self {
            VacationSyncError::InvalidRange { index, .. }
            | VacationSyncError::DuplicateRange { index, .. }
            | VacationSyncError::DuplicateId { index, .. }
            | VacationSyncError::UnknownId { index, .. } => *index,
        }
    }
}

/// Writes required to turn the stored vacation set into the submitted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacationSyncPlan {
    /// Ranges to insert as new rows.
    pub inserts: Vec<DateRange>,
    /// Existing rows whose range changed.
    pub updates: Vec<(Uuid, DateRange)>,
    /// Existing rows absent from the submission.
    pub deletes: Vec<Uuid>,
}

impl VacationSyncPlan {
    /// Reconciles `submitted` against the `existing` rows.
    ///
    /// Items are checked in order and the first failure is returned. Per item,
    /// range ordering is checked first, then duplicate ranges, then duplicate
    /// ids, then membership of the id in `existing`.
    pub fn reconcile(
        existing: &[(Uuid, DateRange)],
        submitted: &[SubmittedVacation],
    ) -> Result<Self, VacationSyncError> {
        let stored: HashMap<Uuid, DateRange> = existing.iter().copied().collect();
        let mut seen_ranges = HashSet::with_capacity(submitted.len());
        let mut seen_ids = HashSet::with_capacity(submitted.len());
        let mut plan = Self::default();

        for (index, item) in submitted.iter().enumerate() {
            let DateRange {
                start_date,
                end_date,
            } = item.range;

            if !item.range.is_valid() {
                return Err(VacationSyncError::InvalidRange {
                    index,
                    start_date,
                    end_date,
                });
            }

            if !seen_ranges.insert(item.range) {
                return Err(VacationSyncError::DuplicateRange {
                    index,
                    start_date,
                    end_date,
                });
            }

            let Some(id) = item.id else {
                plan.inserts.push(item.range);
                continue;
            };

            if !seen_ids.insert(id) {
                return Err(VacationSyncError::DuplicateId { index, id });
            }

            match stored.get(&id) {
                None => return Err(VacationSyncError::UnknownId { index, id }),
                Some(range) if *range != item.range => plan.updates.push((id, item.range)),
                Some(_) => {}
            }
        }

        plan.deletes = existing
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !seen_ids.contains(id))
            .collect();

        Ok(plan)
    }

    /// Returns whether applying the plan would change nothing.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Writes required to turn the stored exclusion set into the submitted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSyncPlan {
    /// Institution vacation ids to exclude.
    pub inserts: Vec<Uuid>,
    /// Institution vacation ids no longer excluded.
    pub deletes: Vec<Uuid>,
}

impl ExclusionSyncPlan {
    /// Reconciles submitted exclusions using set semantics.
    ///
    /// `available` holds the ids of the institution's non-deleted vacations;
    /// every submitted id must be one of them.
    pub fn reconcile(
        existing: &[Uuid],
        submitted: &[Uuid],
        available: &HashSet<Uuid>,
    ) -> Result<Self, VacationSyncError> {
        let current: HashSet<Uuid> = existing.iter().copied().collect();
        let mut seen = HashSet::with_capacity(submitted.len());
        let mut plan = Self::default();

        for (index, id) in submitted.iter().copied().enumerate() {
            if !seen.insert(id) {
                return Err(VacationSyncError::DuplicateId { index, id });
            }
            if !available.contains(&id) {
                return Err(VacationSyncError::UnknownId { index, id });
            }
            if !current.contains(&id) {
                plan.inserts.push(id);
            }
        }

        plan.deletes = existing
            .iter()
            .copied()
            .filter(|id| !seen.contains(id))
            .collect();

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn range(start: (i16, i8, i8), end: (i16, i8, i8)) -> DateRange {
        DateRange::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2))
    }

    #[test]
    fn single_day_range_is_valid() {
        assert!(range((2024, 1, 1), (2024, 1, 1)).is_valid());
        assert!(!range((2024, 1, 2), (2024, 1, 1)).is_valid());
    }

    #[test]
    fn plan_splits_inserts_updates_and_deletes() {
        let kept = Uuid::new_v4();
        let moved = Uuid::new_v4();
        let dropped = Uuid::new_v4();
        let existing = vec![
            (kept, range((2024, 7, 1), (2024, 7, 14))),
            (moved, range((2024, 8, 1), (2024, 8, 7))),
            (dropped, range((2024, 12, 20), (2024, 12, 31))),
        ];
        let submitted = vec![
            SubmittedVacation::new(Some(kept), range((2024, 7, 1), (2024, 7, 14))),
            SubmittedVacation::new(Some(moved), range((2024, 8, 5), (2024, 8, 12))),
            SubmittedVacation::new(None, range((2024, 10, 1), (2024, 10, 3))),
        ];

        let plan = VacationSyncPlan::reconcile(&existing, &submitted).unwrap();
        assert_eq!(plan.inserts, vec![range((2024, 10, 1), (2024, 10, 3))]);
        assert_eq!(plan.updates, vec![(moved, range((2024, 8, 5), (2024, 8, 12)))]);
        assert_eq!(plan.deletes, vec![dropped]);
    }

    #[test]
    fn empty_submission_deletes_everything() {
        let id = Uuid::new_v4();
        let existing = vec![(id, range((2024, 7, 1), (2024, 7, 2)))];
        let plan = VacationSyncPlan::reconcile(&existing, &[]).unwrap();
        assert_eq!(plan.deletes, vec![id]);
        assert!(plan.inserts.is_empty());
    }

    #[test]
    fn invalid_range_reports_index() {
        let submitted = vec![
            SubmittedVacation::new(None, range((2024, 7, 1), (2024, 7, 2))),
            SubmittedVacation::new(None, range((2024, 7, 5), (2024, 7, 4))),
        ];
        let error = VacationSyncPlan::reconcile(&[], &submitted).unwrap_err();
        assert!(matches!(error, VacationSyncError::InvalidRange { index: 1, .. }));
    }

    #[test]
    fn invalid_range_wins_over_duplicates() {
        let bad = range((2024, 7, 5), (2024, 7, 4));
        let submitted = vec![
            SubmittedVacation::new(None, bad),
            SubmittedVacation::new(None, bad),
        ];
        let error = VacationSyncPlan::reconcile(&[], &submitted).unwrap_err();
        assert_eq!(error.index(), 0);
        assert!(matches!(error, VacationSyncError::InvalidRange { .. }));
    }

    #[test]
    fn duplicate_range_and_id_are_rejected() {
        let same = range((2024, 7, 1), (2024, 7, 2));
        let submitted = vec![
            SubmittedVacation::new(None, same),
            SubmittedVacation::new(None, same),
        ];
        let error = VacationSyncPlan::reconcile(&[], &submitted).unwrap_err();
        assert!(matches!(error, VacationSyncError::DuplicateRange { index: 1, .. }));

        let id = Uuid::new_v4();
        let existing = vec![(id, same)];
        let submitted = vec![
            SubmittedVacation::new(Some(id), same),
            SubmittedVacation::new(Some(id), range((2024, 9, 1), (2024, 9, 2))),
        ];
        let error = VacationSyncPlan::reconcile(&existing, &submitted).unwrap_err();
        assert_eq!(error, VacationSyncError::DuplicateId { index: 1, id });
    }

    #[test]
    fn foreign_id_is_rejected() {
        let foreign = Uuid::new_v4();
        let submitted = vec![SubmittedVacation::new(
            Some(foreign),
            range((2024, 7, 1), (2024, 7, 2)),
        )];
        let error = VacationSyncPlan::reconcile(&[], &submitted).unwrap_err();
        assert_eq!(error, VacationSyncError::UnknownId { index: 0, id: foreign });
    }

    #[test]
    fn exclusions_use_set_semantics() {
        let kept = Uuid::new_v4();
        let added = Uuid::new_v4();
        let removed = Uuid::new_v4();
        let available: HashSet<Uuid> = [kept, added, removed].into_iter().collect();

        let plan = ExclusionSyncPlan::reconcile(&[kept, removed], &[kept, added], &available)
            .unwrap();
        assert_eq!(plan.inserts, vec![added]);
        assert_eq!(plan.deletes, vec![removed]);

        let stranger = Uuid::new_v4();
        let error = ExclusionSyncPlan::reconcile(&[], &[stranger], &available).unwrap_err();
        assert_eq!(error, VacationSyncError::UnknownId { index: 0, id: stranger });

        let error = ExclusionSyncPlan::reconcile(&[], &[kept, kept], &available).unwrap_err();
        assert_eq!(error, VacationSyncError::DuplicateId { index: 1, id: kept });
    }
}
