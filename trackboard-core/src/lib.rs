//! Trackboard Core - record types and view derivation
//!
//! Pure data and pure functions. No terminal or network IO lives here; the
//! TUI crate and test utilities both build on these types.

pub mod api;
pub mod dates;
pub mod entities;
pub mod enums;
pub mod error;
pub mod forms;
pub mod views;

pub use api::TrackerApi;
pub use dates::Timestamp;
pub use entities::{
    KpiSnapshot, Milestone, MilestoneId, MilestoneInput, Project, ProjectId, ProjectInput, Risk,
    RiskId, RiskInput,
};
pub use enums::{MilestoneStatus, ProjectStatus, RiskSeverity, RiskStatus, Tone};
pub use error::{ApiError, ApiResult, ValidationError};
pub use forms::{EditableForm, MilestoneForm, ProjectForm, RiskForm, Submission};
pub use views::{CompletionBand, Listing};

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn base() -> Timestamp {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn project(id: i64, status: ProjectStatus) -> Project {
        Project {
            id: ProjectId(id),
            name: format!("p{id}"),
            owner: "owner".into(),
            description: None,
            start_date: base(),
            deadline: base(),
            status,
            completion_percentage: 0.0,
            created_at: None,
            updated_at: None,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Bands partition 0..=100 at exactly 50 and 80.
        #[test]
        fn prop_band_thresholds(value in 0.0f64..=100.0) {
            let band = CompletionBand::from_percentage(value);
            let expected = if value >= 80.0 {
                CompletionBand::Good
            } else if value >= 50.0 {
                CompletionBand::Warning
            } else {
                CompletionBand::Risk
            };
            prop_assert_eq!(band, expected);
        }

        /// Once a due date is overdue it stays overdue as time moves on.
        #[test]
        fn prop_overdue_is_monotonic(due_offset in -1000i64..1000, later in 0i64..1000) {
            let due = base() + Duration::hours(due_offset);
            let now = base();
            let after = now + Duration::hours(later);
            if views::is_overdue(&due, false, &now) {
                prop_assert!(views::is_overdue(&due, false, &after));
            }
            prop_assert!(!views::is_overdue(&due, true, &after));
        }

        /// Unrecognised statuses are counted under NOT_STARTED, and only there.
        #[test]
        fn prop_unknown_status_groups_as_not_started(
            raws in prop::collection::vec(
                prop_oneof![
                    prop::sample::select(ProjectStatus::ALL.to_vec())
                        .prop_map(|status| status.as_wire_str().to_string()),
                    "[A-Z]{3,12}",
                ],
                1..30,
            )
        ) {
            let projects: Vec<_> = raws
                .iter()
                .enumerate()
                .map(|(i, raw)| project(i as i64, ProjectStatus::parse_or_default(raw)))
                .collect();
            let expected = raws
                .iter()
                .filter(|raw| {
                    !matches!(raw.parse::<ProjectStatus>(), Ok(status) if status != ProjectStatus::NotStarted)
                })
                .count();

            let slices = views::status_distribution(&projects);
            let not_started = slices
                .iter()
                .find(|slice| slice.status == ProjectStatus::NotStarted)
                .map_or(0, |slice| slice.count);
            prop_assert_eq!(not_started, expected);
            let total: usize = slices.iter().map(|slice| slice.count).sum();
            prop_assert_eq!(total, raws.len());
        }

        /// Slice shares always add up to the whole.
        #[test]
        fn prop_distribution_shares_sum_to_100(statuses in prop::collection::vec(0usize..6, 1..40)) {
            let projects: Vec<_> = statuses
                .iter()
                .enumerate()
                .map(|(i, idx)| project(i as i64, ProjectStatus::ALL[*idx]))
                .collect();
            let total: f64 = views::status_distribution(&projects).iter().map(|s| s.share).sum();
            prop_assert!((total - 100.0).abs() < 1e-6);
        }
    }
}
