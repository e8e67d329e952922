//! In-memory integration tests for leaf-only time logging.

use super::helpers::{TestService, create_child, create_root, project, service};
use chrono::{Duration, Utc};
use eyre::Result;
use rstest::rstest;
use taskweave::task::{
    domain::{ProjectId, TimeEntry},
    integrity::IntegrityError,
    services::TaskGraphServiceError,
};

#[rstest]
fn time_is_logged_on_the_leaf_not_its_parent(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let parent = create_root(&service, project)?;
    let leaf = create_child(&service, project, parent)?;

    let on_parent = TimeEntry::new(parent);
    let rejected_id = on_parent.id();
    let rejected = service.log_time(on_parent);
    let accepted = service.log_time(TimeEntry::new(leaf))?;

    assert!(matches!(
        rejected,
        Err(TaskGraphServiceError::Integrity(IntegrityError::LeafOnlyTimeEntry { task_id, .. })) if task_id == parent
    ));
    assert_eq!(service.find_time_entry(rejected_id)?, None);
    assert_eq!(service.time_entries_for(leaf)?, vec![accepted]);
    Ok(())
}

#[rstest]
fn moving_an_entry_to_a_parent_is_rejected(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let parent = create_root(&service, project)?;
    let leaf = create_child(&service, project, parent)?;
    let mut entry = service.log_time(TimeEntry::new(leaf))?;

    entry.reassign(parent);
    let result = service.update_time_entry(entry);

    assert!(matches!(
        result,
        Err(TaskGraphServiceError::Integrity(IntegrityError::LeafOnlyTimeEntry { .. }))
    ));
    assert_eq!(service.time_entries_for(leaf)?.len(), 1);
    Ok(())
}

#[rstest]
fn stale_entry_cannot_move_back_onto_a_task_that_gained_children(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let task = create_root(&service, project)?;
    let other = create_root(&service, project)?;
    let stale = service.log_time(TimeEntry::new(task))?;
    let mut moved = stale.clone();
    moved.reassign(other);
    service.update_time_entry(moved)?;
    create_child(&service, project, task)?;

    let result = service.update_time_entry(stale);

    assert!(matches!(
        result,
        Err(TaskGraphServiceError::Integrity(IntegrityError::LeafOnlyTimeEntry { task_id, .. })) if task_id == task
    ));
    assert_eq!(service.time_entries_for(other)?.len(), 1);
    assert!(service.time_entries_for(task)?.is_empty());
    assert!(service.audit()?.is_empty());
    Ok(())
}

#[rstest]
fn editing_times_on_an_entry_whose_task_gained_children_is_allowed(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let task = create_root(&service, project)?;
    let entry = service.log_time(TimeEntry::new(task))?;
    create_child(&service, project, task)?;

    let start = Utc::now();
    let edited = entry.with_span(start, start + Duration::hours(2))?;
    let saved = service.update_time_entry(edited)?;

    assert_eq!(saved.duration(), Some(Duration::hours(2)));
    assert_eq!(
        service.audit()?,
        vec![IntegrityError::LeafOnlyTimeEntry {
            entry_id: saved.id(),
            task_id: task,
        }]
    );
    Ok(())
}

#[rstest]
fn timer_cannot_start_on_a_parent(service: TestService, project: ProjectId) -> Result<()> {
    let parent = create_root(&service, project)?;
    create_child(&service, project, parent)?;

    let result = service.start_timer(parent, None);

    assert!(matches!(
        result,
        Err(TaskGraphServiceError::Integrity(IntegrityError::LeafOnlyTimeEntry { .. }))
    ));
    assert!(service.time_entries_for(parent)?.is_empty());
    Ok(())
}
