//! In-memory integration tests for prerequisite edges.

use super::helpers::{TestService, create_roots, project, service};
use eyre::{Result, eyre};
use rstest::rstest;
use taskweave::task::{
    domain::{ProjectId, TaskId},
    integrity::IntegrityError,
    services::TaskGraphServiceError,
};

fn seven(service: &TestService, project: ProjectId) -> Result<[TaskId; 7]> {
    let ids = create_roots(service, project, 7)?;
    ids.try_into()
        .map_err(|_| eyre!("expected exactly seven tasks"))
}

fn is_prerequisite_cycle<T>(result: &Result<T, TaskGraphServiceError>) -> bool {
    matches!(
        result,
        Err(TaskGraphServiceError::Integrity(IntegrityError::PrerequisiteCycle { .. }))
    )
}

#[rstest]
fn merged_chains_accept_edges_until_one_closes_a_cycle(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let [task1, task2, task3, task4, task5, task6, task7] = seven(&service, project)?;
    service.add_prerequisite(task2, task1)?;
    service.add_prerequisite(task3, task2)?;
    service.add_prerequisite(task5, task4)?;
    service.add_prerequisite(task6, task5)?;
    assert_eq!(service.add_prerequisites(task7, [task3, task6])?, 2);

    let closing = service.add_prerequisite(task1, task2);

    assert!(is_prerequisite_cycle(&closing));
    assert!(service.prerequisites_of(task1)?.is_empty());
    assert_eq!(service.scheduling_order()?.len(), 7);
    Ok(())
}

#[rstest]
fn self_dependency_is_rejected(service: TestService, project: ProjectId) -> Result<()> {
    let [task]: [TaskId; 1] = create_roots(&service, project, 1)?
        .try_into()
        .map_err(|_| eyre!("expected one task"))?;

    let result = service.add_prerequisite(task, task);

    assert!(matches!(
        result,
        Err(TaskGraphServiceError::Integrity(IntegrityError::PrerequisiteCycle { task_id })) if task_id == task
    ));
    Ok(())
}

#[rstest]
fn every_member_of_a_triangle_rejects_the_closing_edge(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let [task1, task2, task3, ..] = seven(&service, project)?;
    service.add_prerequisite(task2, task1)?;
    service.add_prerequisite(task3, task2)?;

    assert!(is_prerequisite_cycle(&service.add_prerequisite(task1, task3)));
    assert!(is_prerequisite_cycle(&service.add_prerequisite(task1, task2)));
    assert!(service.audit()?.is_empty());
    Ok(())
}

#[rstest]
fn diamond_edges_are_accepted(service: TestService, project: ProjectId) -> Result<()> {
    let [task1, task2, task3, task4, ..] = seven(&service, project)?;

    service.add_prerequisite(task2, task1)?;
    service.add_prerequisite(task3, task1)?;
    service.add_prerequisites(task4, [task2, task3])?;

    let mut dependents = service.dependents_of(task1)?;
    dependents.sort_unstable();
    let mut expected = vec![task2, task3];
    expected.sort_unstable();
    assert_eq!(dependents, expected);
    Ok(())
}

#[rstest]
fn removing_an_edge_allows_the_reverse_edge(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let [task1, task2, ..] = seven(&service, project)?;
    service.add_prerequisite(task2, task1)?;

    assert!(service.remove_prerequisite(task2, task1)?);
    assert!(!service.remove_prerequisite(task2, task1)?);
    assert!(service.add_prerequisite(task1, task2)?);
    Ok(())
}

#[rstest]
fn edges_are_independent_of_parent_links(service: TestService, project: ProjectId) -> Result<()> {
    let [parent, child, ..] = seven(&service, project)?;
    service.set_parent(child, Some(parent))?;

    assert!(service.add_prerequisite(parent, child)?);
    assert!(service.audit()?.is_empty());
    Ok(())
}
