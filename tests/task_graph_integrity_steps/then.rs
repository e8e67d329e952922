//! Then steps for task graph integrity BDD scenarios.

use super::world::TaskGraphWorld;
use rstest_bdd_macros::then;
use taskweave::task::{integrity::IntegrityError, services::TaskGraphServiceError};

fn last_error(world: &TaskGraphWorld) -> Result<&TaskGraphServiceError, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(())) => Err(eyre::eyre!("expected the change to be rejected")),
        None => Err(eyre::eyre!("no change was attempted")),
    }
}

#[then("the change is accepted")]
fn change_accepted(world: &TaskGraphWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(())) => Ok(()),
        other => Err(eyre::eyre!("expected an accepted change, got {other:?}")),
    }
}

#[then("the change is rejected as a parent cycle")]
fn rejected_parent_cycle(world: &TaskGraphWorld) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    if !matches!(
        err,
        TaskGraphServiceError::Integrity(IntegrityError::ParentCycle { .. })
    ) {
        return Err(eyre::eyre!("expected ParentCycle, got {err:?}"));
    }
    Ok(())
}

#[then("the change is rejected as a prerequisite cycle")]
fn rejected_prerequisite_cycle(world: &TaskGraphWorld) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    if !matches!(
        err,
        TaskGraphServiceError::Integrity(IntegrityError::PrerequisiteCycle { .. })
    ) {
        return Err(eyre::eyre!("expected PrerequisiteCycle, got {err:?}"));
    }
    Ok(())
}

#[then("the change is rejected because the task is not a leaf")]
fn rejected_not_leaf(world: &TaskGraphWorld) -> Result<(), eyre::Report> {
    let err = last_error(world)?;
    if !matches!(
        err,
        TaskGraphServiceError::Integrity(
            IntegrityError::LeafOnlyEstimate { .. } | IntegrityError::LeafOnlyTimeEntry { .. }
        )
    ) {
        return Err(eyre::eyre!("expected a leaf-only violation, got {err:?}"));
    }
    Ok(())
}

#[then(r#"task "{task}" still has no parent"#)]
fn still_has_no_parent(world: &TaskGraphWorld, task: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&task)?;
    let stored = world
        .service
        .find_task(task_id)?
        .ok_or_else(|| eyre::eyre!("task {task} should be stored"))?;
    eyre::ensure!(
        stored.parent().is_none(),
        "expected {task} to have no parent, found {:?}",
        stored.parent()
    );
    Ok(())
}

#[then("the audit reports {count:usize} violations")]
fn audit_reports(world: &TaskGraphWorld, count: usize) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.violations.len() == count,
        "expected {count} violations, found {:?}",
        world.violations
    );
    Ok(())
}
