//! In-memory integration tests for scheduler hooks.

use super::helpers::{TestService, create_root, create_roots, project, service};
use chrono::{NaiveDate, Utc};
use eyre::Result;
use rstest::rstest;
use taskweave::task::{
    domain::{ProjectId, Task, TaskStatus, UserId},
    services::ScheduleUpdate,
};

#[rstest]
fn scheduling_order_puts_prerequisites_first(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let ids = create_roots(&service, project, 4)?;
    let mut chain = ids.clone();
    chain.reverse();
    for pair in chain.windows(2) {
        if let [later, earlier] = pair {
            service.add_prerequisite(*earlier, *later)?;
        }
    }

    assert_eq!(service.scheduling_order()?, ids.into_iter().rev().collect::<Vec<_>>());
    Ok(())
}

#[rstest]
fn schedule_inputs_reflect_the_task(service: TestService, project: ProjectId) -> Result<()> {
    let due = NaiveDate::from_ymd_opt(2024, 9, 30).ok_or_else(|| eyre::eyre!("valid date"))?;
    let mut draft = Task::new(project).with_hours_estimate(3.0)?;
    draft.set_status(TaskStatus::InProcess);
    draft.schedule_mut().set_buffers(1, 2);
    draft.schedule_mut().set_due_date(Some(due));
    let task = service.create_task(draft)?;
    let before = create_root(&service, project)?;
    service.add_prerequisite(task.id(), before)?;

    let inputs = service.schedule_inputs(task.id())?;

    assert_eq!(inputs.task_id, task.id());
    assert_eq!(inputs.status, TaskStatus::InProcess);
    assert_eq!(inputs.prerequisites, vec![before]);
    assert_eq!((inputs.buffer_before, inputs.buffer_after), (1, 2));
    assert_eq!(inputs.due_date, Some(due));
    assert!((inputs.hours_estimate - 3.0).abs() < f64::EPSILON);
    assert!(inputs.auto_schedule && inputs.auto_assign);
    Ok(())
}

#[rstest]
fn recorded_schedule_is_persisted(service: TestService, project: ProjectId) -> Result<()> {
    let task = create_root(&service, project)?;
    let user = UserId::new();
    let start = Utc::now();

    service.record_schedule(
        task,
        &ScheduleUpdate::new(start)
            .with_assignee(user)
            .with_dependent_hours(12.0),
    )?;
    let inputs = service.schedule_inputs(task)?;

    assert_eq!(inputs.schedule_datetime, Some(start));
    assert_eq!(inputs.assigned_to, Some(user));
    assert!((inputs.dependent_hours - 12.0).abs() < f64::EPSILON);
    Ok(())
}

#[rstest]
fn non_finite_scheduler_hours_are_rejected(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let task = create_root(&service, project)?;

    let result = service.record_schedule(
        task,
        &ScheduleUpdate::new(Utc::now()).with_risk_hours(f64::NAN),
    );

    assert!(result.is_err());
    assert_eq!(service.schedule_inputs(task)?.schedule_datetime, None);
    Ok(())
}
