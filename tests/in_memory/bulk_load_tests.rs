//! In-memory integration tests for unvalidated loads and audits.

use super::helpers::{TestService, project, service, stored};
use eyre::Result;
use rstest::rstest;
use taskweave::task::{
    domain::{ProjectId, Task, TaskId, TimeEntry},
    integrity::IntegrityError,
    ports::TaskGraphStoreError,
    services::{BulkLoadSummary, GraphBatch, TaskGraphServiceError},
};

#[rstest]
fn parents_may_appear_after_their_children(service: TestService, project: ProjectId) -> Result<()> {
    let parent = Task::new(project);
    let child = Task::new(project).with_parent(parent.id());
    let batch = GraphBatch::new()
        .with_task(child.clone())
        .with_task(parent.clone())
        .with_time_entry(TimeEntry::new(child.id()));

    let summary = service.bulk_load_unvalidated(batch)?;

    assert_eq!(
        summary,
        BulkLoadSummary {
            tasks: 2,
            prerequisites: 0,
            time_entries: 1,
        }
    );
    assert_eq!(stored(&service, child.id())?.parent(), Some(parent.id()));
    assert_eq!(service.children_of(parent.id())?, vec![child.id()]);
    assert!(service.audit()?.is_empty());
    Ok(())
}

#[rstest]
fn cyclic_fixture_loads_and_is_reported(service: TestService, project: ProjectId) -> Result<()> {
    let first = Task::new(project);
    let second = Task::new(project).with_parent(first.id());
    let mut looped_first = first.clone();
    looped_first.set_parent(Some(second.id()));
    let batch = GraphBatch::new()
        .with_task(looped_first)
        .with_task(second.clone())
        .with_prerequisite(first.id(), second.id())
        .with_prerequisite(second.id(), first.id());

    service.bulk_load_unvalidated(batch)?;
    let violations = service.audit()?;

    assert!(violations.contains(&IntegrityError::ParentCycle {
        task_id: second.id()
    }));
    assert!(violations.contains(&IntegrityError::ParentCycle {
        task_id: first.id()
    }));
    assert!(violations.iter().any(|violation| matches!(
        violation,
        IntegrityError::PrerequisiteCycle { .. }
    )));
    assert!(matches!(
        service.scheduling_order(),
        Err(TaskGraphServiceError::Integrity(IntegrityError::PrerequisiteCycle { .. }))
    ));
    Ok(())
}

#[rstest]
fn dangling_reference_rejects_the_whole_batch(
    service: TestService,
    project: ProjectId,
) -> Result<()> {
    let task = Task::new(project);
    let missing = TaskId::new();
    let batch = GraphBatch::new()
        .with_task(task.clone())
        .with_prerequisite(task.id(), missing);

    let result = service.bulk_load_unvalidated(batch);

    assert!(matches!(
        result,
        Err(TaskGraphServiceError::Store(TaskGraphStoreError::TaskNotFound(id))) if id == missing
    ));
    assert_eq!(service.find_task(task.id())?, None);
    Ok(())
}

#[rstest]
fn batch_parses_from_a_json_fixture(service: TestService) -> Result<()> {
    let document = r#"{
        "tasks": [
            {
                "id": "8f14e45f-ceea-4e7a-9c3b-0a1b2c3d4e01",
                "project": "5a105e8b-9d40-4132-9b8a-0a1b2c3d4e02",
                "name": "Ship release",
                "status": "IN_PROCESS"
            },
            {
                "id": "8f14e45f-ceea-4e7a-9c3b-0a1b2c3d4e03",
                "project": "5a105e8b-9d40-4132-9b8a-0a1b2c3d4e02",
                "name": "Write changelog",
                "parent": "8f14e45f-ceea-4e7a-9c3b-0a1b2c3d4e01",
                "hours_estimate": 1.5,
                "schedule": { "buffer_after": 2, "auto_assign": false }
            }
        ],
        "prerequisites": [],
        "time_entries": [
            {
                "id": "1679091c-5a88-4faf-8fb4-0a1b2c3d4e04",
                "task": "8f14e45f-ceea-4e7a-9c3b-0a1b2c3d4e03",
                "start_time": "2024-05-01T09:00:00Z",
                "end_time": "2024-05-01T10:30:00Z"
            }
        ]
    }"#;

    let batch = GraphBatch::from_json(document)?;
    let summary = service.bulk_load_unvalidated(batch)?;
    let changelog_id: TaskId = serde_json::from_str("\"8f14e45f-ceea-4e7a-9c3b-0a1b2c3d4e03\"")?;
    let changelog = stored(&service, changelog_id)?;

    assert_eq!(summary.tasks, 2);
    assert_eq!(summary.time_entries, 1);
    assert_eq!(changelog.name(), "Write changelog");
    assert_eq!(changelog.schedule().buffer_after(), 2);
    assert!(!changelog.schedule().auto_assign());
    assert!(changelog.schedule().auto_schedule());
    assert!(service.audit()?.is_empty());
    Ok(())
}

#[rstest]
fn malformed_json_is_rejected() {
    assert!(GraphBatch::from_json(r#"{ "tasks": [ { "name": "no id" } ] }"#).is_err());
}

#[rstest]
#[case::negative_estimate(r#""hours_estimate": -4.0"#)]
#[case::negative_buffer(r#""schedule": { "buffer_before": -1 }"#)]
fn negative_hours_in_json_are_rejected(#[case] field: &str) {
    let document = format!(
        r#"{{ "tasks": [ {{
            "id": "8f14e45f-ceea-4e7a-9c3b-0a1b2c3d4e05",
            "project": "5a105e8b-9d40-4132-9b8a-0a1b2c3d4e02",
            {field}
        }} ] }}"#
    );

    assert!(GraphBatch::from_json(&document).is_err());
}
