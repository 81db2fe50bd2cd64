use super::common::at;
use crate::workflows::admission::domain::{Application, ApplicationId, ApplicationStatus, UserId};
use crate::workflows::admission::lifecycle::{
    allowed_actions, blocked_actions, mark_approved, mark_rejected, mark_submitted,
    mark_under_review, ApplicationAction, ApplicationStage, LifecycleError,
};

fn application(status: ApplicationStatus) -> Application {
    let draft = Application::create_draft(ApplicationId(1), UserId(1), at(0));
    draft.with_status(status, at(0))
}

#[test]
fn stages_group_statuses() {
    assert_eq!(
        ApplicationStage::from_status(ApplicationStatus::Draft),
        ApplicationStage::Drafting
    );
    assert_eq!(
        ApplicationStage::from_status(ApplicationStatus::Submitted),
        ApplicationStage::Submission
    );
    assert_eq!(
        ApplicationStage::from_status(ApplicationStatus::UnderReview),
        ApplicationStage::Reviewing
    );
    assert_eq!(
        ApplicationStage::from_status(ApplicationStatus::Approved),
        ApplicationStage::Finalized
    );
    assert_eq!(
        ApplicationStage::from_status(ApplicationStatus::Rejected),
        ApplicationStage::Finalized
    );
}

#[test]
fn drafting_allows_material_edits_and_submission() {
    let stage = ApplicationStage::Drafting;
    assert!(stage.allows(ApplicationAction::AddMaterial));
    assert!(stage.allows(ApplicationAction::RemoveMaterial));
    assert!(stage.allows(ApplicationAction::SubmitApplication));
    assert!(!stage.allows(ApplicationAction::CreateReview));
}

#[test]
fn materials_freeze_after_submission() {
    for stage in [ApplicationStage::Submission, ApplicationStage::Reviewing] {
        assert!(!stage.allows(ApplicationAction::AddMaterial));
        assert!(!stage.allows(ApplicationAction::RemoveMaterial));
        assert!(stage.allows(ApplicationAction::CreateReview));
        assert!(stage.allows(ApplicationAction::ViewResult));

        let reasons: Vec<&str> = blocked_actions(stage)
            .iter()
            .map(|blocked| blocked.reason)
            .collect();
        assert!(reasons.contains(&"MATERIAL_FROZEN_AFTER_SUBMISSION"));
    }
}

#[test]
fn finalized_only_allows_viewing() {
    let stage = ApplicationStage::Finalized;
    assert_eq!(allowed_actions(stage), &[ApplicationAction::ViewResult]);
    assert!(blocked_actions(stage)
        .iter()
        .all(|blocked| blocked.reason == "APPLICATION_FINALIZED"));
}

#[test]
fn drafting_blocks_review_with_specific_reasons() {
    let blocked = blocked_actions(ApplicationStage::Drafting);
    let review = blocked
        .iter()
        .find(|item| item.action == ApplicationAction::CreateReview)
        .expect("review is blocked while drafting");
    assert_eq!(review.reason, "APPLICATION_NOT_SUBMITTED");

    let view = blocked
        .iter()
        .find(|item| item.action == ApplicationAction::ViewResult)
        .expect("result view is blocked while drafting");
    assert_eq!(view.reason, "NO_REVIEW_YET");
}

#[test]
fn submit_moves_draft_forward() {
    let submitted = mark_submitted(application(ApplicationStatus::Draft), at(10))
        .expect("draft submits");
    assert_eq!(submitted.status, ApplicationStatus::Submitted);
    assert_eq!(submitted.updated_at, at(10));
}

#[test]
fn submit_rejects_non_draft_states() {
    for status in [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ] {
        match mark_submitted(application(status), at(0)) {
            Err(LifecycleError::InvalidTransition { from, .. }) => assert_eq!(from, status),
            Ok(_) => panic!("submit must fail from {status}"),
        }
    }
}

#[test]
fn review_starts_only_from_submitted() {
    let reviewing = mark_under_review(application(ApplicationStatus::Submitted), at(10))
        .expect("review starts");
    assert_eq!(reviewing.status, ApplicationStatus::UnderReview);

    assert!(mark_under_review(application(ApplicationStatus::Draft), at(0)).is_err());
    assert!(mark_under_review(application(ApplicationStatus::Approved), at(0)).is_err());
}

#[test]
fn terminal_transitions_require_under_review() {
    assert_eq!(
        mark_approved(application(ApplicationStatus::UnderReview), at(10))
            .expect("approval from review")
            .status,
        ApplicationStatus::Approved
    );
    assert_eq!(
        mark_rejected(application(ApplicationStatus::UnderReview), at(10))
            .expect("rejection from review")
            .status,
        ApplicationStatus::Rejected
    );

    assert!(mark_approved(application(ApplicationStatus::Submitted), at(0)).is_err());
    assert!(mark_rejected(application(ApplicationStatus::Approved), at(0)).is_err());
}
