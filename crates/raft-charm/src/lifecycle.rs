//! Pure status transitions of the lifecycle controller.
//!
//! [`plan`] decides, from the current unit status and the delivered event
//! alone, which status to set first and which single side effect to run.
//! [`after_install`] decides the status that follows an install attempt.
//! Nothing here touches the runtime, so every transition can be checked
//! without one.

use crate::event::{CharmEvent, RelationId};
use crate::package::PackageError;
use crate::status::UnitStatus;

/// Maintenance message shown while the package is being installed.
pub const INSTALLING_MESSAGE: &str = "Installing Patroni Raft Controller";

/// Waiting message shown once the package is installed.
pub const WAITING_MESSAGE: &str = "Waiting for charm initialisation";

/// Blocked message shown when installing the package fails.
pub const INSTALL_FAILED_MESSAGE: &str = "Failed to install Patroni Raft Controller";

/// Key the controller publishes its bind address under.
pub const ADDRESS_KEY: &str = "address";

/// Single side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Install the controller package unless it is already present.
    EnsurePackage,
    /// Resolve the bind address and publish it into the relation databag.
    PublishAddress(RelationId),
    /// Report that the join was ignored because the unit is blocked.
    WarnBlocked(RelationId),
    /// Ask the dispatcher to redeliver the event later.
    Defer,
}

/// Outcome of planning one event against the current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status to set before running the effect, if it changes.
    pub status: Option<UnitStatus>,
    /// Effect to run.
    pub effect: Effect,
}

impl Transition {
    const fn new(status: Option<UnitStatus>, effect: Effect) -> Self {
        Self { status, effect }
    }

    fn unchanged(effect: Effect) -> Self {
        Self::new(None, effect)
    }
}

/// Plans the handling of `event` given the unit's current `status`.
#[must_use]
pub fn plan(status: &UnitStatus, event: &CharmEvent) -> Transition {
    match event {
        CharmEvent::Install => Transition::new(
            Some(UnitStatus::maintenance(INSTALLING_MESSAGE)),
            Effect::EnsurePackage,
        ),
        CharmEvent::Start if status.is_blocked() => Transition::unchanged(Effect::None),
        CharmEvent::Start => Transition::new(Some(UnitStatus::Active), Effect::None),
        CharmEvent::RelationJoined { relation } => match status {
            UnitStatus::Active => Transition::unchanged(Effect::PublishAddress(relation.clone())),
            UnitStatus::Blocked(_) => Transition::unchanged(Effect::WarnBlocked(relation.clone())),
            UnitStatus::Unknown
            | UnitStatus::Maintenance(_)
            | UnitStatus::Waiting(_)
            | UnitStatus::Error(_) => Transition::unchanged(Effect::Defer),
        },
    }
}

/// Status that follows an install attempt.
#[must_use]
pub fn after_install(result: &Result<(), PackageError>) -> UnitStatus {
    match result {
        Ok(()) => UnitStatus::waiting(WAITING_MESSAGE),
        Err(_) => UnitStatus::blocked(INSTALL_FAILED_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PEER_RELATION;
    use rstest::{fixture, rstest};

    #[fixture]
    fn relation() -> RelationId {
        RelationId::new(PEER_RELATION, 1)
    }

    #[rstest]
    #[case(UnitStatus::Unknown)]
    #[case(UnitStatus::Active)]
    #[case(UnitStatus::blocked(INSTALL_FAILED_MESSAGE))]
    fn install_always_enters_maintenance(#[case] status: UnitStatus) {
        let transition = plan(&status, &CharmEvent::Install);
        assert_eq!(
            transition.status,
            Some(UnitStatus::maintenance(INSTALLING_MESSAGE))
        );
        assert_eq!(transition.effect, Effect::EnsurePackage);
    }

    #[rstest]
    #[case(UnitStatus::Unknown)]
    #[case(UnitStatus::waiting(WAITING_MESSAGE))]
    #[case(UnitStatus::maintenance(INSTALLING_MESSAGE))]
    #[case(UnitStatus::Active)]
    fn start_activates_unblocked_units(#[case] status: UnitStatus) {
        let transition = plan(&status, &CharmEvent::Start);
        assert_eq!(transition.status, Some(UnitStatus::Active));
        assert_eq!(transition.effect, Effect::None);
    }

    #[test]
    fn start_leaves_blocked_units_blocked() {
        let transition = plan(
            &UnitStatus::blocked(INSTALL_FAILED_MESSAGE),
            &CharmEvent::Start,
        );
        assert_eq!(transition, Transition::unchanged(Effect::None));
    }

    #[rstest]
    fn relation_join_publishes_when_active(relation: RelationId) {
        let event = CharmEvent::relation_joined(relation.clone());
        let transition = plan(&UnitStatus::Active, &event);
        assert_eq!(transition, Transition::unchanged(Effect::PublishAddress(relation)));
    }

    #[rstest]
    fn relation_join_warns_when_blocked(relation: RelationId) {
        let event = CharmEvent::relation_joined(relation.clone());
        let transition = plan(&UnitStatus::blocked(INSTALL_FAILED_MESSAGE), &event);
        assert_eq!(transition, Transition::unchanged(Effect::WarnBlocked(relation)));
    }

    #[rstest]
    #[case(UnitStatus::Unknown)]
    #[case(UnitStatus::maintenance(INSTALLING_MESSAGE))]
    #[case(UnitStatus::waiting(WAITING_MESSAGE))]
    #[case(UnitStatus::Error("hook failed".to_owned()))]
    fn relation_join_defers_in_transient_states(relation: RelationId, #[case] status: UnitStatus) {
        let event = CharmEvent::relation_joined(relation);
        assert_eq!(plan(&status, &event), Transition::unchanged(Effect::Defer));
    }

    #[test]
    fn install_outcome_selects_follow_up_status() {
        assert_eq!(after_install(&Ok(())), UnitStatus::waiting(WAITING_MESSAGE));
        assert_eq!(
            after_install(&Err(PackageError::new("snap not found"))),
            UnitStatus::blocked(INSTALL_FAILED_MESSAGE)
        );
    }
}
