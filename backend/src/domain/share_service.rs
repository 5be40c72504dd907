//! Share ledger: the state machine that moves a one-time appointment from
//! owned to shared to accepted/rejected/canceled.
//!
//! ## State machine
//!
//! pending -> accepted | rejected | canceled; accepted -> canceled (before the
//! walk). Accepted, rejected and canceled are otherwise terminal here -
//! completion is tracked on the appointment by the settlement service.
//!
//! ## Invariants
//!
//! - Recurring templates are never shareable; only their clones are.
//! - At most one active (pending or accepted) share per appointment. Every
//!   check-then-act sequence runs under the connection write lock, with the
//!   share repository's own uniqueness check as the storage-layer backstop.
//! - Accepting a share updates the share status and the appointment's
//!   delegation status as one locked unit, so a partially applied accept is
//!   never observable.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::share::{
    AcceptShareCommand, AcceptShareResult, CancelShareCommand, CancelShareResult,
    ListSharesCommand, ListSharesResult, ProposeShareCommand, ProposeShareResult,
    RejectShareCommand, RejectShareResult,
};
use crate::domain::models::appointment::DelegationStatus;
use crate::domain::models::share::{AppointmentShare, ShareError, ShareStatus};
use crate::storage::csv::{
    AppointmentRepository, ConnectionRepository, CsvConnection, ShareRepository,
};
use crate::storage::traits::{AppointmentStorage, ShareStorage, WalkerConnectionStorage};

/// Service implementing the appointment delegation state machine
#[derive(Clone)]
pub struct ShareService {
    connection: Arc<CsvConnection>,
    appointment_repository: AppointmentRepository,
    share_repository: ShareRepository,
    connection_repository: ConnectionRepository,
}

impl ShareService {
    /// Create a new ShareService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            appointment_repository: AppointmentRepository::new(csv_conn.clone()),
            share_repository: ShareRepository::new(csv_conn.clone()),
            connection_repository: ConnectionRepository::new(csv_conn.clone()),
            connection: csv_conn,
        }
    }

    /// Propose delegating an appointment to another walker.
    ///
    /// Creates the share in `pending`; the appointment itself is not touched
    /// until the receiver accepts.
    pub fn propose_share(
        &self,
        command: ProposeShareCommand,
    ) -> Result<ProposeShareResult, ShareError> {
        info!(
            "Proposing share of {} from {} to {} at {}%",
            command.appointment_id,
            command.sharing_user_id,
            command.receiving_user_id,
            command.covering_percentage
        );

        let _guard = self.connection.write_lock();

        let appointment = self
            .appointment_repository
            .get_appointment(&command.appointment_id)?
            .ok_or_else(|| ShareError::AppointmentNotFound(command.appointment_id.clone()))?;
        // a recurring target fails regardless of the split offered
        if appointment.recurring {
            warn!(
                "Rejecting share proposal against recurring template {}",
                appointment.id
            );
            return Err(ShareError::RecurringNotShareable);
        }
        if command.covering_percentage > 100 {
            return Err(ShareError::InvalidSplit(command.covering_percentage));
        }

        if !self
            .connection_repository
            .are_connected(&command.sharing_user_id, &command.receiving_user_id)?
        {
            return Err(ShareError::UsersNotConnected(
                command.sharing_user_id,
                command.receiving_user_id,
            ));
        }

        if self
            .share_repository
            .get_active_share_for_appointment(&appointment.id)?
            .is_some()
        {
            warn!("Appointment {} already has an active share", appointment.id);
            return Err(ShareError::AlreadyDelegated);
        }

        let now = Utc::now();
        let share = AppointmentShare {
            id: AppointmentShare::generate_id(now.timestamp_millis() as u64),
            appointment_id: appointment.id,
            sharing_user_id: command.sharing_user_id,
            receiving_user_id: command.receiving_user_id,
            covering_walker_percentage: command.covering_percentage,
            status: ShareStatus::Pending,
            recurring_share: command.recurring_share,
            created_at: now,
            updated_at: now,
        };
        self.share_repository.store_share(&share)?;

        info!("Created pending share: {}", share.id);
        Ok(ProposeShareResult { share })
    }

    /// Accept a pending share.
    ///
    /// Sets the share to `accepted` and the appointment's delegation status to
    /// `accepted` under one write-lock scope. A concurrent accept of another
    /// pending share for the same appointment loses the race and gets
    /// `AlreadyDelegated`.
    pub fn accept_share(
        &self,
        command: AcceptShareCommand,
    ) -> Result<AcceptShareResult, ShareError> {
        info!("Accepting share: {}", command.share_id);

        let _guard = self.connection.write_lock();

        let mut share = self
            .share_repository
            .get_share(&command.share_id)?
            .ok_or_else(|| ShareError::ShareNotFound(command.share_id.clone()))?;
        if share.status != ShareStatus::Pending {
            return Err(ShareError::InvalidStateTransition(share.status.as_str()));
        }

        let mut appointment = self
            .appointment_repository
            .get_appointment(&share.appointment_id)?
            .ok_or_else(|| ShareError::AppointmentNotFound(share.appointment_id.clone()))?;
        if appointment.completed {
            // the walk already happened and was billed; a share answered this
            // late must not reopen the delegation
            return Err(ShareError::AppointmentCompleted(appointment.id));
        }
        if appointment.delegation_status == DelegationStatus::Accepted {
            // another share won the race while this one was pending
            return Err(ShareError::AlreadyDelegated);
        }

        let now = Utc::now();
        share.status = ShareStatus::Accepted;
        share.updated_at = now;
        appointment.delegation_status = DelegationStatus::Accepted;
        appointment.updated_at = now;

        self.share_repository.update_share(&share)?;
        self.appointment_repository.update_appointment(&appointment)?;

        info!(
            "Share {} accepted - {} will cover appointment {}",
            share.id, share.receiving_user_id, appointment.id
        );
        Ok(AcceptShareResult { share, appointment })
    }

    /// Reject a pending share
    pub fn reject_share(
        &self,
        command: RejectShareCommand,
    ) -> Result<RejectShareResult, ShareError> {
        info!("Rejecting share: {}", command.share_id);

        let _guard = self.connection.write_lock();

        let mut share = self
            .share_repository
            .get_share(&command.share_id)?
            .ok_or_else(|| ShareError::ShareNotFound(command.share_id.clone()))?;
        if share.status != ShareStatus::Pending {
            return Err(ShareError::InvalidStateTransition(share.status.as_str()));
        }

        share.status = ShareStatus::Rejected;
        share.updated_at = Utc::now();
        self.share_repository.update_share(&share)?;

        Ok(RejectShareResult { share })
    }

    /// Cancel a pending or accepted share.
    ///
    /// Canceling an accepted share before the walk releases the appointment:
    /// its delegation status goes back to `none`.
    pub fn cancel_share(
        &self,
        command: CancelShareCommand,
    ) -> Result<CancelShareResult, ShareError> {
        info!("Canceling share: {}", command.share_id);

        let _guard = self.connection.write_lock();

        let mut share = self
            .share_repository
            .get_share(&command.share_id)?
            .ok_or_else(|| ShareError::ShareNotFound(command.share_id.clone()))?;
        if !share.status.is_active() {
            return Err(ShareError::InvalidStateTransition(share.status.as_str()));
        }

        let was_accepted = share.status == ShareStatus::Accepted;
        let now = Utc::now();
        share.status = ShareStatus::Canceled;
        share.updated_at = now;
        self.share_repository.update_share(&share)?;

        if was_accepted {
            if let Some(mut appointment) = self
                .appointment_repository
                .get_appointment(&share.appointment_id)?
            {
                appointment.delegation_status = DelegationStatus::None;
                appointment.updated_at = now;
                self.appointment_repository.update_appointment(&appointment)?;
                info!(
                    "Released appointment {} after canceling accepted share",
                    appointment.id
                );
            }
        }

        Ok(CancelShareResult { share })
    }

    /// List a user's shares, split into proposals they sent and proposals they
    /// received as the covering walker
    pub fn list_shares(&self, command: ListSharesCommand) -> Result<ListSharesResult, ShareError> {
        let shares = self.share_repository.list_shares_for_user(&command.user_id)?;
        let (outgoing, incoming) = shares
            .into_iter()
            .partition(|s| s.sharing_user_id == command.user_id);
        Ok(ListSharesResult { outgoing, incoming })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::appointment::{CloneRecurringCommand, CreateAppointmentCommand};
    use crate::domain::models::appointment::{Appointment, WeekdayFlags};
    use crate::domain::AppointmentService;
    use crate::storage::csv::test_utils::connection_between;
    use crate::domain::models::connection::ConnectionStatus;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::{tempdir, TempDir};

    struct TestContext {
        share_service: ShareService,
        appointment_service: AppointmentService,
        connection_repository: ConnectionRepository,
        _temp_dir: TempDir,
    }

    fn setup_test() -> TestContext {
        let temp_dir = tempdir().unwrap();
        let conn = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
        let context = TestContext {
            share_service: ShareService::new(conn.clone()),
            appointment_service: AppointmentService::new(conn.clone()),
            connection_repository: ConnectionRepository::new(conn),
            _temp_dir: temp_dir,
        };
        // user::1 and user::2 are connected walkers in every test
        context
            .connection_repository
            .store_connection(&connection_between(
                "user::1",
                "user::2",
                ConnectionStatus::Accepted,
            ))
            .unwrap();
        context
    }

    fn create_one_time(context: &TestContext) -> Appointment {
        context
            .appointment_service
            .create_appointment(CreateAppointmentCommand {
                user_id: "user::1".to_string(),
                pet_id: "pet::1".to_string(),
                recurring: false,
                appointment_date: Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
                weekdays: WeekdayFlags::default(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                duration_minutes: 30,
                price: 5000,
            })
            .unwrap()
            .appointment
    }

    fn propose(context: &TestContext, appointment_id: &str) -> ProposeShareResult {
        context
            .share_service
            .propose_share(ProposeShareCommand {
                appointment_id: appointment_id.to_string(),
                sharing_user_id: "user::1".to_string(),
                receiving_user_id: "user::2".to_string(),
                covering_percentage: 60,
                recurring_share: false,
            })
            .expect("Failed to propose share")
    }

    #[test]
    fn test_propose_creates_pending_share() {
        let context = setup_test();
        let appointment = create_one_time(&context);

        let result = propose(&context, &appointment.id);
        assert_eq!(result.share.status, ShareStatus::Pending);
        assert_eq!(result.share.covering_walker_percentage, 60);
        assert_eq!(result.share.original_walker_percentage(), 40);

        // proposing does not touch the appointment
        let reloaded = context
            .appointment_service
            .get_appointment(crate::domain::commands::appointment::GetAppointmentCommand {
                appointment_id: appointment.id,
            })
            .unwrap()
            .appointment
            .unwrap();
        assert_eq!(reloaded.delegation_status, DelegationStatus::None);
    }

    #[test]
    fn test_recurring_template_not_shareable() {
        let context = setup_test();
        let template = context
            .appointment_service
            .create_appointment(CreateAppointmentCommand {
                user_id: "user::1".to_string(),
                pet_id: "pet::1".to_string(),
                recurring: true,
                appointment_date: None,
                weekdays: WeekdayFlags {
                    monday: true,
                    ..WeekdayFlags::default()
                },
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                duration_minutes: 30,
                price: 5000,
            })
            .unwrap()
            .appointment;

        // including an out-of-range split: the recurring check wins
        for percentage in [0, 50, 100, 101] {
            let result = context.share_service.propose_share(ProposeShareCommand {
                appointment_id: template.id.clone(),
                sharing_user_id: "user::1".to_string(),
                receiving_user_id: "user::2".to_string(),
                covering_percentage: percentage,
                recurring_share: false,
            });
            assert!(matches!(result, Err(ShareError::RecurringNotShareable)));
        }

        // but its clones are shareable
        let clones = context
            .appointment_service
            .clone_recurring_for_dates(CloneRecurringCommand {
                template_appointment_id: template.id.clone(),
                dates: vec![NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()],
            })
            .unwrap()
            .appointments;
        propose(&context, &clones[0].id);
    }

    #[test]
    fn test_invalid_split_rejected() {
        let context = setup_test();
        let appointment = create_one_time(&context);

        let result = context.share_service.propose_share(ProposeShareCommand {
            appointment_id: appointment.id,
            sharing_user_id: "user::1".to_string(),
            receiving_user_id: "user::2".to_string(),
            covering_percentage: 101,
            recurring_share: false,
        });
        assert!(matches!(result, Err(ShareError::InvalidSplit(101))));
    }

    #[test]
    fn test_unconnected_users_rejected() {
        let context = setup_test();
        let appointment = create_one_time(&context);

        let result = context.share_service.propose_share(ProposeShareCommand {
            appointment_id: appointment.id,
            sharing_user_id: "user::1".to_string(),
            receiving_user_id: "user::9".to_string(),
            covering_percentage: 60,
            recurring_share: false,
        });
        assert!(matches!(result, Err(ShareError::UsersNotConnected(_, _))));
    }

    #[test]
    fn test_double_booking_prevented() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let first = propose(&context, &appointment.id);

        // second proposal while the first is still pending
        let result = context.share_service.propose_share(ProposeShareCommand {
            appointment_id: appointment.id.clone(),
            sharing_user_id: "user::1".to_string(),
            receiving_user_id: "user::2".to_string(),
            covering_percentage: 30,
            recurring_share: false,
        });
        assert!(matches!(result, Err(ShareError::AlreadyDelegated)));

        // and after acceptance, regardless of the users involved
        context
            .share_service
            .accept_share(AcceptShareCommand {
                share_id: first.share.id,
            })
            .unwrap();
        let result = context.share_service.propose_share(ProposeShareCommand {
            appointment_id: appointment.id,
            sharing_user_id: "user::2".to_string(),
            receiving_user_id: "user::1".to_string(),
            covering_percentage: 30,
            recurring_share: false,
        });
        assert!(matches!(result, Err(ShareError::AlreadyDelegated)));
    }

    #[test]
    fn test_accept_updates_share_and_appointment_together() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);

        let result = context
            .share_service
            .accept_share(AcceptShareCommand {
                share_id: proposed.share.id,
            })
            .expect("Failed to accept share");

        assert_eq!(result.share.status, ShareStatus::Accepted);
        assert_eq!(result.appointment.delegation_status, DelegationStatus::Accepted);
    }

    #[test]
    fn test_accept_requires_pending() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);

        context
            .share_service
            .reject_share(RejectShareCommand {
                share_id: proposed.share.id.clone(),
            })
            .unwrap();

        let result = context.share_service.accept_share(AcceptShareCommand {
            share_id: proposed.share.id,
        });
        assert!(matches!(
            result,
            Err(ShareError::InvalidStateTransition("rejected"))
        ));
    }

    #[test]
    fn test_accept_refused_after_completion() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);

        // the walk happens and gets billed while the proposal sits unanswered
        let appointment_repository = AppointmentRepository::new(Arc::new(
            CsvConnection::new(context._temp_dir.path()).unwrap(),
        ));
        let mut completed = appointment_repository
            .get_appointment(&appointment.id)
            .unwrap()
            .unwrap();
        completed.completed = true;
        appointment_repository.update_appointment(&completed).unwrap();

        let result = context.share_service.accept_share(AcceptShareCommand {
            share_id: proposed.share.id,
        });
        assert!(matches!(result, Err(ShareError::AppointmentCompleted(_))));
    }

    #[test]
    fn test_cancel_and_accept_serialize() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);

        let share_service = context.share_service.clone();
        let appointment_service = context.appointment_service.clone();
        let share_id = proposed.share.id.clone();
        let appointment_id = appointment.id.clone();
        let accept_handle = std::thread::spawn(move || {
            share_service.accept_share(AcceptShareCommand { share_id })
        });
        let cancel_handle = std::thread::spawn(move || {
            appointment_service.cancel_appointment(
                crate::domain::commands::appointment::CancelAppointmentCommand { appointment_id },
            )
        });
        accept_handle.join().unwrap().unwrap();
        cancel_handle.join().unwrap().unwrap();

        // both writes survive in either order: the cancel must not clobber
        // the delegation status the accept committed
        let reloaded = context
            .appointment_service
            .get_appointment(crate::domain::commands::appointment::GetAppointmentCommand {
                appointment_id: appointment.id,
            })
            .unwrap()
            .appointment
            .unwrap();
        assert!(reloaded.canceled);
        assert_eq!(reloaded.delegation_status, DelegationStatus::Accepted);
    }

    #[test]
    fn test_rejected_share_frees_the_appointment() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);

        context
            .share_service
            .reject_share(RejectShareCommand {
                share_id: proposed.share.id,
            })
            .unwrap();

        // a new proposal is allowed again
        propose(&context, &appointment.id);
    }

    #[test]
    fn test_cancel_accepted_share_releases_appointment() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);
        context
            .share_service
            .accept_share(AcceptShareCommand {
                share_id: proposed.share.id.clone(),
            })
            .unwrap();

        let canceled = context
            .share_service
            .cancel_share(CancelShareCommand {
                share_id: proposed.share.id,
            })
            .unwrap();
        assert_eq!(canceled.share.status, ShareStatus::Canceled);

        let reloaded = context
            .appointment_service
            .get_appointment(crate::domain::commands::appointment::GetAppointmentCommand {
                appointment_id: appointment.id,
            })
            .unwrap()
            .appointment
            .unwrap();
        assert_eq!(reloaded.delegation_status, DelegationStatus::None);
    }

    #[test]
    fn test_cancel_terminal_share_rejected() {
        let context = setup_test();
        let appointment = create_one_time(&context);
        let proposed = propose(&context, &appointment.id);

        context
            .share_service
            .cancel_share(CancelShareCommand {
                share_id: proposed.share.id.clone(),
            })
            .unwrap();
        let result = context.share_service.cancel_share(CancelShareCommand {
            share_id: proposed.share.id,
        });
        assert!(matches!(result, Err(ShareError::InvalidStateTransition(_))));
    }

    #[test]
    fn test_concurrent_accepts_only_one_wins() {
        let context = setup_test();
        let appointment = create_one_time(&context);

        // two pending shares for the same appointment, created directly in
        // storage to bypass the propose-time uniqueness check
        let share_repository = ShareRepository::new(Arc::new(
            CsvConnection::new(context._temp_dir.path()).unwrap(),
        ));
        let first = crate::storage::csv::test_utils::pending_share(
            &appointment.id,
            "user::1",
            "user::2",
            60,
        );
        let mut second = crate::storage::csv::test_utils::pending_share(
            &appointment.id,
            "user::1",
            "user::2",
            40,
        );
        second.id = format!("{}-b", second.id);
        share_repository.store_share(&first).unwrap();
        // bypass the active-uniqueness check the way a raced insert would
        second.status = ShareStatus::Rejected;
        share_repository.store_share(&second).unwrap();
        second.status = ShareStatus::Pending;
        share_repository.update_share(&second).unwrap();

        let service_a = context.share_service.clone();
        let service_b = context.share_service.clone();
        let id_a = first.id.clone();
        let id_b = second.id.clone();
        let handle_a =
            std::thread::spawn(move || service_a.accept_share(AcceptShareCommand { share_id: id_a }));
        let handle_b =
            std::thread::spawn(move || service_b.accept_share(AcceptShareCommand { share_id: id_b }));

        let results = [handle_a.join().unwrap(), handle_b.join().unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one accept must win");
        let loser = results.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            loser,
            Err(ShareError::AlreadyDelegated) | Err(ShareError::InvalidStateTransition(_))
        ));
    }
}
