mod common;

use remindr_app::{
    AppError, CancelSubscription, CreateSubscription, DeleteReminder, DismissReminder, ErrorKind,
    GetReminder, GetSubscription, ListReminders, SetReminder, SubscriptionView,
};
use remindr_auth::Role;
use remindr_core::{SubscriptionId, UserId};
use remindr_infra::DispatchError;
use remindr_users::errors::CANNOT_CREATE_MORE_REMINDERS_THAN_SUBSCRIPTION_ALLOWS;
use remindr_users::{Reminder, SubscriptionType, UserEvent};

use common::{CurrentUserFactory, app_for, at};

type App = remindr_app::InMemoryApplication<std::sync::Arc<common::TestCurrentUserProvider>>;

fn subscribed(subscription_type: SubscriptionType) -> (App, SubscriptionView) {
    let caller = CurrentUserFactory::new().build();
    let user_id = caller.id;
    let (app, _) = app_for(caller);
    let view = app
        .create_subscription(&CreateSubscription {
            user_id,
            subscription_type,
        })
        .unwrap();
    (app, view)
}

fn set(app: &App, view: &SubscriptionView, when: &str) -> Result<Reminder, AppError> {
    app.set_reminder(&SetReminder {
        user_id: view.user_id,
        subscription_id: view.id,
        text: "water the plants".to_string(),
        date_time: at(when),
    })
}

fn assert_quota_exceeded(err: AppError) {
    match err {
        AppError::Dispatch(DispatchError::QuotaExceeded { code, .. }) => {
            assert_eq!(code, CANNOT_CREATE_MORE_REMINDERS_THAN_SUBSCRIPTION_ALLOWS)
        }
        other => panic!("expected quota error, got {other:?}"),
    }
}

#[test]
fn created_subscription_is_readable() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    let read = app
        .get_subscription(&GetSubscription {
            user_id: view.user_id,
        })
        .unwrap();

    assert_eq!(read, view);
    assert_eq!(read.subscription_type, SubscriptionType::Basic);
}

#[test]
fn subscribing_twice_is_a_conflict() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    let err = app
        .create_subscription(&CreateSubscription {
            user_id: view.user_id,
            subscription_type: SubscriptionType::Pro,
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn basic_user_gets_three_reminders_per_day() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    for hour in ["08", "12", "18"] {
        set(&app, &view, &format!("2024-09-10T{hour}:00:00Z")).unwrap();
    }

    assert_quota_exceeded(set(&app, &view, "2024-09-10T21:00:00Z").unwrap_err());

    // Another day has its own allowance.
    set(&app, &view, "2024-09-11T08:00:00Z").unwrap();
}

#[test]
fn quota_counts_days_in_the_reminders_own_offset() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    for _ in 0..3 {
        set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    }

    // 2024-09-10 in UTC, but already the 11th where it was scheduled.
    set(&app, &view, "2024-09-11T00:30:00+02:00").unwrap();
}

#[test]
fn pro_user_is_not_capped() {
    let (app, view) = subscribed(SubscriptionType::Pro);

    for _ in 0..25 {
        set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    }

    let reminders = app
        .list_reminders(&ListReminders {
            user_id: view.user_id,
        })
        .unwrap();
    assert_eq!(reminders.len(), 25);
}

#[test]
fn set_reminder_is_stored_and_readable() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    let reminder = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    let stored = app
        .get_reminder(&GetReminder {
            user_id: view.user_id,
            reminder_id: reminder.id_typed(),
        })
        .unwrap();

    assert_eq!(stored, reminder);
    assert!(!stored.is_dismissed());
}

#[test]
fn blank_text_is_a_validation_error() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    let err = app
        .set_reminder(&SetReminder {
            user_id: view.user_id,
            subscription_id: view.id,
            text: "   ".to_string(),
            date_time: at("2024-09-10T08:00:00Z"),
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn reminder_for_a_foreign_subscription_is_not_found() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    let err = app
        .set_reminder(&SetReminder {
            user_id: view.user_id,
            subscription_id: SubscriptionId::new(),
            text: "call mom".to_string(),
            date_time: at("2024-09-10T08:00:00Z"),
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn reminders_are_listed_by_date_time() {
    let (app, view) = subscribed(SubscriptionType::Basic);

    let late = set(&app, &view, "2024-09-12T08:00:00Z").unwrap();
    let early = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();

    let listed = app
        .list_reminders(&ListReminders {
            user_id: view.user_id,
        })
        .unwrap();

    assert_eq!(listed, vec![early, late]);
}

#[test]
fn dismissing_keeps_the_calendar_slot() {
    let (app, view) = subscribed(SubscriptionType::Basic);
    let first = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    set(&app, &view, "2024-09-10T09:00:00Z").unwrap();
    set(&app, &view, "2024-09-10T10:00:00Z").unwrap();

    app.dismiss_reminder(&DismissReminder {
        user_id: view.user_id,
        reminder_id: first.id_typed(),
    })
    .unwrap();

    let stored = app
        .get_reminder(&GetReminder {
            user_id: view.user_id,
            reminder_id: first.id_typed(),
        })
        .unwrap();
    assert!(stored.is_dismissed());

    assert_quota_exceeded(set(&app, &view, "2024-09-10T11:00:00Z").unwrap_err());
}

#[test]
fn dismissing_twice_is_not_found() {
    let (app, view) = subscribed(SubscriptionType::Basic);
    let reminder = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    let command = DismissReminder {
        user_id: view.user_id,
        reminder_id: reminder.id_typed(),
    };

    app.dismiss_reminder(&command).unwrap();
    let err = app.dismiss_reminder(&command).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn deleting_frees_the_calendar_slot() {
    let (app, view) = subscribed(SubscriptionType::Basic);
    let first = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    set(&app, &view, "2024-09-10T09:00:00Z").unwrap();
    set(&app, &view, "2024-09-10T10:00:00Z").unwrap();

    app.delete_reminder(&DeleteReminder {
        user_id: view.user_id,
        reminder_id: first.id_typed(),
    })
    .unwrap();

    let err = app
        .get_reminder(&GetReminder {
            user_id: view.user_id,
            reminder_id: first.id_typed(),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    set(&app, &view, "2024-09-10T11:00:00Z").unwrap();
}

#[test]
fn canceling_deletes_every_reminder() {
    let (app, view) = subscribed(SubscriptionType::Basic);
    let events = app.subscribe();
    set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    set(&app, &view, "2024-09-11T08:00:00Z").unwrap();

    app.cancel_subscription(&CancelSubscription {
        user_id: view.user_id,
        subscription_id: view.id,
    })
    .unwrap();

    let listed = app
        .list_reminders(&ListReminders {
            user_id: view.user_id,
        })
        .unwrap();
    assert!(listed.is_empty());

    let published: Vec<_> = events
        .drain()
        .into_iter()
        .map(|e| e.event_type().to_string())
        .collect();
    assert_eq!(
        published,
        vec![
            "users.reminder.set",
            "users.reminder.set",
            "users.subscription.deleted",
            "users.reminder.deleted",
            "users.reminder.deleted",
        ]
    );
}

#[test]
fn canceled_subscription_rejects_further_commands() {
    let (app, view) = subscribed(SubscriptionType::Basic);
    let reminder = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();
    let cancel = CancelSubscription {
        user_id: view.user_id,
        subscription_id: view.id,
    };
    app.cancel_subscription(&cancel).unwrap();

    let read = app
        .get_subscription(&GetSubscription {
            user_id: view.user_id,
        })
        .unwrap_err();
    assert_eq!(read.kind(), ErrorKind::NotFound);

    assert_eq!(
        set(&app, &view, "2024-09-12T08:00:00Z").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    let dismiss = app
        .dismiss_reminder(&DismissReminder {
            user_id: view.user_id,
            reminder_id: reminder.id_typed(),
        })
        .unwrap_err();
    assert_eq!(dismiss.kind(), ErrorKind::NotFound);

    assert_eq!(
        app.cancel_subscription(&cancel).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn reminders_of_other_users_are_not_visible() {
    let owner = CurrentUserFactory::new().build();
    let owner_id = owner.id;
    let (app, provider) = app_for(owner);
    let view = app
        .create_subscription(&CreateSubscription {
            user_id: owner_id,
            subscription_type: SubscriptionType::Basic,
        })
        .unwrap();
    let reminder = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();

    let stranger = CurrentUserFactory::new().build();
    let stranger_id = stranger.id;
    provider.returns(stranger);

    // Asking through their own id does not leak the reminder.
    let err = app
        .get_reminder(&GetReminder {
            user_id: stranger_id,
            reminder_id: reminder.id_typed(),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Asking through the owner's id is refused outright.
    let err = app
        .get_reminder(&GetReminder {
            user_id: owner_id,
            reminder_id: reminder.id_typed(),
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn admin_manages_reminders_for_another_user() {
    let admin = CurrentUserFactory::new().roles(vec![Role::admin()]).build();
    let (app, _) = app_for(admin);
    let customer = UserId::new();

    let view = app
        .create_subscription(&CreateSubscription {
            user_id: customer,
            subscription_type: SubscriptionType::Basic,
        })
        .unwrap();
    let reminder = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();

    assert_eq!(reminder.user_id(), customer);
    app.delete_reminder(&DeleteReminder {
        user_id: customer,
        reminder_id: reminder.id_typed(),
    })
    .unwrap();
}

#[test]
fn unauthorized_commands_leave_no_trace() {
    let caller = CurrentUserFactory::new().permissions(Vec::new()).build();
    let user_id = caller.id;
    let (app, _) = app_for(caller);
    let events = app.subscribe();

    let err = app
        .create_subscription(&CreateSubscription {
            user_id,
            subscription_type: SubscriptionType::Pro,
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(events.drain().is_empty());
}

#[test]
fn published_reminder_set_carries_the_reminder() {
    let (app, view) = subscribed(SubscriptionType::Basic);
    let events = app.subscribe();

    let reminder = set(&app, &view, "2024-09-10T08:00:00Z").unwrap();

    let published = events.drain();
    assert_eq!(published.len(), 1);
    match published[0].payload() {
        UserEvent::ReminderSet(e) => {
            assert_eq!(e.reminder, reminder);
            assert_eq!(e.user_id, view.user_id);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(published[0].sequence_number(), 1);
}
