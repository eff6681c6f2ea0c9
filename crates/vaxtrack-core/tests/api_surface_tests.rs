//! Exercises the exported API surface the UI shell consumes.

use vaxtrack_core::{
    open_database_in_memory, FfiApplicationRequest, FfiBatchInput, FfiClientInput,
    FfiConfirmationRequest, FfiFollowUp, FfiNewEmployee, FfiVaccineInput, VaxtrackError,
};

fn new_employee(email: &str) -> FfiNewEmployee {
    FfiNewEmployee {
        name: "Dr. Lima".into(),
        national_id: format!("nid-{}", email),
        email: email.into(),
        password: "s3cret!".into(),
    }
}

fn client_input(national_id: &str, name: &str) -> FfiClientInput {
    FfiClientInput {
        national_id: national_id.into(),
        name: name.into(),
        birth_date: "1990-04-12".into(),
        phone: None,
        email: None,
        address: None,
        allergy_notes: Some("egg protein".into()),
        observations: None,
    }
}

#[test]
fn test_full_clinic_day_through_api() {
    let core = open_database_in_memory().unwrap();

    // Staff and login
    let employee = core.register_employee(new_employee("lima@clinic.test")).unwrap();
    let session = core
        .login("lima@clinic.test".into(), "s3cret!".into())
        .unwrap()
        .unwrap();
    assert_eq!(session.employee_id, employee.id);
    assert!(core.current_session().unwrap().is_some());

    // Registries
    let client = core.create_client(client_input("12345678900", "Ana Souza")).unwrap();
    let vaccine = core
        .create_vaccine(FfiVaccineInput {
            name: "Tetravalent".into(),
            manufacturer: "BioPharm".into(),
            category: Some("viral".into()),
            doses_required: 2,
            interval_days: 21,
        })
        .unwrap();
    let batch = core
        .create_batch(FfiBatchInput {
            vaccine_id: vaccine.id.clone(),
            code: "L001".into(),
            initial_quantity: 5,
            expiration_date: "2099-12-31".into(),
            purchase_price: 100.0,
            sale_price: 30.0,
        })
        .unwrap();
    assert_eq!(batch.remaining_quantity, 5);

    // The batch shows up in both eligibility lists
    assert_eq!(core.batches_for_scheduling(vaccine.id.clone()).unwrap().len(), 1);
    assert_eq!(core.batches_for_application(vaccine.id.clone()).unwrap().len(), 1);

    // Record a dose, no follow-up
    let outcome = core
        .record_application(FfiApplicationRequest {
            client_id: Some(client.national_id.clone()),
            vaccine_id: Some(vaccine.id.clone()),
            batch_id: Some(batch.id.clone()),
            employee_id: Some(employee.id.clone()),
            dose_number: 1,
            next_dose_date: None,
            adverse_reactions: None,
            notes: None,
        })
        .unwrap();
    assert!(matches!(outcome.follow_up, FfiFollowUp::NotRequested));
    assert_eq!(outcome.application.unit_sale_price, 30.0);

    // Stock moved without any explicit decrement call
    let batches = core.list_batches(vaccine.id.clone()).unwrap();
    assert_eq!(batches[0].remaining_quantity, 4);

    // History pages
    assert_eq!(
        core.applications_for_client(client.national_id.clone())
            .unwrap()
            .len(),
        1
    );

    core.logout().unwrap();
    assert!(core.current_session().unwrap().is_none());
}

#[test]
fn test_confirmation_through_api() {
    let core = open_database_in_memory().unwrap();

    let employee = core.register_employee(new_employee("lima@clinic.test")).unwrap();
    let client = core.create_client(client_input("1", "Ana")).unwrap();
    let vaccine = core
        .create_vaccine(FfiVaccineInput {
            name: "Influenza".into(),
            manufacturer: "BioPharm".into(),
            category: None,
            doses_required: 1,
            interval_days: 0,
        })
        .unwrap();
    let batch = core
        .create_batch(FfiBatchInput {
            vaccine_id: vaccine.id.clone(),
            code: "L001".into(),
            initial_quantity: 3,
            expiration_date: "2099-12-31".into(),
            purchase_price: 60.0,
            sale_price: 25.0,
        })
        .unwrap();

    let appointment = core
        .schedule_appointment(vaxtrack_core::FfiAppointmentInput {
            client_id: client.national_id.clone(),
            batch_id: batch.id.clone(),
            scheduled_at: "2025-07-22T10:00:00".into(),
            notes: Some("first visit".into()),
        })
        .unwrap();
    assert_eq!(appointment.status, "scheduled");
    assert_eq!(core.list_scheduled_appointments().unwrap().len(), 1);

    // Confirmation without an employee is a validation error
    let denied = core.confirm_appointment(FfiConfirmationRequest {
        appointment_id: appointment.id.clone(),
        employee_id: None,
        adverse_reactions: None,
        notes: None,
    });
    assert!(matches!(denied, Err(VaxtrackError::ValidationError(_))));

    let application = core
        .confirm_appointment(FfiConfirmationRequest {
            appointment_id: appointment.id.clone(),
            employee_id: Some(employee.id.clone()),
            adverse_reactions: None,
            notes: None,
        })
        .unwrap();
    assert_eq!(application.appointment_id, Some(appointment.id.clone()));
    assert_eq!(application.dose_number, 1);

    // The scheduled list drained; the trigger completed the appointment
    assert!(core.list_scheduled_appointments().unwrap().is_empty());
    let history = core
        .appointments_for_client(client.national_id.clone())
        .unwrap();
    assert_eq!(history[0].status, "completed");
    assert_eq!(history[0].employee_id, Some(employee.id));
}

#[test]
fn test_malformed_dates_rejected_at_boundary() {
    let core = open_database_in_memory().unwrap();

    let result = core.create_client(FfiClientInput {
        birth_date: "12/04/1990".into(),
        ..client_input("1", "Ana")
    });
    assert!(matches!(result, Err(VaxtrackError::InvalidInput(_))));

    // Nothing was written
    assert!(core.list_clients().unwrap().is_empty());
}

#[test]
fn test_uniform_login_denial() {
    let core = open_database_in_memory().unwrap();
    core.register_employee(new_employee("lima@clinic.test")).unwrap();

    // Unknown email and wrong password both come back as a bare None
    assert!(core
        .login("nobody@clinic.test".into(), "s3cret!".into())
        .unwrap()
        .is_none());
    assert!(core
        .login("lima@clinic.test".into(), "wrong".into())
        .unwrap()
        .is_none());
}
