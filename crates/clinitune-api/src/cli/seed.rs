//! Demo data for local development.
//!
//! Creates one clinician with three assigned patients, a few appointments
//! and tasks, and one chat transcript. Every account uses the password
//! `password`. Does nothing if the demo clinician already exists.

use anyhow::Result;
use chrono::{Duration, Utc};
use console::style;

use clinitune_core::chat::repository::{ChatRepository, find_or_create};
use clinitune_core::repository::user::UserRepository;
use clinitune_infra::sqlite::user::SqliteUserRepository;
use clinitune_types::appointment::CreateAppointmentRequest;
use clinitune_types::chat::{ChatMessage, Sender};
use clinitune_types::task::{CreateTaskRequest, UpdateTaskRequest};
use clinitune_types::user::{AssignPatientRequest, SignupRequest, User};

use crate::state::AppState;

const DEMO_PASSWORD: &str = "password";
const CLINICIAN_EMAIL: &str = "clinician@demo.com";

const PATIENTS: [(&str, &str); 3] = [
    ("John Doe", "patient@demo.com"),
    ("Sarah Johnson", "sarah.johnson@demo.com"),
    ("Mike Chen", "mike.chen@demo.com"),
];

const DEMO_CHAT: [(Sender, &str); 5] = [
    (Sender::Ai, "Hello! How are you feeling today?"),
    (
        Sender::Patient,
        "I'm feeling a bit anxious about my upcoming presentation at work.",
    ),
    (
        Sender::Ai,
        "I understand that presentations can feel overwhelming. What specific aspects are making you feel most anxious?",
    ),
    (
        Sender::Patient,
        "I'm worried I'll forget what to say or that people will judge me.",
    ),
    (
        Sender::Ai,
        "Those are very common concerns. Have you tried any of the preparation techniques we've discussed before?",
    ),
];

const DEMO_SUMMARY: &str = "Patient expressing anxiety about work presentation. Main concerns include fear of forgetting content and being judged. Opportunity to reinforce coping strategies.";

async fn signup(state: &AppState, name: &str, email: &str, role: &str) -> Result<User> {
    Ok(state
        .auth_service
        .signup(SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role: role.to_string(),
            ..SignupRequest::default()
        })
        .await?)
}

pub async fn seed(state: &AppState, quiet: bool) -> Result<()> {
    let users = SqliteUserRepository::new(state.db_pool.clone());
    if users.get_by_email(CLINICIAN_EMAIL).await?.is_some() {
        if !quiet {
            println!(
                "  {} Demo data already present, nothing to do",
                style("•").dim()
            );
        }
        return Ok(());
    }

    let clinician = signup(state, "Dr. Sarah Smith", CLINICIAN_EMAIL, "clinician").await?;
    let mut patients = Vec::with_capacity(PATIENTS.len());
    for (name, email) in PATIENTS {
        let patient = signup(state, name, email, "patient").await?;
        state
            .patient_service
            .assign(
                &clinician,
                AssignPatientRequest {
                    patient_email: email.to_string(),
                },
            )
            .await?;
        patients.push(patient);
    }
    let (john, sarah) = (&patients[0], &patients[1]);

    let now = Utc::now();
    for (patient, in_days, kind) in [
        (john, 1, "Therapy Session"),
        (sarah, 7, "Follow-up"),
    ] {
        state
            .appointment_service
            .create(
                &clinician,
                CreateAppointmentRequest {
                    patient_id: Some(patient.id),
                    date: Some(now + Duration::days(in_days)),
                    kind: Some(kind.to_string()),
                    notes: None,
                },
            )
            .await?;
    }

    let tasks = [
        (
            john,
            "Daily Mood Journal",
            "Record your mood and any significant events from today.",
            0,
            false,
        ),
        (
            john,
            "Anxiety Assessment",
            "Complete the GAD-7 questionnaire.",
            1,
            false,
        ),
        (
            sarah,
            "Breathing Exercise",
            "Practice the 4-7-8 breathing technique for 10 minutes.",
            0,
            true,
        ),
    ];
    for (patient, title, description, due_in_days, completed) in tasks {
        let task = state
            .task_service
            .create(
                &clinician,
                CreateTaskRequest {
                    title: title.to_string(),
                    description: description.to_string(),
                    patient_id: Some(patient.id),
                    due_date: Some(now + Duration::days(due_in_days)),
                },
            )
            .await?;
        if completed {
            state
                .task_service
                .set_completed(
                    &clinician,
                    UpdateTaskRequest {
                        task_id: Some(task.id),
                        completed: Some(true),
                    },
                )
                .await?;
        }
    }

    let chats = state.triage_service.chat_repo();
    let mut session = find_or_create(chats, &john.id).await?;
    let count = DEMO_CHAT.len() as i64;
    for (i, (sender, text)) in DEMO_CHAT.into_iter().enumerate() {
        let mut message = ChatMessage::new(session.id, sender, text);
        message.timestamp = now - Duration::minutes((count - i as i64) * 10);
        chats.save_message(&message).await?;
    }
    session.summary = DEMO_SUMMARY.to_string();
    session.last_updated = now;
    chats.update_session(&session).await?;

    tracing::info!(clinician_id = %clinician.id, patients = patients.len(), "demo data seeded");
    if quiet {
        return Ok(());
    }

    println!();
    println!("  {} Database seeded", style("✓").green().bold());
    println!();
    println!(
        "  {:<12} {} / {}",
        style("Clinician").dim(),
        style(CLINICIAN_EMAIL).cyan(),
        DEMO_PASSWORD
    );
    for (_, email) in PATIENTS {
        println!(
            "  {:<12} {} / {}",
            style("Patient").dim(),
            style(email).cyan(),
            DEMO_PASSWORD
        );
    }
    println!();
    Ok(())
}
