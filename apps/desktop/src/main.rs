use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    load_settings, normalize_base_url, CourseFilterInput, GrowthApi, HttpGrowthApi,
    NotificationBus, NotificationTray, SessionStore,
};

#[derive(Parser, Debug)]
struct Args {
    /// Override the configured API base address.
    #[arg(long)]
    api_url: Option<String>,
    /// Run a course search for this skill after the initial load.
    #[arg(long)]
    skill: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    let base_url = normalize_base_url(&settings.api_base_url);
    tracing::info!(%base_url, "starting growth dashboard client");

    let bus = NotificationBus::new();
    let tray = NotificationTray::new(&bus);
    let api: Arc<dyn GrowthApi> = Arc::new(HttpGrowthApi::new(base_url));
    let store = SessionStore::new(api, Arc::clone(&bus));

    store.initial_load().await;

    let snapshot = store.snapshot().await;
    match &snapshot.selected_email {
        Some(email) => println!("Selected employee: {email}"),
        None => println!("No employee selected (empty catalogue or load failure)."),
    }
    if let Some(plan) = &snapshot.active_plan {
        println!("Leadership potential index: {:.2}", plan.leadership_index);
        for next in &plan.next_roles {
            println!(
                "  next role: {} (fit {:.0}%)",
                next.role,
                next.fit * 100.0
            );
        }
    }
    println!("Mentor matches: {}", snapshot.mentors.len());
    println!("Leadership board entries: {}", snapshot.leadership.len());

    if let Some(skill) = args.skill {
        let filters = CourseFilterInput {
            skill,
            ..CourseFilterInput::default()
        };
        store.search_courses(&filters).await;
        for course in &store.snapshot().await.courses {
            println!("- {} ({})", course.title, course.provider);
        }
    }

    for notification in tray.visible() {
        println!("[{:?}] {}", notification.severity, notification.text);
    }

    Ok(())
}
