mod config;
mod display;
mod error;
mod parser;
mod schedule;
mod web;

use config::ScheduleConfig;
use display::{print_schedule, write_schedule_to_file};
use error::ScheduleError;
use parser::load_preferences;
use schedule::{generate_schedule, AllocatorOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    // Web mode
    if args.len() > 1 && args[1] == "web" {
        let port = args
            .get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        println!("Starting schedule server on port {}...", port);
        println!("Access the API at http://localhost:{}", port);
        web::start_server(port, ScheduleConfig::default()).await?;
        return Ok(());
    }

    // CLI mode: one-shot generation from a survey CSV
    let csv_path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("data/preferences.csv");

    println!("Loading preference records from {}...", csv_path);
    let records = load_preferences(csv_path)?;
    if records.is_empty() {
        return Err(ScheduleError::InvalidInput(
            "no preference records found in the survey export".to_string(),
        )
        .into());
    }
    println!("Loaded {} preference records", records.len());

    let config = ScheduleConfig::default();
    let outcome = generate_schedule(&config, &records, &AllocatorOptions::default());

    print_schedule(&outcome, &config);

    write_schedule_to_file(&outcome, &config, "schedule_week.txt")?;
    println!("\nSchedule saved to schedule_week.txt");

    Ok(())
}
