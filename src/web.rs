use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use log::info;
use std::sync::Mutex;

use crate::config::ScheduleConfig;
use crate::parser::{parse_preferences_csv, PreferenceRecord};
use crate::schedule::{aggregate, generate_schedule, AllocatorOptions, ScheduleOutcome};

/// In-memory state for the server: the uploaded survey records and the
/// last generated schedule, kept only as UI state between calls.
pub struct AppState {
    pub records: Mutex<Option<Vec<PreferenceRecord>>>,
    pub last_outcome: Mutex<Option<ScheduleOutcome>>,
    pub config: ScheduleConfig,
}

// Survey CSV upload endpoint
async fn upload_preferences(
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match parse_preferences_csv(&body) {
        Ok(records) => {
            info!("uploaded {} preference records", records.len());
            let count = records.len();
            *state.records.lock().unwrap() = Some(records);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "records": count
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": true,
            "message": format!("Falha ao processar preferências: {}", e)
        }))),
    }
}

// Schedule generation endpoint: runs the allocator against the current
// records and returns the document, or an error flag/message pair when
// there is nothing to generate from.
async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let records = state.records.lock().unwrap();

    let records = match records.as_ref() {
        Some(records) if !records.is_empty() => records,
        _ => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": true,
                "message": "Nenhuma preferência disponível para gerar o horário"
            })));
        }
    };

    info!("generating schedule from {} records", records.len());
    let outcome = generate_schedule(&state.config, records, &AllocatorOptions::default());

    let response = serde_json::json!({
        "schedule": &outcome.schedule,
        "message": "Horário gerado com sucesso",
        "coverage": outcome.coverage,
        "generated_at": chrono::Local::now().to_rfc3339()
    });
    *state.last_outcome.lock().unwrap() = Some(outcome);

    Ok(HttpResponse::Ok().json(response))
}

// Last generated schedule endpoint
async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let outcome = state.last_outcome.lock().unwrap();
    if let Some(ref outcome) = *outcome {
        Ok(HttpResponse::Ok().json(outcome))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": true,
            "message": "Nenhum horário gerado ainda"
        })))
    }
}

// Aggregated popularity counters for the current records
async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let records = state.records.lock().unwrap();
    if let Some(ref records) = *records {
        Ok(HttpResponse::Ok().json(aggregate(records)))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": true,
            "message": "Nenhuma preferência disponível"
        })))
    }
}

pub async fn start_server(port: u16, config: ScheduleConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        records: Mutex::new(None),
        last_outcome: Mutex::new(None),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .route("/api/upload", web::post().to(upload_preferences))
            .route("/api/schedule/generate", web::post().to(generate))
            .route("/api/schedule", web::get().to(get_schedule))
            .route("/api/stats", web::get().to(get_stats))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
