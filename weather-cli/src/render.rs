//! Human-friendly text for each pipeline state.

use weather_core::{DisplayRecord, PipelineState};

pub const IDLE_HINT: &str =
    "Dica: Se houver cidades com o mesmo nome, diferencie pelo estado. Ex: \"Maricá, RJ\"";
pub const LOADING_TEXT: &str = "Localizando cidade...";

pub fn render_state(state: &PipelineState, icon_url_template: &str) -> String {
    match state {
        PipelineState::Idle => IDLE_HINT.to_string(),
        PipelineState::Loading => LOADING_TEXT.to_string(),
        PipelineState::Failure(kind) => format!("Erro: {kind}"),
        PipelineState::Success(record) => render_record(record, icon_url_template),
    }
}

fn render_record(record: &DisplayRecord, icon_url_template: &str) -> String {
    let mut lines = vec![
        record.name.clone(),
        record.place_label(),
        format!("{}°C (sensação {}°C)", record.temperature_c, record.feels_like_c),
        record.description.clone(),
        format!("Umidade: {}%", record.humidity_pct),
        format!("Vento: {} m/s", record.wind_speed_mps),
        format!("Ícone: {}", record.icon_url(icon_url_template)),
    ];

    if let Some(at) = record.observed_at {
        lines.push(format!("Atualizado: {}", at.format("%d/%m/%Y %H:%M UTC")));
    }

    lines.join("\n")
}
